use crate::api::opencti::ApiOpenCTI;
use crate::api::opencti::error_handler::extract_field;
use crate::api::{ApiError, GraphQlApi, GraphQlRequest};
use serde_json::{Map, Value};
use tracing::{info, warn};

// region schema
const ABOUT_QUERY: &str = "{ about { version } }";
// endregion

pub async fn version(api: &ApiOpenCTI) -> Result<String, ApiError> {
    let query = GraphQlRequest::new("About", ABOUT_QUERY, Map::new());
    let data = api.query_fetch(&query).await?;
    match extract_field(data, &["about", "version"], "About") {
        Value::String(version) => Ok(version),
        _ => Err(ApiError::GraphQl(
            "OpenCTI backend does not expose its version".to_string(),
        )),
    }
}

/// Start-up check. Never fails: items report their own errors afterwards.
pub async fn check_version(api: &ApiOpenCTI) -> Option<String> {
    match version(api).await {
        Ok(version) => {
            info!(version, url = api.api_uri(), "Connected to OpenCTI");
            Some(version)
        }
        Err(e) => {
            warn!(
                error = e.to_string(),
                url = api.api_uri(),
                "OpenCTI version is not available"
            );
            None
        }
    }
}
