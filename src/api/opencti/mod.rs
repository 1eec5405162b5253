use crate::api::opencti::error_handler::{GraphQlEnvelope, handle_graphql_response};
use crate::api::{ApiError, Credentials, GraphQlApi, GraphQlRequest};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

pub mod about;
pub mod error_handler;
pub mod fields;
pub mod observable_type;
pub mod resource;

const AUTHORIZATION_HEADER: &str = "Authorization";
const CONTENT_TYPE_HEADER: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

pub struct ApiOpenCTI {
    api_uri: String,
    http_client: reqwest::Client,
    bearer: String,
}

impl ApiOpenCTI {
    pub fn new(credentials: &Credentials) -> Result<Self, ApiError> {
        let api_uri = credentials.endpoint();
        Url::parse(&api_uri)?;
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self {
            api_uri,
            http_client,
            bearer: credentials.api_key.bearer(),
        })
    }

    pub fn api_uri(&self) -> &str {
        &self.api_uri
    }

    pub fn post(&self) -> reqwest::RequestBuilder {
        self.http_client
            .post(&self.api_uri)
            .header(CONTENT_TYPE_HEADER, APPLICATION_JSON)
            .header(AUTHORIZATION_HEADER, self.bearer.as_str())
    }

    /// Platform version, doubles as a credentials check.
    pub async fn version(&self) -> Result<String, ApiError> {
        about::version(self).await
    }

    pub async fn check_version(&self) -> Option<String> {
        about::check_version(self).await
    }
}

#[async_trait]
impl GraphQlApi for ApiOpenCTI {
    async fn query_fetch(&self, request: &GraphQlRequest) -> Result<Value, ApiError> {
        debug!(operation = request.operation_name, "Sending GraphQL request");
        let response = self
            .post()
            .json(request)
            .send()
            .await
            .and_then(|response| response.error_for_status());
        let envelope = match response {
            Ok(response) => response.json::<GraphQlEnvelope>().await,
            Err(e) => Err(e),
        };
        match envelope {
            Ok(envelope) => handle_graphql_response(envelope, request.operation_name),
            Err(e) => {
                error!(
                    error = e.to_string(),
                    operation = request.operation_name,
                    "Fail to reach OpenCTI, check your configuration"
                );
                Err(ApiError::Transport(e))
            }
        }
    }
}

#[cfg(test)]
mod tests;
