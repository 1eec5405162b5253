use crate::api::opencti::error_handler::extract_field;
use crate::api::opencti::resource::handlers;
use crate::api::{ApiError, GraphQlApi, OperationRequest, Plan};
use serde_json::{Value, json};
use tracing::{debug, error};

/// Run one work item: build its plan, then send at most one request.
pub async fn execute(api: &dyn GraphQlApi, request: &OperationRequest) -> Result<Value, ApiError> {
    let handler = handlers(request.resource)
        .handler(request.operation)
        .ok_or_else(|| ApiError::UnsupportedOperation {
            resource: request.resource.to_string(),
            operation: request.operation.to_string(),
        })?;
    match handler(&request.parameters)? {
        Plan::Fetch { request: query, path } => {
            let data = api.query_fetch(&query).await?;
            Ok(extract_field(data, path, query.operation_name))
        }
        Plan::Acknowledge { request: query, id } => {
            api.query_fetch(&query).await?;
            Ok(json!({ "deleted": true, "id": id }))
        }
        Plan::Resolved(value) => Ok(value),
    }
}

/// Run the items in order. With `continue_on_fail` a failing item becomes an
/// `{error}` row, otherwise the first failure aborts the batch.
pub async fn run_batch(
    api: &dyn GraphQlApi,
    requests: &[OperationRequest],
    continue_on_fail: bool,
) -> Result<Vec<Value>, ApiError> {
    let mut results = Vec::with_capacity(requests.len());
    for (index, request) in requests.iter().enumerate() {
        debug!(
            index,
            resource = request.resource.as_str(),
            operation = request.operation.as_str(),
            "Executing item"
        );
        match execute(api, request).await {
            Ok(value) => results.push(value),
            Err(e) if continue_on_fail => {
                error!(index, error = e.to_string(), "Item failed, continuing");
                results.push(json!({ "error": e.to_string() }));
            }
            Err(e) => {
                error!(index, error = e.to_string(), "Item failed, aborting batch");
                return Err(e);
            }
        }
    }
    Ok(results)
}
