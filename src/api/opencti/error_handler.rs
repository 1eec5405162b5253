use crate::api::ApiError;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, warn};

const UNKNOWN_ERROR: &str = "Unknown GraphQL error";

#[derive(Debug, Deserialize)]
pub struct GraphQlEnvelope {
    #[serde(default)]
    pub data: Option<Value>,
    // Entries are read leniently, a bare string still counts as an error.
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
}

fn error_message(entry: &Value) -> &str {
    entry
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(UNKNOWN_ERROR)
}

/// Returns the envelope data, or one error carrying every GraphQL message.
/// Any error entry makes `data` unusable, even when it is populated.
pub fn handle_graphql_response(
    response: GraphQlEnvelope,
    operation_name: &str,
) -> Result<Value, ApiError> {
    let query_errors = response.errors.unwrap_or_default();
    if !query_errors.is_empty() {
        let errors: Vec<&str> = query_errors.iter().map(error_message).collect();
        let message = errors.join("; ");
        error!(
            error = message,
            operation = operation_name,
            "GraphQL operation failed"
        );
        return Err(ApiError::GraphQl(message));
    }
    Ok(response.data.unwrap_or(Value::Null))
}

/// Walk `path` inside `data`. A null or missing node is returned as null.
pub fn extract_field(data: Value, path: &[&str], operation_name: &str) -> Value {
    let mut current = data;
    for (depth, field) in path.iter().enumerate() {
        current = match current {
            Value::Object(mut map) => map.remove(*field).unwrap_or(Value::Null),
            _ => Value::Null,
        };
        if current.is_null() {
            warn!(
                operation = operation_name,
                field = path[..=depth].join("."),
                "OpenCTI backend returned null for field"
            );
            return Value::Null;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> GraphQlEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_errors_fail_with_message() {
        let result = handle_graphql_response(
            envelope(json!({"errors": [{"message": "bad input"}]})),
            "ReportAdd",
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("bad input"));
        assert_eq!(err.to_string(), "OpenCTI API Error: bad input");
    }

    #[test]
    fn test_errors_are_joined_and_defaulted() {
        let result = handle_graphql_response(
            envelope(json!({
                "data": {"reportAdd": {"id": "r"}},
                "errors": [
                    {"message": "first", "extensions": {"code": "FORBIDDEN"}},
                    {"path": ["reportAdd"]},
                    {"message": "third"},
                ],
            })),
            "ReportAdd",
        );
        match result {
            Err(ApiError::GraphQl(message)) => {
                assert_eq!(message, "first; Unknown GraphQL error; third")
            }
            other => panic!("expected a GraphQL error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_error_entries() {
        let result = handle_graphql_response(
            envelope(json!({"errors": ["boom", null, {"message": 42}]})),
            "Label",
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "OpenCTI API Error: Unknown GraphQL error; Unknown GraphQL error; Unknown GraphQL error"
        );
    }

    #[test]
    fn test_data_returned_unmodified() {
        let data = handle_graphql_response(envelope(json!({"data": {"x": 1}})), "X").unwrap();
        assert_eq!(data, json!({"x": 1}));
        let data =
            handle_graphql_response(envelope(json!({"data": {"x": 1}, "errors": []})), "X")
                .unwrap();
        assert_eq!(data, json!({"x": 1}));
    }

    #[test]
    fn test_extract_field_nested_and_missing() {
        let data = json!({"reportEdit": {"fieldPatch": {"id": "r1"}}});
        assert_eq!(
            extract_field(data.clone(), &["reportEdit", "fieldPatch"], "ReportEdit"),
            json!({"id": "r1"})
        );
        assert_eq!(extract_field(data, &["report"], "Report"), Value::Null);
        assert_eq!(extract_field(json!({"report": null}), &["report", "id"], "Report"), Value::Null);
    }
}
