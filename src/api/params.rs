//! Readers over the caller supplied parameter map.
//!
//! The host collects and validates parameters before an item reaches the
//! builder, so these readers only fail when a value is missing or has a JSON
//! type that cannot be used at all.

use crate::api::opencti::fields::{split_comma_separated, to_iso_date};
use crate::api::{ApiError, Params};
use serde_json::{Map, Value};

pub const ADDITIONAL_FIELDS: &str = "additionalFields";
pub const UPDATE_FIELDS: &str = "updateFields";
pub const SEARCH_OPTIONS: &str = "searchOptions";
pub const SEARCH_TERM: &str = "searchTerm";
pub const LIMIT: &str = "limit";

/// How an optional field is carried to the remote input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Passed through untouched.
    Scalar,
    /// Comma separated string split into a list.
    List,
    /// Date string completed with a timezone.
    Date,
}

#[derive(Clone, Copy, Debug)]
pub struct OptionalField {
    pub name: &'static str,
    pub kind: FieldKind,
}

pub const fn scalar(name: &'static str) -> OptionalField {
    OptionalField {
        name,
        kind: FieldKind::Scalar,
    }
}

pub const fn list(name: &'static str) -> OptionalField {
    OptionalField {
        name,
        kind: FieldKind::List,
    }
}

pub const fn date(name: &'static str) -> OptionalField {
    OptionalField {
        name,
        kind: FieldKind::Date,
    }
}

/// A value counts as supplied unless it is null or the empty string.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn lookup<'a>(params: &'a Params, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|value| is_present(value))
}

pub fn required_str(params: &Params, name: &str) -> Result<String, ApiError> {
    match lookup(params, name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(ApiError::invalid(name, "expected a string")),
        None => Err(ApiError::MissingParameter(name.to_string())),
    }
}

pub fn optional_str(params: &Params, name: &str) -> Result<Option<String>, ApiError> {
    match lookup(params, name) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(ApiError::invalid(name, "expected a string")),
        None => Ok(None),
    }
}

/// Page size of a search. Range checks belong to the host.
pub fn required_limit(params: &Params) -> Result<i64, ApiError> {
    match lookup(params, LIMIT) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| ApiError::invalid(LIMIT, "expected an integer")),
        Some(_) => Err(ApiError::invalid(LIMIT, "expected an integer")),
        None => Err(ApiError::MissingParameter(LIMIT.to_string())),
    }
}

/// A nested collection parameter such as `additionalFields`. Absent means empty.
pub fn collection(params: &Params, name: &str) -> Result<Map<String, Value>, ApiError> {
    match params.get(name) {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(Value::Null) | None => Ok(Map::new()),
        Some(_) => Err(ApiError::invalid(name, "expected an object")),
    }
}

/// Comma separated string or an already split array of strings.
pub fn list_value(name: &str, value: &Value) -> Result<Value, ApiError> {
    match value {
        Value::String(s) => Ok(Value::from(split_comma_separated(s))),
        Value::Array(items) => Ok(Value::Array(items.clone())),
        _ => Err(ApiError::invalid(name, "expected a comma separated string")),
    }
}

/// Copy every supplied optional field of `source` into `target`, in the
/// order of `fields`, normalized according to its kind.
pub fn fold_optional_fields(
    target: &mut Map<String, Value>,
    source: &Map<String, Value>,
    fields: &[OptionalField],
) -> Result<(), ApiError> {
    for field in fields {
        let Some(value) = source.get(field.name).filter(|value| is_present(value)) else {
            continue;
        };
        let normalized = match field.kind {
            FieldKind::Scalar => value.clone(),
            FieldKind::List => list_value(field.name, value)?,
            FieldKind::Date => match value {
                Value::String(s) => Value::String(to_iso_date(s)),
                other => other.clone(),
            },
        };
        target.insert(field.name.to_string(), normalized);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => panic!("test params must be an object"),
        }
    }

    #[test]
    fn test_required_str_missing_and_empty() {
        let p = params(json!({"reportId": "", "noteId": null}));
        assert!(matches!(
            required_str(&p, "reportId"),
            Err(ApiError::MissingParameter(name)) if name == "reportId"
        ));
        assert!(matches!(required_str(&p, "noteId"), Err(ApiError::MissingParameter(_))));
        assert!(matches!(required_str(&p, "taskId"), Err(ApiError::MissingParameter(_))));
    }

    #[test]
    fn test_required_limit_accepts_integral_numbers() {
        assert_eq!(required_limit(&params(json!({"limit": 25}))).unwrap(), 25);
        assert_eq!(required_limit(&params(json!({"limit": 50.0}))).unwrap(), 50);
        assert!(required_limit(&params(json!({"limit": "ten"}))).is_err());
        assert!(required_limit(&params(json!({}))).is_err());
    }

    #[test]
    fn test_fold_optional_fields_skips_absent_values() {
        let source = params(json!({
            "description": "APT report",
            "confidence": 0,
            "content": "",
            "createdBy": null,
            "objectLabel": "apt, espionage ,",
            "first_seen": "2026-02-05T00:00:00",
        }));
        let mut target = params(json!({"name": "x"}));
        fold_optional_fields(
            &mut target,
            &source,
            &[
                scalar("description"),
                scalar("content"),
                scalar("confidence"),
                scalar("createdBy"),
                date("first_seen"),
                list("objectLabel"),
                list("objectMarking"),
            ],
        )
        .unwrap();
        assert_eq!(
            Value::Object(target),
            json!({
                "name": "x",
                "description": "APT report",
                "confidence": 0,
                "first_seen": "2026-02-05T00:00:00Z",
                "objectLabel": ["apt", "espionage"],
            })
        );
    }

    #[test]
    fn test_list_value_keeps_arrays() {
        let value = list_value("objects", &json!(["a", "b"])).unwrap();
        assert_eq!(value, json!(["a", "b"]));
        assert!(list_value("objects", &json!(true)).is_err());
    }
}
