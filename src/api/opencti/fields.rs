use serde::Serialize;
use serde_json::{Map, Value};

/// Keys whose update values are DateTime scalars on the OpenCTI side.
const DATE_FIELDS: [&str; 10] = [
    "published",
    "due_date",
    "first_seen",
    "last_seen",
    "start_time",
    "stop_time",
    "valid_from",
    "valid_until",
    "created",
    "modified",
];

const DEFAULT_OPERATOR: &str = "eq";

/// Wire shape of a fieldPatch entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditInput {
    pub key: String,
    pub value: Vec<Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub key: Vec<String>,
    pub values: Vec<String>,
    pub operator: String,
    pub mode: FilterMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterGroup {
    pub mode: FilterMode,
    pub filters: Vec<Filter>,
    #[serde(rename = "filterGroups")]
    pub filter_groups: Vec<FilterGroup>,
}

/// One search predicate before it is wrapped into a [`FilterGroup`].
#[derive(Debug, Clone)]
pub struct FilterCriterion {
    pub key: String,
    pub values: Vec<String>,
    pub operator: Option<String>,
}

impl FilterCriterion {
    pub fn eq(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
            operator: None,
        }
    }
}

/// Complete a date string with a timezone. OpenCTI's DateTime scalar rejects
/// the naive `2026-02-05T00:00:00` form that date pickers produce.
pub fn to_iso_date(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let s = value.trim();
    if s.ends_with('Z') || has_utc_offset(s) {
        return s.to_string();
    }
    format!("{}Z", s)
}

// Matches a trailing `+HH:MM` or `-HH:MM`.
fn has_utc_offset(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 6 {
        return false;
    }
    let tail = &bytes[bytes.len() - 6..];
    matches!(tail[0], b'+' | b'-')
        && tail[1].is_ascii_digit()
        && tail[2].is_ascii_digit()
        && tail[3] == b':'
        && tail[4].is_ascii_digit()
        && tail[5].is_ascii_digit()
}

pub fn split_comma_separated(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn build_edit_inputs(fields: &Map<String, Value>) -> Vec<EditInput> {
    fields
        .iter()
        .filter(|(_, value)| !matches!(value, Value::Null) && value.as_str() != Some(""))
        .map(|(key, value)| {
            let normalized = match value {
                Value::String(s) if DATE_FIELDS.contains(&key.as_str()) => {
                    Value::String(to_iso_date(s))
                }
                other => other.clone(),
            };
            let value = match normalized {
                Value::Array(items) => items,
                single => vec![single],
            };
            EditInput {
                key: key.clone(),
                value,
            }
        })
        .collect()
}

pub fn build_filter_group(criteria: Vec<FilterCriterion>, mode: FilterMode) -> FilterGroup {
    FilterGroup {
        mode,
        filters: criteria
            .into_iter()
            .map(|criterion| Filter {
                key: vec![criterion.key],
                values: criterion.values,
                operator: criterion
                    .operator
                    .unwrap_or_else(|| DEFAULT_OPERATOR.to_string()),
                mode: FilterMode::Or,
            })
            .collect(),
        filter_groups: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("2026-02-05T00:00:00", "2026-02-05T00:00:00Z")]
    #[case("2026-02-05T00:00:00Z", "2026-02-05T00:00:00Z")]
    #[case("2026-02-05T00:00:00+02:00", "2026-02-05T00:00:00+02:00")]
    #[case("2026-02-05T00:00:00-05:30", "2026-02-05T00:00:00-05:30")]
    #[case(" 2026-02-05T10:00:00 ", "2026-02-05T10:00:00Z")]
    #[case("2026-02-05", "2026-02-05Z")]
    #[case("", "")]
    fn test_to_iso_date(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_iso_date(input), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("2026-02-05T00:00:00")]
    #[case("2026-02-05T00:00:00+0200")]
    #[case("2026-02-05T00:00:00+02:00")]
    #[case("not a date")]
    fn test_to_iso_date_idempotent(#[case] input: &str) {
        let once = to_iso_date(input);
        assert_eq!(to_iso_date(&once), once);
    }

    #[rstest]
    #[case("a, b ,,c", vec!["a", "b", "c"])]
    #[case("", vec![])]
    #[case("   ", vec![])]
    #[case("TLP:GREEN", vec!["TLP:GREEN"])]
    #[case(" ,x, ", vec!["x"])]
    fn test_split_comma_separated(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_comma_separated(input), expected);
    }

    #[test]
    fn test_build_edit_inputs_drops_empty_and_normalizes_dates() {
        let fields = json!({
            "name": "x",
            "empty": "",
            "skip": null,
            "due_date": "2026-01-01T00:00:00",
        });
        let inputs = build_edit_inputs(fields.as_object().unwrap());
        assert_eq!(
            inputs,
            vec![
                EditInput {
                    key: "name".into(),
                    value: vec![json!("x")],
                },
                EditInput {
                    key: "due_date".into(),
                    value: vec![json!("2026-01-01T00:00:00Z")],
                },
            ]
        );
    }

    #[test]
    fn test_build_edit_inputs_keeps_lists_and_scalars() {
        let fields = json!({
            "aliases": ["APT28", "Fancy Bear"],
            "confidence": 0,
            "is_family": false,
            "description": "2026-01-01T00:00:00",
        });
        let inputs = build_edit_inputs(fields.as_object().unwrap());
        assert_eq!(inputs.len(), 4);
        assert_eq!(inputs[0].value, vec![json!("APT28"), json!("Fancy Bear")]);
        assert_eq!(inputs[1].value, vec![json!(0)]);
        assert_eq!(inputs[2].value, vec![json!(false)]);
        // Not a date key, so left as typed.
        assert_eq!(inputs[3].value, vec![json!("2026-01-01T00:00:00")]);
    }

    #[test]
    fn test_build_filter_group_wire_shape() {
        let group = build_filter_group(
            vec![FilterCriterion::eq("observable_value", vec!["1.2.3.4".into()])],
            FilterMode::And,
        );
        assert_eq!(
            serde_json::to_value(&group).unwrap(),
            json!({
                "mode": "and",
                "filters": [{
                    "key": ["observable_value"],
                    "values": ["1.2.3.4"],
                    "operator": "eq",
                    "mode": "or",
                }],
                "filterGroups": [],
            })
        );
    }

    #[test]
    fn test_build_filter_group_custom_operator() {
        let group = build_filter_group(
            vec![FilterCriterion {
                key: "x_opencti_score".into(),
                values: vec!["50".into()],
                operator: Some("gt".into()),
            }],
            FilterMode::Or,
        );
        assert_eq!(group.mode, FilterMode::Or);
        assert_eq!(group.filters[0].operator, "gt");
        assert_eq!(group.filters[0].mode, FilterMode::Or);
        assert!(group.filter_groups.is_empty());
    }
}
