use crate::api::opencti::resource::{
    Document, EmptyUpdate, Handlers, delete_by_id, get_by_id, input_variables, search_by_term,
    update_by_id,
};
use crate::api::params::{
    ADDITIONAL_FIELDS, OptionalField, collection, date, fold_optional_fields, list, required_str,
    scalar,
};
use crate::api::{ApiError, Params, Plan, Resource};
use serde_json::{Map, Value};

pub static HANDLERS: Handlers = Handlers {
    create,
    get,
    search,
    update: Some(update),
    delete,
};

// region schema
const OPTIONAL_FIELDS: [OptionalField; 12] = [
    scalar("description"),
    scalar("confidence"),
    scalar("x_opencti_score"),
    scalar("x_opencti_detection"),
    scalar("x_opencti_main_observable_type"),
    date("valid_from"),
    date("valid_until"),
    scalar("createObservables"),
    scalar("createdBy"),
    list("indicator_types"),
    list("objectMarking"),
    list("objectLabel"),
];

static CREATE: Document = Document {
    name: "IndicatorAdd",
    query: r#"
        mutation IndicatorAdd($input: IndicatorAddInput!) {
            indicatorAdd(input: $input) {
                id
                standard_id
                entity_type
                name
                description
                pattern
                pattern_type
                indicator_types
                valid_from
                valid_until
                x_opencti_score
                x_opencti_detection
                x_opencti_main_observable_type
                confidence
                created_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["indicatorAdd"],
};

static GET: Document = Document {
    name: "Indicator",
    query: r#"
        query Indicator($id: String!) {
            indicator(id: $id) {
                id
                standard_id
                entity_type
                name
                description
                pattern
                pattern_type
                indicator_types
                valid_from
                valid_until
                x_opencti_score
                x_opencti_detection
                x_opencti_main_observable_type
                confidence
                created_at
                updated_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
                observables(first: 50) { edges { node { id entity_type observable_value } } }
            }
        }
    "#,
    path: &["indicator"],
};

static SEARCH: Document = Document {
    name: "Indicators",
    query: r#"
        query Indicators($first: Int, $search: String) {
            indicators(first: $first, search: $search, orderBy: created_at, orderMode: desc) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        name
                        description
                        pattern
                        pattern_type
                        indicator_types
                        valid_from
                        valid_until
                        x_opencti_score
                        x_opencti_detection
                        confidence
                        created_at
                        createdBy { id name }
                        objectMarking { id definition }
                        objectLabel { id value color }
                    }
                }
                pageInfo { globalCount }
            }
        }
    "#,
    path: &["indicators"],
};

// Indicators use the flat fieldPatch and delete mutations.
static UPDATE: Document = Document {
    name: "IndicatorFieldPatch",
    query: r#"
        mutation IndicatorFieldPatch($id: ID!, $input: [EditInput!]!) {
            indicatorFieldPatch(id: $id, input: $input) {
                id
                standard_id
                name
                description
                pattern
                x_opencti_score
                x_opencti_detection
                valid_from
                valid_until
                confidence
                updated_at
            }
        }
    "#,
    path: &["indicatorFieldPatch"],
};

static DELETE: Document = Document {
    name: "IndicatorDelete",
    query: r#"
        mutation IndicatorDelete($id: ID!) {
            indicatorDelete(id: $id)
        }
    "#,
    path: &[],
};
// endregion

fn create(params: &Params) -> Result<Plan, ApiError> {
    let mut input = Map::new();
    for required in ["name", "pattern", "pattern_type"] {
        input.insert(required.to_string(), Value::String(required_str(params, required)?));
    }
    fold_optional_fields(&mut input, &collection(params, ADDITIONAL_FIELDS)?, &OPTIONAL_FIELDS)?;
    Ok(CREATE.fetch(input_variables(input)))
}

fn get(params: &Params) -> Result<Plan, ApiError> {
    get_by_id(params, Resource::Indicator, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    search_by_term(params, &SEARCH)
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    update_by_id(params, Resource::Indicator, &UPDATE, EmptyUpdate::Sentinel)
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Indicator, &DELETE)
}
