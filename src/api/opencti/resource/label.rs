use crate::api::opencti::resource::{
    Document, EmptyUpdate, Handlers, delete_by_id, get_by_id, input_variables, search_by_term,
    update_by_id,
};
use crate::api::params::{
    ADDITIONAL_FIELDS, OptionalField, collection, fold_optional_fields, required_str, scalar,
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
const OPTIONAL_FIELDS: [OptionalField; 1] = [scalar("color")];

static CREATE: Document = Document {
    name: "LabelAdd",
    query: r#"
        mutation LabelAdd($input: LabelAddInput!) {
            labelAdd(input: $input) {
                id
                standard_id
                entity_type
                value
                color
                created_at
            }
        }
    "#,
    path: &["labelAdd"],
};

static GET: Document = Document {
    name: "Label",
    query: r#"
        query Label($id: String!) {
            label(id: $id) {
                id
                standard_id
                entity_type
                value
                color
                created_at
                updated_at
            }
        }
    "#,
    path: &["label"],
};

static SEARCH: Document = Document {
    name: "Labels",
    query: r#"
        query Labels($first: Int, $search: String) {
            labels(first: $first, search: $search, orderBy: value, orderMode: asc) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        value
                        color
                        created_at
                    }
                }
                pageInfo { globalCount }
            }
        }
    "#,
    path: &["labels"],
};

static UPDATE: Document = Document {
    name: "LabelEdit",
    query: r#"
        mutation LabelEdit($id: ID!, $input: [EditInput]!) {
            labelEdit(id: $id) {
                fieldPatch(input: $input) {
                    id
                    standard_id
                    value
                    color
                    updated_at
                }
            }
        }
    "#,
    path: &["labelEdit", "fieldPatch"],
};

static DELETE: Document = Document {
    name: "LabelEdit",
    query: r#"
        mutation LabelEdit($id: ID!) {
            labelEdit(id: $id) {
                delete
            }
        }
    "#,
    path: &[],
};
// endregion

fn create(params: &Params) -> Result<Plan, ApiError> {
    let mut input = Map::new();
    input.insert("value".to_string(), Value::String(required_str(params, "value")?));
    fold_optional_fields(&mut input, &collection(params, ADDITIONAL_FIELDS)?, &OPTIONAL_FIELDS)?;
    Ok(CREATE.fetch(input_variables(input)))
}

fn get(params: &Params) -> Result<Plan, ApiError> {
    get_by_id(params, Resource::Label, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    search_by_term(params, &SEARCH)
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    update_by_id(params, Resource::Label, &UPDATE, EmptyUpdate::Sentinel)
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Label, &DELETE)
}
