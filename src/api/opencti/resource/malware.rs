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
const OPTIONAL_FIELDS: [OptionalField; 10] = [
    scalar("description"),
    scalar("confidence"),
    date("first_seen"),
    date("last_seen"),
    scalar("is_family"),
    scalar("createdBy"),
    list("aliases"),
    list("malware_types"),
    list("objectMarking"),
    list("objectLabel"),
];

static CREATE: Document = Document {
    name: "MalwareAdd",
    query: r#"
        mutation MalwareAdd($input: MalwareAddInput!) {
            malwareAdd(input: $input) {
                id
                standard_id
                entity_type
                name
                description
                aliases
                malware_types
                is_family
                first_seen
                last_seen
                confidence
                created_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["malwareAdd"],
};

static GET: Document = Document {
    name: "Malware",
    query: r#"
        query Malware($id: String!) {
            malware(id: $id) {
                id
                standard_id
                entity_type
                name
                description
                aliases
                malware_types
                is_family
                first_seen
                last_seen
                architecture_execution_envs
                implementation_languages
                capabilities
                confidence
                created_at
                updated_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["malware"],
};

static SEARCH: Document = Document {
    name: "Malwares",
    query: r#"
        query Malwares($first: Int, $search: String) {
            malwares(first: $first, search: $search, orderBy: created_at, orderMode: desc) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        name
                        description
                        aliases
                        malware_types
                        is_family
                        first_seen
                        last_seen
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
    path: &["malwares"],
};

static UPDATE: Document = Document {
    name: "MalwareEdit",
    query: r#"
        mutation MalwareEdit($id: ID!, $input: [EditInput]!) {
            malwareEdit(id: $id) {
                fieldPatch(input: $input) {
                    id
                    standard_id
                    name
                    description
                    is_family
                    first_seen
                    last_seen
                    updated_at
                }
            }
        }
    "#,
    path: &["malwareEdit", "fieldPatch"],
};

static DELETE: Document = Document {
    name: "MalwareEdit",
    query: r#"
        mutation MalwareEdit($id: ID!) {
            malwareEdit(id: $id) {
                delete
            }
        }
    "#,
    path: &[],
};
// endregion

fn create(params: &Params) -> Result<Plan, ApiError> {
    let mut input = Map::new();
    input.insert("name".to_string(), Value::String(required_str(params, "name")?));
    fold_optional_fields(&mut input, &collection(params, ADDITIONAL_FIELDS)?, &OPTIONAL_FIELDS)?;
    Ok(CREATE.fetch(input_variables(input)))
}

fn get(params: &Params) -> Result<Plan, ApiError> {
    get_by_id(params, Resource::Malware, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    search_by_term(params, &SEARCH)
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    update_by_id(params, Resource::Malware, &UPDATE, EmptyUpdate::Sentinel)
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Malware, &DELETE)
}
