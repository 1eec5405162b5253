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
const OPTIONAL_FIELDS: [OptionalField; 7] = [
    scalar("description"),
    date("due_date"),
    scalar("createdBy"),
    list("objectAssignee"),
    list("objectLabel"),
    list("objectMarking"),
    list("objects"),
];

static CREATE: Document = Document {
    name: "TaskAdd",
    query: r#"
        mutation TaskAdd($input: TaskAddInput!) {
            taskAdd(input: $input) {
                id
                standard_id
                entity_type
                name
                description
                due_date
                created_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
                objectAssignee { id name }
            }
        }
    "#,
    path: &["taskAdd"],
};

static GET: Document = Document {
    name: "Task",
    query: r#"
        query Task($id: String!) {
            task(id: $id) {
                id
                standard_id
                entity_type
                name
                description
                due_date
                created_at
                updated_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
                objectAssignee { id name }
                objects(first: 100) { edges { node { ... on BasicObject { id entity_type } } } }
            }
        }
    "#,
    path: &["task"],
};

static SEARCH: Document = Document {
    name: "Tasks",
    query: r#"
        query Tasks($first: Int, $search: String) {
            tasks(first: $first, search: $search, orderBy: created_at, orderMode: desc) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        name
                        description
                        due_date
                        created_at
                        createdBy { id name }
                        objectLabel { id value color }
                        objectAssignee { id name }
                    }
                }
                pageInfo { globalCount }
            }
        }
    "#,
    path: &["tasks"],
};

// Tasks use the flat fieldPatch and delete mutations.
static UPDATE: Document = Document {
    name: "TaskFieldPatch",
    query: r#"
        mutation TaskFieldPatch($id: ID!, $input: [EditInput!]!) {
            taskFieldPatch(id: $id, input: $input) {
                id
                standard_id
                name
                description
                due_date
                updated_at
            }
        }
    "#,
    path: &["taskFieldPatch"],
};

static DELETE: Document = Document {
    name: "TaskDelete",
    query: r#"
        mutation TaskDelete($id: ID!) {
            taskDelete(id: $id)
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
    get_by_id(params, Resource::Task, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    search_by_term(params, &SEARCH)
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    update_by_id(params, Resource::Task, &UPDATE, EmptyUpdate::Sentinel)
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Task, &DELETE)
}
