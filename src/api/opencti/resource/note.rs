use crate::api::opencti::resource::{
    Document, EmptyUpdate, Handlers, delete_by_id, get_by_id, input_variables, search_by_term,
    update_by_id,
};
use crate::api::params::{
    ADDITIONAL_FIELDS, OptionalField, collection, fold_optional_fields, list, required_str, scalar,
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
const OPTIONAL_FIELDS: [OptionalField; 9] = [
    scalar("attribute_abstract"),
    scalar("confidence"),
    scalar("likelihood"),
    scalar("createdBy"),
    list("authors"),
    list("note_types"),
    list("objectMarking"),
    list("objectLabel"),
    list("objects"),
];

static CREATE: Document = Document {
    name: "NoteAdd",
    query: r#"
        mutation NoteAdd($input: NoteAddInput!) {
            noteAdd(input: $input) {
                id
                standard_id
                entity_type
                attribute_abstract
                content
                authors
                note_types
                likelihood
                confidence
                created_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["noteAdd"],
};

static GET: Document = Document {
    name: "Note",
    query: r#"
        query Note($id: String!) {
            note(id: $id) {
                id
                standard_id
                entity_type
                attribute_abstract
                content
                authors
                note_types
                likelihood
                confidence
                created_at
                updated_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
                objects(first: 100) { edges { node { ... on BasicObject { id entity_type } } } }
            }
        }
    "#,
    path: &["note"],
};

static SEARCH: Document = Document {
    name: "Notes",
    query: r#"
        query Notes($first: Int, $search: String) {
            notes(first: $first, search: $search, orderBy: created_at, orderMode: desc) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        attribute_abstract
                        content
                        authors
                        note_types
                        likelihood
                        confidence
                        created_at
                        createdBy { id name }
                        objectLabel { id value color }
                    }
                }
                pageInfo { globalCount }
            }
        }
    "#,
    path: &["notes"],
};

static UPDATE: Document = Document {
    name: "NoteEdit",
    query: r#"
        mutation NoteEdit($id: ID!, $input: [EditInput]!) {
            noteEdit(id: $id) {
                fieldPatch(input: $input) {
                    id
                    standard_id
                    attribute_abstract
                    content
                    likelihood
                    updated_at
                }
            }
        }
    "#,
    path: &["noteEdit", "fieldPatch"],
};

static DELETE: Document = Document {
    name: "NoteEdit",
    query: r#"
        mutation NoteEdit($id: ID!) {
            noteEdit(id: $id) {
                delete
            }
        }
    "#,
    path: &[],
};
// endregion

fn create(params: &Params) -> Result<Plan, ApiError> {
    let mut input = Map::new();
    input.insert("content".to_string(), Value::String(required_str(params, "content")?));
    fold_optional_fields(&mut input, &collection(params, ADDITIONAL_FIELDS)?, &OPTIONAL_FIELDS)?;
    Ok(CREATE.fetch(input_variables(input)))
}

fn get(params: &Params) -> Result<Plan, ApiError> {
    get_by_id(params, Resource::Note, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    search_by_term(params, &SEARCH)
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    update_by_id(params, Resource::Note, &UPDATE, EmptyUpdate::Sentinel)
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Note, &DELETE)
}
