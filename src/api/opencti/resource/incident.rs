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
    date("first_seen"),
    date("last_seen"),
    scalar("objective"),
    scalar("incident_type"),
    scalar("severity"),
    scalar("source"),
    scalar("createdBy"),
    list("aliases"),
    list("objectMarking"),
    list("objectLabel"),
];

static CREATE: Document = Document {
    name: "IncidentAdd",
    query: r#"
        mutation IncidentAdd($input: IncidentAddInput!) {
            incidentAdd(input: $input) {
                id
                standard_id
                entity_type
                name
                description
                aliases
                first_seen
                last_seen
                objective
                incident_type
                severity
                source
                confidence
                created_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["incidentAdd"],
};

static GET: Document = Document {
    name: "Incident",
    query: r#"
        query Incident($id: String!) {
            incident(id: $id) {
                id
                standard_id
                entity_type
                name
                description
                aliases
                first_seen
                last_seen
                objective
                incident_type
                severity
                source
                confidence
                created_at
                updated_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["incident"],
};

static SEARCH: Document = Document {
    name: "Incidents",
    query: r#"
        query Incidents($first: Int, $search: String) {
            incidents(first: $first, search: $search, orderBy: created_at, orderMode: desc) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        name
                        description
                        aliases
                        first_seen
                        last_seen
                        incident_type
                        severity
                        source
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
    path: &["incidents"],
};

static UPDATE: Document = Document {
    name: "IncidentEdit",
    query: r#"
        mutation IncidentEdit($id: ID!, $input: [EditInput]!) {
            incidentEdit(id: $id) {
                fieldPatch(input: $input) {
                    id
                    standard_id
                    name
                    description
                    first_seen
                    last_seen
                    severity
                    updated_at
                }
            }
        }
    "#,
    path: &["incidentEdit", "fieldPatch"],
};

static DELETE: Document = Document {
    name: "IncidentEdit",
    query: r#"
        mutation IncidentEdit($id: ID!) {
            incidentEdit(id: $id) {
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
    get_by_id(params, Resource::Incident, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    search_by_term(params, &SEARCH)
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    update_by_id(params, Resource::Incident, &UPDATE, EmptyUpdate::Sentinel)
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Incident, &DELETE)
}
