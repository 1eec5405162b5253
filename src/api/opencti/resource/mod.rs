//! Request builders, one module per OpenCTI resource.
//!
//! Every resource exposes a [`Handlers`] table; [`handlers`] maps the
//! resource tag to it. A handler turns the parameters of one work item into a
//! [`Plan`] without touching the network.

use crate::api::opencti::fields::build_edit_inputs;
use crate::api::params::{SEARCH_TERM, UPDATE_FIELDS, collection, optional_str, required_limit, required_str};
use crate::api::{ApiError, GraphQlRequest, Operation, Params, Plan, Resource};
use serde_json::{Map, Value, json};

pub mod incident;
pub mod indicator;
pub mod label;
pub mod malware;
pub mod note;
pub mod observable;
pub mod relationship;
pub mod report;
pub mod task;
pub mod threat_actor;
pub mod vulnerability;

pub const NO_FIELDS_TO_UPDATE: &str = "No fields to update";

const DEFAULT_ORDER_BY: &str = "created_at";
const DEFAULT_ORDER_MODE: &str = "desc";

pub type Handler = fn(&Params) -> Result<Plan, ApiError>;

/// Per operation handlers of one resource. Relationships cannot be updated.
pub struct Handlers {
    pub create: Handler,
    pub get: Handler,
    pub search: Handler,
    pub update: Option<Handler>,
    pub delete: Handler,
}

impl Handlers {
    pub fn handler(&self, operation: Operation) -> Option<Handler> {
        match operation {
            Operation::Create => Some(self.create),
            Operation::Get => Some(self.get),
            Operation::Search => Some(self.search),
            Operation::Update => self.update,
            Operation::Delete => Some(self.delete),
        }
    }
}

pub fn handlers(resource: Resource) -> &'static Handlers {
    match resource {
        Resource::Observable => &observable::HANDLERS,
        Resource::Report => &report::HANDLERS,
        Resource::Note => &note::HANDLERS,
        Resource::Task => &task::HANDLERS,
        Resource::ThreatActor => &threat_actor::HANDLERS,
        Resource::Label => &label::HANDLERS,
        Resource::Relationship => &relationship::HANDLERS,
        Resource::Indicator => &indicator::HANDLERS,
        Resource::Incident => &incident::HANDLERS,
        Resource::Malware => &malware::HANDLERS,
        Resource::Vulnerability => &vulnerability::HANDLERS,
    }
}

/// A fixed GraphQL document and where its payload sits inside `data`.
#[derive(Debug)]
pub struct Document {
    pub name: &'static str,
    pub query: &'static str,
    pub path: &'static [&'static str],
}

impl Document {
    pub fn request(&self, variables: Map<String, Value>) -> GraphQlRequest {
        GraphQlRequest::new(self.name, self.query, variables)
    }

    pub fn fetch(&self, variables: Map<String, Value>) -> Plan {
        Plan::Fetch {
            request: self.request(variables),
            path: self.path,
        }
    }
}

/// What an update with no usable field answers.
#[derive(Debug)]
pub enum EmptyUpdate {
    /// Read the current object back with this document.
    Refetch(&'static Document),
    /// Answer `{id, message}` without calling OpenCTI.
    Sentinel,
}

pub fn variables(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn id_variables(id: &str) -> Map<String, Value> {
    variables(json!({ "id": id }))
}

pub fn input_variables(input: Map<String, Value>) -> Map<String, Value> {
    let mut vars = Map::new();
    vars.insert("input".to_string(), Value::Object(input));
    vars
}

pub fn get_by_id(params: &Params, resource: Resource, document: &Document) -> Result<Plan, ApiError> {
    let id = required_str(params, &resource.id_parameter())?;
    Ok(document.fetch(id_variables(&id)))
}

/// `first` plus an optional `search` term, which is left out when empty.
pub fn search_variables(params: &Params) -> Result<Map<String, Value>, ApiError> {
    let mut vars = Map::new();
    vars.insert("first".to_string(), Value::from(required_limit(params)?));
    if let Some(term) = optional_str(params, SEARCH_TERM)? {
        vars.insert("search".to_string(), Value::String(term));
    }
    Ok(vars)
}

/// `orderBy`/`orderMode` from the search options, newest first by default.
pub fn insert_ordering(
    variables: &mut Map<String, Value>,
    options: &Map<String, Value>,
) -> Result<(), ApiError> {
    let order_by = optional_str(options, "orderBy")?.unwrap_or_else(|| DEFAULT_ORDER_BY.to_string());
    let order_mode =
        optional_str(options, "orderMode")?.unwrap_or_else(|| DEFAULT_ORDER_MODE.to_string());
    variables.insert("orderBy".to_string(), Value::String(order_by));
    variables.insert("orderMode".to_string(), Value::String(order_mode));
    Ok(())
}

pub fn search_by_term(params: &Params, document: &Document) -> Result<Plan, ApiError> {
    Ok(document.fetch(search_variables(params)?))
}

pub fn update_with(
    id: String,
    fields: &Map<String, Value>,
    document: &Document,
    on_empty: EmptyUpdate,
) -> Result<Plan, ApiError> {
    let edit_inputs = build_edit_inputs(fields);
    if edit_inputs.is_empty() {
        return Ok(match on_empty {
            EmptyUpdate::Refetch(get) => get.fetch(id_variables(&id)),
            EmptyUpdate::Sentinel => Plan::Resolved(json!({
                "id": id,
                "message": NO_FIELDS_TO_UPDATE,
            })),
        });
    }
    let vars = variables(json!({ "id": id, "input": edit_inputs }));
    Ok(document.fetch(vars))
}

pub fn update_by_id(
    params: &Params,
    resource: Resource,
    document: &Document,
    on_empty: EmptyUpdate,
) -> Result<Plan, ApiError> {
    let id = required_str(params, &resource.id_parameter())?;
    let fields = collection(params, UPDATE_FIELDS)?;
    update_with(id, &fields, document, on_empty)
}

pub fn delete_by_id(params: &Params, resource: Resource, document: &Document) -> Result<Plan, ApiError> {
    let id = required_str(params, &resource.id_parameter())?;
    Ok(Plan::Acknowledge {
        request: document.request(id_variables(&id)),
        id,
    })
}
