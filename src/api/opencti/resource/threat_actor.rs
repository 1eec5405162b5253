use crate::api::opencti::fields::split_comma_separated;
use crate::api::opencti::resource::{
    Document, EmptyUpdate, Handlers, delete_by_id, get_by_id, input_variables, search_by_term,
    update_with,
};
use crate::api::params::{
    ADDITIONAL_FIELDS, OptionalField, UPDATE_FIELDS, collection, date, fold_optional_fields, list,
    required_str, scalar,
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
const OPTIONAL_FIELDS: [OptionalField; 14] = [
    scalar("description"),
    scalar("confidence"),
    date("first_seen"),
    date("last_seen"),
    scalar("sophistication"),
    scalar("resource_level"),
    scalar("primary_motivation"),
    scalar("createdBy"),
    list("aliases"),
    list("threat_actor_types"),
    list("roles"),
    list("goals"),
    list("objectMarking"),
    list("objectLabel"),
];

static CREATE: Document = Document {
    name: "ThreatActorGroupAdd",
    query: r#"
        mutation ThreatActorGroupAdd($input: ThreatActorGroupAddInput!) {
            threatActorGroupAdd(input: $input) {
                id
                standard_id
                entity_type
                name
                description
                aliases
                threat_actor_types
                first_seen
                last_seen
                sophistication
                resource_level
                primary_motivation
                confidence
                created_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["threatActorGroupAdd"],
};

static GET: Document = Document {
    name: "ThreatActorGroup",
    query: r#"
        query ThreatActorGroup($id: String!) {
            threatActorGroup(id: $id) {
                id
                standard_id
                entity_type
                name
                description
                aliases
                threat_actor_types
                first_seen
                last_seen
                roles
                goals
                sophistication
                resource_level
                primary_motivation
                secondary_motivations
                confidence
                created_at
                updated_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["threatActorGroup"],
};

static SEARCH: Document = Document {
    name: "ThreatActorsGroup",
    query: r#"
        query ThreatActorsGroup($first: Int, $search: String) {
            threatActorsGroup(first: $first, search: $search, orderBy: created_at, orderMode: desc) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        name
                        description
                        aliases
                        threat_actor_types
                        first_seen
                        last_seen
                        sophistication
                        resource_level
                        primary_motivation
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
    path: &["threatActorsGroup"],
};

static UPDATE: Document = Document {
    name: "ThreatActorGroupEdit",
    query: r#"
        mutation ThreatActorGroupEdit($id: ID!, $input: [EditInput]!) {
            threatActorGroupEdit(id: $id) {
                fieldPatch(input: $input) {
                    id
                    standard_id
                    name
                    description
                    aliases
                    first_seen
                    last_seen
                    sophistication
                    primary_motivation
                    updated_at
                }
            }
        }
    "#,
    path: &["threatActorGroupEdit", "fieldPatch"],
};

static DELETE: Document = Document {
    name: "ThreatActorGroupEdit",
    query: r#"
        mutation ThreatActorGroupEdit($id: ID!) {
            threatActorGroupEdit(id: $id) {
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
    get_by_id(params, Resource::ThreatActor, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    search_by_term(params, &SEARCH)
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    let id = required_str(params, &Resource::ThreatActor.id_parameter())?;
    let mut fields = collection(params, UPDATE_FIELDS)?;
    // Aliases typed as one string become a list before patching.
    if let Some(Value::String(aliases)) = fields.get("aliases") {
        if !aliases.is_empty() {
            let split = Value::from(split_comma_separated(aliases));
            fields.insert("aliases".to_string(), split);
        }
    }
    update_with(id, &fields, &UPDATE, EmptyUpdate::Sentinel)
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::ThreatActor, &DELETE)
}
