use crate::api::opencti::fields::split_comma_separated;
use crate::api::opencti::resource::{
    Document, Handlers, delete_by_id, get_by_id, input_variables, variables,
};
use crate::api::params::{
    ADDITIONAL_FIELDS, OptionalField, SEARCH_OPTIONS, collection, date, fold_optional_fields,
    list, optional_str, required_limit, required_str, scalar,
};
use crate::api::{ApiError, Params, Plan, Resource};
use serde_json::{Map, Value, json};

pub static HANDLERS: Handlers = Handlers {
    create,
    get,
    search,
    update: None,
    delete,
};

/// Relationship type meaning "add this object to a container".
pub const OBJECT_REFERENCE: &str = "object";

// region schema
const OPTIONAL_FIELDS: [OptionalField; 7] = [
    scalar("description"),
    scalar("confidence"),
    date("start_time"),
    date("stop_time"),
    scalar("createdBy"),
    list("objectMarking"),
    list("objectLabel"),
];

static CREATE: Document = Document {
    name: "StixCoreRelationshipAdd",
    query: r#"
        mutation StixCoreRelationshipAdd($input: StixCoreRelationshipAddInput!) {
            stixCoreRelationshipAdd(input: $input) {
                id
                standard_id
                entity_type
                relationship_type
                description
                confidence
                start_time
                stop_time
                created_at
                from { ... on BasicObject { id entity_type } }
                to { ... on BasicObject { id entity_type } }
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["stixCoreRelationshipAdd"],
};

static CREATE_REFERENCE: Document = Document {
    name: "StixRefRelationshipAdd",
    query: r#"
        mutation StixRefRelationshipAdd($input: StixRefRelationshipAddInput!) {
            stixRefRelationshipAdd(input: $input) {
                id
                standard_id
                entity_type
                relationship_type
                created_at
                from { ... on BasicObject { id entity_type } }
                to { ... on BasicObject { id entity_type } }
            }
        }
    "#,
    path: &["stixRefRelationshipAdd"],
};

static GET: Document = Document {
    name: "StixCoreRelationship",
    query: r#"
        query StixCoreRelationship($id: String!) {
            stixCoreRelationship(id: $id) {
                id
                standard_id
                entity_type
                relationship_type
                description
                confidence
                start_time
                stop_time
                created_at
                updated_at
                from { ... on BasicObject { id entity_type } }
                to { ... on BasicObject { id entity_type } }
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["stixCoreRelationship"],
};

static SEARCH: Document = Document {
    name: "StixCoreRelationships",
    query: r#"
        query StixCoreRelationships(
            $first: Int
            $search: String
            $fromOrToId: [String]
            $fromId: [String]
            $toId: [String]
            $relationship_type: [String]
        ) {
            stixCoreRelationships(
                first: $first
                search: $search
                fromOrToId: $fromOrToId
                fromId: $fromId
                toId: $toId
                relationship_type: $relationship_type
                orderBy: created_at
                orderMode: desc
            ) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        relationship_type
                        description
                        confidence
                        start_time
                        stop_time
                        created_at
                        from { ... on BasicObject { id entity_type } }
                        to { ... on BasicObject { id entity_type } }
                        createdBy { id name }
                        objectMarking { id definition }
                    }
                }
                pageInfo { globalCount }
            }
        }
    "#,
    path: &["stixCoreRelationships"],
};

static DELETE: Document = Document {
    name: "StixCoreRelationshipEdit",
    query: r#"
        mutation StixCoreRelationshipEdit($id: ID!) {
            stixCoreRelationshipEdit(id: $id) {
                delete
            }
        }
    "#,
    path: &[],
};
// endregion

fn create(params: &Params) -> Result<Plan, ApiError> {
    let relationship_type = required_str(params, "relationshipType")?;
    let from_id = required_str(params, "fromId")?;
    let to_id = required_str(params, "toId")?;

    if relationship_type == OBJECT_REFERENCE {
        let input = json!({
            "fromId": from_id,
            "toId": to_id,
            "relationship_type": OBJECT_REFERENCE,
        });
        return Ok(CREATE_REFERENCE.fetch(input_variables(variables(input))));
    }

    let mut input = variables(json!({
        "fromId": from_id,
        "toId": to_id,
        "relationship_type": relationship_type,
    }));
    fold_optional_fields(&mut input, &collection(params, ADDITIONAL_FIELDS)?, &OPTIONAL_FIELDS)?;
    Ok(CREATE.fetch(input_variables(input)))
}

fn get(params: &Params) -> Result<Plan, ApiError> {
    get_by_id(params, Resource::Relationship, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    let options = collection(params, SEARCH_OPTIONS)?;
    let mut vars = Map::new();
    vars.insert("first".to_string(), Value::from(required_limit(params)?));
    if let Some(search) = optional_str(&options, "search")? {
        vars.insert("search".to_string(), Value::String(search));
    }
    for id_filter in ["fromOrToId", "fromId", "toId"] {
        if let Some(id) = optional_str(&options, id_filter)? {
            vars.insert(id_filter.to_string(), json!([id]));
        }
    }
    if let Some(types) = optional_str(&options, "relationship_type")? {
        vars.insert(
            "relationship_type".to_string(),
            Value::from(split_comma_separated(&types)),
        );
    }
    Ok(SEARCH.fetch(vars))
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Relationship, &DELETE)
}
