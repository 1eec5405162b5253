use crate::api::opencti::fields::{FilterCriterion, FilterMode, build_filter_group, split_comma_separated};
use crate::api::opencti::observable_type;
use crate::api::opencti::resource::{
    Document, EmptyUpdate, Handlers, delete_by_id, get_by_id, insert_ordering, search_variables,
    update_by_id,
};
use crate::api::params::{
    ADDITIONAL_FIELDS, OptionalField, SEARCH_OPTIONS, collection, fold_optional_fields, list,
    optional_str, required_str, scalar,
};
use crate::api::{ApiError, GraphQlRequest, Params, Plan, Resource};
use serde_json::{Value, json};

pub static HANDLERS: Handlers = Handlers {
    create,
    get,
    search,
    update: Some(update),
    delete,
};

// region schema
const OPTIONAL_FIELDS: [OptionalField; 7] = [
    scalar("x_opencti_score"),
    scalar("x_opencti_description"),
    scalar("createdBy"),
    scalar("createIndicator"),
    list("objectMarking"),
    list("objectLabel"),
    list("externalReferences"),
];

pub static GET: Document = Document {
    name: "StixCyberObservable",
    query: r#"
        query StixCyberObservable($id: String!) {
            stixCyberObservable(id: $id) {
                id
                standard_id
                entity_type
                observable_value
                x_opencti_score
                x_opencti_description
                created_at
                updated_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
                indicators { edges { node { id name pattern } } }
            }
        }
    "#,
    path: &["stixCyberObservable"],
};

static SEARCH: Document = Document {
    name: "StixCyberObservables",
    query: r#"
        query StixCyberObservables(
            $first: Int
            $search: String
            $types: [String]
            $orderBy: StixCyberObservablesOrdering
            $orderMode: OrderingMode
            $filters: FilterGroup
        ) {
            stixCyberObservables(
                first: $first
                search: $search
                types: $types
                orderBy: $orderBy
                orderMode: $orderMode
                filters: $filters
            ) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        observable_value
                        x_opencti_score
                        x_opencti_description
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
    path: &["stixCyberObservables"],
};

static UPDATE: Document = Document {
    name: "StixCyberObservableEdit",
    query: r#"
        mutation StixCyberObservableEdit($id: ID!, $input: [EditInput]!) {
            stixCyberObservableEdit(id: $id) {
                fieldPatch(input: $input) {
                    id
                    standard_id
                    entity_type
                    observable_value
                    x_opencti_score
                    x_opencti_description
                    updated_at
                }
            }
        }
    "#,
    path: &["stixCyberObservableEdit", "fieldPatch"],
};

static DELETE: Document = Document {
    name: "StixCyberObservableEdit",
    query: r#"
        mutation StixCyberObservableEdit($id: ID!) {
            stixCyberObservableEdit(id: $id) {
                delete
            }
        }
    "#,
    path: &[],
};

const CREATE_NAME: &str = "StixCyberObservableAdd";
const CREATE_PATH: &[&str] = &["stixCyberObservableAdd"];

/// The type specific argument changes with the observable type, so this
/// document is assembled per request.
fn create_query(input_field: &str) -> String {
    format!(
        r#"
        mutation StixCyberObservableAdd(
            $type: String!
            ${field}: {field}AddInput
            $x_opencti_score: Int
            $x_opencti_description: String
            $createdBy: String
            $createIndicator: Boolean
            $objectMarking: [String]
            $objectLabel: [String]
            $externalReferences: [String]
        ) {{
            stixCyberObservableAdd(
                type: $type
                {field}: ${field}
                x_opencti_score: $x_opencti_score
                x_opencti_description: $x_opencti_description
                createdBy: $createdBy
                createIndicator: $createIndicator
                objectMarking: $objectMarking
                objectLabel: $objectLabel
                externalReferences: $externalReferences
            ) {{
                id
                standard_id
                entity_type
                observable_value
                x_opencti_score
                x_opencti_description
                created_at
                updated_at
                createdBy {{ id name }}
                objectMarking {{ id definition }}
                objectLabel {{ id value color }}
            }}
        }}
    "#,
        field = input_field
    )
}
// endregion

fn create(params: &Params) -> Result<Plan, ApiError> {
    let stix_type = required_str(params, "observableType")?;
    let value = required_str(params, "observableValue")?;
    let observable = observable_type::resolve(&stix_type);

    let mut variables = serde_json::Map::new();
    variables.insert("type".to_string(), Value::String(stix_type));
    variables.insert(observable.input_field.clone(), observable.shape.build(&value));
    fold_optional_fields(
        &mut variables,
        &collection(params, ADDITIONAL_FIELDS)?,
        &OPTIONAL_FIELDS,
    )?;

    Ok(Plan::Fetch {
        request: GraphQlRequest::new(CREATE_NAME, create_query(&observable.input_field), variables),
        path: CREATE_PATH,
    })
}

fn get(params: &Params) -> Result<Plan, ApiError> {
    get_by_id(params, Resource::Observable, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    let options = collection(params, SEARCH_OPTIONS)?;
    let mut variables = search_variables(params)?;
    insert_ordering(&mut variables, &options)?;
    if let Some(types) = optional_str(params, "observableTypes")? {
        variables.insert("types".to_string(), Value::from(split_comma_separated(&types)));
    }
    if let Some(filter_value) = optional_str(&options, "filterValue")? {
        let filters = build_filter_group(
            vec![FilterCriterion::eq("observable_value", vec![filter_value])],
            FilterMode::And,
        );
        variables.insert("filters".to_string(), json!(filters));
    }
    Ok(SEARCH.fetch(variables))
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    update_by_id(params, Resource::Observable, &UPDATE, EmptyUpdate::Refetch(&GET))
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Observable, &DELETE)
}
