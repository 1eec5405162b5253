use crate::api::opencti::fields::{FilterCriterion, FilterMode, build_filter_group, to_iso_date};
use crate::api::opencti::resource::{
    Document, EmptyUpdate, Handlers, delete_by_id, get_by_id, input_variables, insert_ordering,
    search_variables, update_by_id,
};
use crate::api::params::{
    ADDITIONAL_FIELDS, OptionalField, SEARCH_OPTIONS, collection, fold_optional_fields, list,
    optional_str, required_str, scalar,
};
use crate::api::{ApiError, Params, Plan, Resource};
use serde_json::{Map, Value, json};

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
    scalar("content"),
    scalar("confidence"),
    scalar("x_opencti_reliability"),
    scalar("createdBy"),
    list("report_types"),
    list("objectMarking"),
    list("objectLabel"),
    list("objects"),
    list("externalReferences"),
];

static CREATE: Document = Document {
    name: "ReportAdd",
    query: r#"
        mutation ReportAdd($input: ReportAddInput!) {
            reportAdd(input: $input) {
                id
                standard_id
                entity_type
                name
                description
                content
                published
                report_types
                confidence
                created_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["reportAdd"],
};

static GET: Document = Document {
    name: "Report",
    query: r#"
        query Report($id: String!) {
            report(id: $id) {
                id
                standard_id
                entity_type
                name
                description
                content
                published
                report_types
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
    path: &["report"],
};

static SEARCH: Document = Document {
    name: "Reports",
    query: r#"
        query Reports($first: Int, $search: String, $orderBy: ReportsOrdering, $orderMode: OrderingMode, $filters: FilterGroup) {
            reports(first: $first, search: $search, orderBy: $orderBy, orderMode: $orderMode, filters: $filters) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        name
                        description
                        published
                        report_types
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
    path: &["reports"],
};

static UPDATE: Document = Document {
    name: "ReportEdit",
    query: r#"
        mutation ReportEdit($id: ID!, $input: [EditInput]!) {
            reportEdit(id: $id) {
                fieldPatch(input: $input) {
                    id
                    standard_id
                    name
                    description
                    content
                    published
                    confidence
                    updated_at
                }
            }
        }
    "#,
    path: &["reportEdit", "fieldPatch"],
};

static DELETE: Document = Document {
    name: "ReportEdit",
    query: r#"
        mutation ReportEdit($id: ID!) {
            reportEdit(id: $id) {
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
    input.insert(
        "published".to_string(),
        Value::String(to_iso_date(&required_str(params, "published")?)),
    );
    fold_optional_fields(&mut input, &collection(params, ADDITIONAL_FIELDS)?, &OPTIONAL_FIELDS)?;
    Ok(CREATE.fetch(input_variables(input)))
}

fn get(params: &Params) -> Result<Plan, ApiError> {
    get_by_id(params, Resource::Report, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    let options = collection(params, SEARCH_OPTIONS)?;
    let mut variables = search_variables(params)?;
    insert_ordering(&mut variables, &options)?;
    if let Some(report_type) = optional_str(&options, "reportType")? {
        let filters = build_filter_group(
            vec![FilterCriterion::eq("report_types", vec![report_type])],
            FilterMode::And,
        );
        variables.insert("filters".to_string(), json!(filters));
    }
    Ok(SEARCH.fetch(variables))
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    update_by_id(params, Resource::Report, &UPDATE, EmptyUpdate::Sentinel)
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Report, &DELETE)
}
