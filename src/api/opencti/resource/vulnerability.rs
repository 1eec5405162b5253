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
const OPTIONAL_FIELDS: [OptionalField; 12] = [
    scalar("description"),
    scalar("confidence"),
    scalar("x_opencti_cvss_base_score"),
    scalar("x_opencti_cvss_base_severity"),
    scalar("x_opencti_cvss_vector_string"),
    scalar("x_opencti_cisa_kev"),
    scalar("x_opencti_epss_score"),
    scalar("x_opencti_epss_percentile"),
    scalar("createdBy"),
    list("x_opencti_cwe"),
    list("objectMarking"),
    list("objectLabel"),
];

static CREATE: Document = Document {
    name: "VulnerabilityAdd",
    query: r#"
        mutation VulnerabilityAdd($input: VulnerabilityAddInput!) {
            vulnerabilityAdd(input: $input) {
                id
                standard_id
                entity_type
                name
                description
                x_opencti_cvss_base_score
                x_opencti_cvss_base_severity
                x_opencti_cvss_vector_string
                x_opencti_cisa_kev
                x_opencti_epss_score
                x_opencti_epss_percentile
                confidence
                created_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["vulnerabilityAdd"],
};

static GET: Document = Document {
    name: "Vulnerability",
    query: r#"
        query Vulnerability($id: String!) {
            vulnerability(id: $id) {
                id
                standard_id
                entity_type
                name
                description
                x_opencti_aliases
                x_opencti_cvss_base_score
                x_opencti_cvss_base_severity
                x_opencti_cvss_vector_string
                x_opencti_cisa_kev
                x_opencti_epss_score
                x_opencti_epss_percentile
                x_opencti_cwe
                confidence
                created_at
                updated_at
                createdBy { id name }
                objectMarking { id definition }
                objectLabel { id value color }
            }
        }
    "#,
    path: &["vulnerability"],
};

static SEARCH: Document = Document {
    name: "Vulnerabilities",
    query: r#"
        query Vulnerabilities($first: Int, $search: String) {
            vulnerabilities(first: $first, search: $search, orderBy: created_at, orderMode: desc) {
                edges {
                    node {
                        id
                        standard_id
                        entity_type
                        name
                        description
                        x_opencti_cvss_base_score
                        x_opencti_cvss_base_severity
                        x_opencti_cisa_kev
                        x_opencti_epss_score
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
    path: &["vulnerabilities"],
};

static UPDATE: Document = Document {
    name: "VulnerabilityEdit",
    query: r#"
        mutation VulnerabilityEdit($id: ID!, $input: [EditInput]!) {
            vulnerabilityEdit(id: $id) {
                fieldPatch(input: $input) {
                    id
                    standard_id
                    name
                    description
                    x_opencti_cvss_base_score
                    x_opencti_cvss_base_severity
                    updated_at
                }
            }
        }
    "#,
    path: &["vulnerabilityEdit", "fieldPatch"],
};

static DELETE: Document = Document {
    name: "VulnerabilityEdit",
    query: r#"
        mutation VulnerabilityEdit($id: ID!) {
            vulnerabilityEdit(id: $id) {
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
    get_by_id(params, Resource::Vulnerability, &GET)
}

fn search(params: &Params) -> Result<Plan, ApiError> {
    search_by_term(params, &SEARCH)
}

fn update(params: &Params) -> Result<Plan, ApiError> {
    update_by_id(params, Resource::Vulnerability, &UPDATE, EmptyUpdate::Sentinel)
}

fn delete(params: &Params) -> Result<Plan, ApiError> {
    delete_by_id(params, Resource::Vulnerability, &DELETE)
}
