use super::*;
use serde_json::{Map, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "0b4c0f5e-token";

fn api_for(server: &MockServer, suffix: &str) -> ApiOpenCTI {
    let credentials = Credentials::new(format!("{}{}", server.uri(), suffix), TOKEN);
    ApiOpenCTI::new(&credentials).unwrap()
}

fn label_request() -> GraphQlRequest {
    let mut variables = Map::new();
    variables.insert("id".to_string(), json!("l1"));
    GraphQlRequest::new("Label", "query Label($id: String!) { label(id: $id) { id } }", variables)
}

#[tokio::test]
async fn test_posts_query_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "query": "query Label($id: String!) { label(id: $id) { id } }",
            "variables": {"id": "l1"},
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"label": {"id": "l1"}}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, "/");
    assert_eq!(api.api_uri(), format!("{}/graphql", server.uri()));
    let data = api.query_fetch(&label_request()).await.unwrap();
    assert_eq!(data, json!({"label": {"id": "l1"}}));
}

#[tokio::test]
async fn test_graphql_errors_surface_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "bad input"}, {"message": "denied"}],
        })))
        .mount(&server)
        .await;

    let err = api_for(&server, "")
        .query_fetch(&label_request())
        .await
        .unwrap_err();
    assert!(matches!(&err, ApiError::GraphQl(_)));
    assert_eq!(err.to_string(), "OpenCTI API Error: bad input; denied");
}

#[tokio::test]
async fn test_http_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = api_for(&server, "")
        .query_fetch(&label_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_version() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_json(json!({"query": "{ about { version } }", "variables": {}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"about": {"version": "6.4.2"}}})),
        )
        .mount(&server)
        .await;

    assert_eq!(api_for(&server, "").version().await.unwrap(), "6.4.2");
}

#[tokio::test]
async fn test_non_object_error_entries_are_graphql_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": ["boom"]})))
        .mount(&server)
        .await;

    let err = api_for(&server, "")
        .query_fetch(&label_request())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "OpenCTI API Error: Unknown GraphQL error");
}

#[tokio::test]
async fn test_check_version_tolerates_unreachable_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let api = api_for(&server, "");
    assert_eq!(api.check_version().await, None);

    // Nothing listens on the discard port.
    let offline = ApiOpenCTI::new(&Credentials::new("http://127.0.0.1:9", TOKEN)).unwrap();
    assert_eq!(offline.check_version().await, None);
}

#[tokio::test]
async fn test_check_version_reports_version() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"about": {"version": "6.4.2"}}})),
        )
        .mount(&server)
        .await;
    assert_eq!(api_for(&server, "").check_version().await.as_deref(), Some("6.4.2"));
}

#[test]
fn test_invalid_url_rejected() {
    let result = ApiOpenCTI::new(&Credentials::new("not a url", TOKEN));
    assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
}
