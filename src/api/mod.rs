use crate::config::SecretString;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

pub mod error;
pub mod opencti;
pub mod params;

pub use error::ApiError;

/// Caller supplied parameters of one work item, in insertion order.
pub type Params = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Observable,
    Report,
    Note,
    Task,
    ThreatActor,
    Label,
    Relationship,
    Indicator,
    Incident,
    Malware,
    Vulnerability,
}

impl Resource {
    pub const ALL: [Resource; 11] = [
        Resource::Observable,
        Resource::Report,
        Resource::Note,
        Resource::Task,
        Resource::ThreatActor,
        Resource::Label,
        Resource::Relationship,
        Resource::Indicator,
        Resource::Incident,
        Resource::Malware,
        Resource::Vulnerability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Observable => "observable",
            Resource::Report => "report",
            Resource::Note => "note",
            Resource::Task => "task",
            Resource::ThreatActor => "threatActor",
            Resource::Label => "label",
            Resource::Relationship => "relationship",
            Resource::Indicator => "indicator",
            Resource::Incident => "incident",
            Resource::Malware => "malware",
            Resource::Vulnerability => "vulnerability",
        }
    }

    /// Name of the parameter carrying the remote id, e.g. `threatActorId`.
    pub fn id_parameter(&self) -> String {
        format!("{}Id", self.as_str())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Get,
    Search,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::Search => "search",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationRequest {
    pub resource: Resource,
    pub operation: Operation,
    #[serde(default)]
    pub parameters: Params,
}

impl OperationRequest {
    pub fn new(resource: Resource, operation: Operation, parameters: Params) -> Self {
        Self {
            resource,
            operation,
            parameters,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_url: String,
    pub api_key: SecretString,
}

impl Credentials {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<SecretString>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        let base = self.api_url.strip_suffix('/').unwrap_or(&self.api_url);
        format!("{}/graphql", base)
    }
}

/// A GraphQL document ready to post: serializes as `{query, variables}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    #[serde(skip)]
    pub operation_name: &'static str,
    pub query: Cow<'static, str>,
    pub variables: Map<String, Value>,
}

impl GraphQlRequest {
    pub fn new(
        operation_name: &'static str,
        query: impl Into<Cow<'static, str>>,
        variables: Map<String, Value>,
    ) -> Self {
        Self {
            operation_name,
            query: query.into(),
            variables,
        }
    }
}

/// What a handler decided to do for one work item.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Send the request and return the value found at `path` inside `data`.
    Fetch {
        request: GraphQlRequest,
        path: &'static [&'static str],
    },
    /// Send the request and answer `{deleted: true, id}` whatever comes back.
    Acknowledge { request: GraphQlRequest, id: String },
    /// Nothing to send.
    Resolved(Value),
}

#[async_trait]
pub trait GraphQlApi: Send + Sync {
    /// One POST round trip. Returns the envelope `data` or the aggregated error.
    async fn query_fetch(&self, request: &GraphQlRequest) -> Result<Value, ApiError>;
}
