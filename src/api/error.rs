use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP status failure, surfaced as reqwest reports it.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("OpenCTI API Error: {0}")]
    GraphQl(String),

    #[error("Invalid OpenCTI url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("The operation \"{operation}\" is not supported for resource \"{resource}\"")]
    UnsupportedOperation { resource: String, operation: String },
}

impl ApiError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ApiError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
