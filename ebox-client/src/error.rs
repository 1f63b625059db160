//! Error types for the box platform client

use ebox_core::error::ModelConversionError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the box platform
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Platform answered with a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Body was not the JSON we asked for
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Box or other resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The instance behind a resource URL is gone
    #[error("Instance {resource_url} not found")]
    InstanceNotFound { resource_url: String },

    /// The instance record could not be read as a deployment status
    #[error("Unreadable instance {resource_url}: {source}")]
    InvalidInstance {
        resource_url: String,
        #[source]
        source: ModelConversionError,
    },

    /// A deploy was accepted but the response names no instance to follow
    #[error("Deployment of profile {profile} was accepted without an instance `uri` or `id`")]
    MissingResourceUrl { profile: String },

    /// Rejected locally, nothing was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::InstanceNotFound { .. } | Self::ApiError { status: 404, .. }
        )
    }

    /// 4xx answers
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if (400..500).contains(status))
    }

    /// 5xx answers
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Resource URL of the instance this error is about, if any
    pub fn resource_url(&self) -> Option<&str> {
        match self {
            Self::InstanceNotFound { resource_url } | Self::InvalidInstance { resource_url, .. } => {
                Some(resource_url)
            }
            _ => None,
        }
    }
}
