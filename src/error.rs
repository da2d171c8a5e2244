//! Error types for the Storyblok provider.

use thiserror::Error;

use crate::schema::Diagnostic;

/// Errors that can occur while serving a provider operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An HTTP transport error occurred.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A composite identifier could not be parsed.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The management API answered without the expected entity.
    #[error("{0} is nil")]
    MissingEntity(&'static str),

    /// The management API call failed.
    ///
    /// Carries the two-part message shown to the user: a short summary and
    /// a detail with the status code and response body.
    #[error("{summary}: {detail}")]
    Api {
        /// Short title, e.g. `Error creating component`.
        summary: String,
        /// Detailed cause.
        detail: String,
    },
}

impl ProviderError {
    /// Get the error message as a string.
    ///
    /// Returns a reference to the error message for any variant that carries one.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg) => msg,
            Self::Validation(msg) => msg,
            Self::Configuration(msg) => msg,
            Self::UnknownResource(msg) => msg,
            Self::Serialization(_err) => "serialization error (see Debug output)",
            Self::Transport(_err) => "transport error (see Debug output)",
            Self::InvalidIdentifier(msg) => msg,
            Self::MissingEntity(kind) => kind,
            Self::Api { detail, .. } => detail,
        }
    }

    /// Render the error as an error diagnostic.
    ///
    /// API failures keep their summary/detail split; every other variant
    /// uses the display string as the summary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Api { summary, detail } => {
                Diagnostic::error(summary.clone()).with_detail(detail.clone())
            }
            other => Diagnostic::error(other.to_string()),
        }
    }
}

/// The management API operation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    /// POST of a new entity.
    Create,
    /// GET of an entity by id.
    Read(i64),
    /// PUT of an existing entity.
    Update,
    /// DELETE of an existing entity.
    Delete,
}

impl ApiOperation {
    fn summary(self, name: &str) -> String {
        match self {
            Self::Create => format!("Error creating {}", name),
            Self::Read(id) => format!("Error retrieving {} with id {}", name, id),
            Self::Update => format!("Error updating {}", name),
            Self::Delete => format!("Error deleting {}", name),
        }
    }

    fn failure(self, name: &str) -> String {
        match self {
            Self::Create => format!("Could not create {}", name),
            Self::Read(id) => format!("Could not retrieve {} with id {}", name, id),
            Self::Update => format!("Could not update {}", name),
            Self::Delete => format!("Could not delete {}", name),
        }
    }

    /// Build the error for a request that never produced a response.
    pub fn transport_error(self, name: &str, err: &ProviderError) -> ProviderError {
        ProviderError::Api {
            summary: self.summary(name),
            detail: format!("{}, unexpected error: {}", self.failure(name), err),
        }
    }

    /// Build the error for a response with an unexpected status code.
    pub fn status_error(self, name: &str, status: u16, body: &[u8]) -> ProviderError {
        let body = if body.is_empty() {
            "(no response body)".to_string()
        } else {
            String::from_utf8_lossy(body).into_owned()
        };
        ProviderError::Api {
            summary: self.summary(name),
            detail: format!("{}, status code: {} ({})", self.failure(name), status, body),
        }
    }
}
