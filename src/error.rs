//! Error types for the Akeneo provider.

use thiserror::Error;

use crate::schema::Diagnostic;

/// Errors that can occur while serving a provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested entity was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The Akeneo API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The HTTP request could not be completed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token request was rejected.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value could not be converted between model and wire form.
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// The operation is not supported by the Akeneo API.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// An import id did not have the expected shape.
    #[error("Invalid import id: {0}")]
    InvalidImportId(String),

    /// One or more diagnostics already prepared for the host.
    #[error("{}", summarize(.0))]
    Diagnostics(Vec<Diagnostic>),
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.summary.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ProviderError {
    /// Get the error message as a string.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Authentication(msg)
            | Self::Configuration(msg)
            | Self::UnknownResource(msg)
            | Self::Mapping(msg)
            | Self::Unsupported(msg)
            | Self::InvalidImportId(msg) => msg.clone(),
            Self::Api { message, .. } => message.clone(),
            Self::Http(err) => err.to_string(),
            Self::Serialization(err) => err.to_string(),
            Self::Diagnostics(diagnostics) => summarize(diagnostics),
        }
    }

    /// Convert the error into host-facing diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            Self::Diagnostics(diagnostics) => diagnostics,
            Self::Configuration(msg) => vec![Diagnostic::error("Provider not configured correctly")
                .with_detail(msg)],
            Self::Unsupported(msg) => vec![Diagnostic::error(msg)],
            Self::InvalidImportId(msg) => {
                vec![Diagnostic::error("Unexpected Import Identifier").with_detail(msg)]
            },
            other => vec![Diagnostic::error(other.to_string())],
        }
    }
}
