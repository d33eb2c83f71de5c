//! ZTP client errors

use thiserror::Error;

/// Errors that can occur when talking to the Kubernetes API
#[derive(Debug, Error)]
pub enum ZtpClientError {
    /// The API server answered 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API server answered 409 on create
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The API server rejected the request
    #[error("Kubernetes API error: {0}")]
    Api(String),

    /// Transport, TLS or decoding failure below the API status layer
    #[error("Kubernetes client error: {0}")]
    Kube(#[from] kube::Error),
}

impl ZtpClientError {
    /// Classifies a kube error for the resource described by `what`.
    pub fn from_kube(error: kube::Error, what: &str) -> Self {
        match error {
            kube::Error::Api(ae) if ae.code == 404 => Self::NotFound(what.to_string()),
            kube::Error::Api(ae) if ae.code == 409 => Self::AlreadyExists(what.to_string()),
            kube::Error::Api(ae) => {
                Self::Api(format!("{what}: {} ({}): {}", ae.code, ae.reason, ae.message))
            }
            other => Self::Kube(other),
        }
    }

    /// Whether the error is a 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the error is a 409.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}
