//! Controller-specific error types.
//!
//! Every per-event failure ends up here, is logged by the watch loop, and
//! the loop moves on to the next event.

use thiserror::Error;
use kube::Error as KubeError;
use ztp_client::ZtpClientError;

/// Errors that can occur in the AZTP extractor.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes client construction or transport error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Kubernetes API call failed
    #[error("API error: {0}")]
    Client(#[from] ZtpClientError),

    /// Malformed policy template or embedded object
    #[error("Parse error: {0}")]
    Parse(String),

    /// Canonical serialization of an object failed
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Bootstrap manifest rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reconciliation failed
    #[error("Reconciliation failed: {0}")]
    Reconciliation(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
