//! ZtpClient trait for mocking
//!
//! This trait abstracts the Kubernetes calls made by the AZTP reconciler so
//! unit tests can run against an in-memory implementation.

use crate::error::ZtpClientError;
use crds::Policy;
use k8s_openapi::api::core::v1::ConfigMap;

/// Trait for the Kubernetes API operations of the AZTP reconciler
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ZtpClientTrait: Send + Sync {
    /// Fetch a ConfigMap by name; a missing object is `ZtpClientError::NotFound`.
    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<ConfigMap, ZtpClientError>;

    /// Create a ConfigMap; a name collision is `ZtpClientError::AlreadyExists`.
    async fn create_config_map(&self, namespace: &str, config_map: &ConfigMap) -> Result<ConfigMap, ZtpClientError>;

    /// Delete a ConfigMap by name; a missing object is `ZtpClientError::NotFound`.
    async fn delete_config_map(&self, namespace: &str, name: &str) -> Result<(), ZtpClientError>;

    /// List every Policy in a namespace, without a selector.
    async fn list_policies(&self, namespace: &str) -> Result<Vec<Policy>, ZtpClientError>;
}
