//! Kubernetes-backed ZTP client
//!
//! Implements [`ZtpClientTrait`] on top of a `kube::Client` built from the
//! in-cluster service account credentials.

use crate::error::ZtpClientError;
use crate::ztp_trait::ZtpClientTrait;
use crds::Policy;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::Client;
use tracing::debug;

/// ZTP client over the Kubernetes API
#[derive(Clone)]
pub struct ZtpClient {
    client: Client,
}

impl std::fmt::Debug for ZtpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZtpClient").finish_non_exhaustive()
    }
}

impl ZtpClient {
    /// Create a new client sharing the given kube client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn config_maps(&self, namespace: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait::async_trait]
impl ZtpClientTrait for ZtpClient {
    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<ConfigMap, ZtpClientError> {
        debug!("Getting ConfigMap {}/{}", namespace, name);
        self.config_maps(namespace)
            .get(name)
            .await
            .map_err(|e| ZtpClientError::from_kube(e, &format!("ConfigMap {namespace}/{name}")))
    }

    async fn create_config_map(&self, namespace: &str, config_map: &ConfigMap) -> Result<ConfigMap, ZtpClientError> {
        let name = config_map.metadata.name.as_deref().unwrap_or_default();
        debug!("Creating ConfigMap {}/{}", namespace, name);
        self.config_maps(namespace)
            .create(&PostParams::default(), config_map)
            .await
            .map_err(|e| ZtpClientError::from_kube(e, &format!("ConfigMap {namespace}/{name}")))
    }

    async fn delete_config_map(&self, namespace: &str, name: &str) -> Result<(), ZtpClientError> {
        debug!("Deleting ConfigMap {}/{}", namespace, name);
        self.config_maps(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(|e| ZtpClientError::from_kube(e, &format!("ConfigMap {namespace}/{name}")))
    }

    async fn list_policies(&self, namespace: &str) -> Result<Vec<Policy>, ZtpClientError> {
        debug!("Listing policies in namespace {}", namespace);
        let api: Api<Policy> = Api::namespaced(self.client.clone(), namespace);
        api.list(&ListParams::default())
            .await
            .map(|list| list.items)
            .map_err(|e| ZtpClientError::from_kube(e, &format!("policies in {namespace}")))
    }
}
