//! Mock ZtpClient for unit testing
//!
//! This module provides an in-memory implementation of `ZtpClientTrait` that
//! can be used in unit tests without a running API server. Every call is
//! recorded so tests can assert on the exact API traffic.

use crate::error::ZtpClientError;
use crate::ztp_trait::ZtpClientTrait;
use crds::Policy;
use k8s_openapi::api::core::v1::ConfigMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Operation kinds of the mock, used for call recording and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    /// `get_config_map`
    GetConfigMap,
    /// `create_config_map`
    CreateConfigMap,
    /// `delete_config_map`
    DeleteConfigMap,
    /// `list_policies`
    ListPolicies,
}

impl MockOperation {
    /// Whether the operation mutates cluster state.
    #[must_use]
    pub fn is_write(self) -> bool {
        matches!(self, Self::CreateConfigMap | Self::DeleteConfigMap)
    }
}

/// One recorded call: operation, namespace and object name (empty for lists)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// Trait method that was called
    pub operation: MockOperation,
    /// Namespace passed to the call
    pub namespace: String,
    /// Object name, empty for list calls
    pub name: String,
}

/// Mock ZtpClient for testing
///
/// ConfigMaps are keyed by `(namespace, name)`; policies keep insertion order.
#[derive(Clone, Default, Debug)]
pub struct MockZtpClient {
    config_maps: Arc<Mutex<BTreeMap<(String, String), ConfigMap>>>,
    policies: Arc<Mutex<Vec<Policy>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    failures: Arc<Mutex<HashMap<MockOperation, String>>>,
    create_race: Arc<Mutex<bool>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockZtpClient {
    /// Create an empty mock client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a policy to the mock store (for test setup)
    pub fn add_policy(&self, policy: Policy) {
        lock(&self.policies).push(policy);
    }

    /// Remove every policy with the given name from a namespace (for test setup)
    pub fn remove_policy(&self, namespace: &str, name: &str) {
        lock(&self.policies).retain(|p| {
            p.metadata.namespace.as_deref() != Some(namespace) || p.metadata.name.as_deref() != Some(name)
        });
    }

    /// Add a ConfigMap to the mock store without recording a call (for test setup)
    pub fn add_config_map(&self, config_map: ConfigMap) {
        let key = (
            config_map.metadata.namespace.clone().unwrap_or_default(),
            config_map.metadata.name.clone().unwrap_or_default(),
        );
        lock(&self.config_maps).insert(key, config_map);
    }

    /// Current stored ConfigMap, if any
    #[must_use]
    pub fn config_map(&self, namespace: &str, name: &str) -> Option<ConfigMap> {
        lock(&self.config_maps)
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Number of stored ConfigMaps across all namespaces
    #[must_use]
    pub fn config_map_count(&self) -> usize {
        lock(&self.config_maps).len()
    }

    /// Make every call of `operation` fail with an API error
    pub fn fail(&self, operation: MockOperation, message: impl Into<String>) {
        lock(&self.failures).insert(operation, message.into());
    }

    /// Stop injecting failures for `operation`
    pub fn clear_failure(&self, operation: MockOperation) {
        lock(&self.failures).remove(&operation);
    }

    /// Simulate a competing writer: the next creates find the object already
    /// written by someone else and answer 409.
    pub fn simulate_create_race(&self, enabled: bool) {
        *lock(&self.create_race) = enabled;
    }

    /// All recorded calls, in order
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Recorded calls of one operation
    #[must_use]
    pub fn calls_of(&self, operation: MockOperation) -> Vec<MockCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    /// Recorded mutating calls
    #[must_use]
    pub fn writes(&self) -> Vec<MockCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.operation.is_write())
            .cloned()
            .collect()
    }

    fn record(&self, operation: MockOperation, namespace: &str, name: &str) -> Result<(), ZtpClientError> {
        lock(&self.calls).push(MockCall {
            operation,
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        match lock(&self.failures).get(&operation) {
            Some(message) => Err(ZtpClientError::Api(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ZtpClientTrait for MockZtpClient {
    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<ConfigMap, ZtpClientError> {
        self.record(MockOperation::GetConfigMap, namespace, name)?;
        self.config_map(namespace, name)
            .ok_or_else(|| ZtpClientError::NotFound(format!("ConfigMap {namespace}/{name}")))
    }

    async fn create_config_map(&self, namespace: &str, config_map: &ConfigMap) -> Result<ConfigMap, ZtpClientError> {
        let name = config_map.metadata.name.clone().unwrap_or_default();
        self.record(MockOperation::CreateConfigMap, namespace, &name)?;

        let key = (namespace.to_string(), name.clone());
        let mut stored = lock(&self.config_maps);
        if *lock(&self.create_race) {
            stored.entry(key).or_insert_with(|| config_map.clone());
            return Err(ZtpClientError::AlreadyExists(format!("ConfigMap {namespace}/{name}")));
        }
        if stored.contains_key(&key) {
            return Err(ZtpClientError::AlreadyExists(format!("ConfigMap {namespace}/{name}")));
        }
        let mut created = config_map.clone();
        created.metadata.namespace = Some(namespace.to_string());
        stored.insert(key, created.clone());
        Ok(created)
    }

    async fn delete_config_map(&self, namespace: &str, name: &str) -> Result<(), ZtpClientError> {
        self.record(MockOperation::DeleteConfigMap, namespace, name)?;
        lock(&self.config_maps)
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| ZtpClientError::NotFound(format!("ConfigMap {namespace}/{name}")))
    }

    async fn list_policies(&self, namespace: &str) -> Result<Vec<Policy>, ZtpClientError> {
        self.record(MockOperation::ListPolicies, namespace, "")?;
        Ok(lock(&self.policies)
            .iter()
            .filter(|p| p.metadata.namespace.as_deref() == Some(namespace))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn config_map(namespace: &str, name: &str) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let client = MockZtpClient::new();
        let cm = config_map("c1", "c1-aztp");

        assert!(client.get_config_map("c1", "c1-aztp").await.unwrap_err().is_not_found());
        client.create_config_map("c1", &cm).await.unwrap();
        assert!(client.get_config_map("c1", "c1-aztp").await.is_ok());
        assert!(client.create_config_map("c1", &cm).await.unwrap_err().is_already_exists());

        client.delete_config_map("c1", "c1-aztp").await.unwrap();
        assert!(client.delete_config_map("c1", "c1-aztp").await.unwrap_err().is_not_found());
        assert_eq!(client.writes().len(), 4);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let client = MockZtpClient::new();
        client.fail(MockOperation::ListPolicies, "etcd unavailable");
        let err = client.list_policies("c1").await.unwrap_err();
        assert!(matches!(err, ZtpClientError::Api(ref m) if m == "etcd unavailable"));

        client.clear_failure(MockOperation::ListPolicies);
        assert!(client.list_policies("c1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_race_stores_competitor_object() {
        let client = MockZtpClient::new();
        client.simulate_create_race(true);
        let err = client.create_config_map("c1", &config_map("c1", "c1-aztp")).await.unwrap_err();
        assert!(err.is_already_exists());
        assert!(client.config_map("c1", "c1-aztp").is_some());
    }
}
