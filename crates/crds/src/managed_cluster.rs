//! ManagedCluster CRD
//!
//! Cluster-scoped inventory record of a managed endpoint. The record name is
//! also the namespace holding the cluster's child policies.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label selecting the accelerated provisioning variant of a cluster.
pub const AZTP_VARIANT_LABEL: &str = "ztp-accelerated-provisioning";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "cluster.open-cluster-management.io",
    version = "v1",
    kind = "ManagedCluster",
    status = "ManagedClusterStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterSpec {
    /// Whether the hub accepts the cluster's registration
    #[serde(default)]
    pub hub_accepts_client: bool,

    /// API server endpoints of the managed cluster
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managed_cluster_client_configs: Vec<ClientConfig>,

    /// Lease renewal interval reported by the registration agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_duration_seconds: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// API server URL
    #[serde(default)]
    pub url: String,

    /// Base64 CA bundle for the API server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterStatus {
    /// Reported Kubernetes version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ManagedClusterVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct ManagedClusterVersion {
    #[serde(default)]
    pub kubernetes: String,
}

/// Delivery mode requested through [`AZTP_VARIANT_LABEL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AztpVariant {
    /// Bootstrap set plus the extracted policy objects
    Full,
    /// Extracted policy objects only
    Policies,
}

impl AztpVariant {
    /// Parses a label value; anything other than `full` or `policies` is not a variant.
    #[must_use]
    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "full" => Some(Self::Full),
            "policies" => Some(Self::Policies),
            _ => None,
        }
    }

    /// Label value for this variant
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Policies => "policies",
        }
    }
}

impl fmt::Display for AztpVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ManagedCluster {
    /// Variant requested by the cluster's labels, if any.
    #[must_use]
    pub fn aztp_variant(&self) -> Option<AztpVariant> {
        self.metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(AZTP_VARIANT_LABEL))
            .and_then(|value| AztpVariant::from_label(value))
    }
}
