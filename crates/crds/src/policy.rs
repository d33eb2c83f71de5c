//! Policy CRD
//!
//! Child policy materialised by policy propagation into the namespace of a
//! managed cluster. Each policy carries an ordered list of opaque templates,
//! usually `ConfigurationPolicy` documents.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "policy.open-cluster-management.io",
    version = "v1",
    kind = "Policy",
    namespaced,
    status = "PolicyStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    /// Disabled policies are not propagated or enforced
    #[serde(default)]
    pub disabled: bool,

    /// `inform` or `enforce`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_action: Option<String>,

    /// Embedded policy templates, in declared order
    #[serde(rename = "policy-templates", default)]
    pub policy_templates: Vec<PolicyTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTemplate {
    /// Raw definition of the embedded policy object
    #[serde(default)]
    pub object_definition: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStatus {
    /// Aggregated compliance state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliant: Option<String>,
}

impl Policy {
    /// Whether the policy is switched off.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.spec.disabled
    }
}
