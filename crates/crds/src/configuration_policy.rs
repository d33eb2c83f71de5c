//! ConfigurationPolicy document
//!
//! The extractor never fetches configuration policies from the API server; it
//! only decodes them from the `objectDefinition` of a `Policy` template. The
//! type is therefore a plain serde document rather than a `CustomResource`,
//! and every field is optional so that foreign template kinds still decode.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Kind of the policy templates that embed Kubernetes objects.
pub const CONFIGURATION_POLICY_KIND: &str = "ConfigurationPolicy";

/// Policy template carrying Kubernetes objects
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationPolicy {
    /// Usually `policy.open-cluster-management.io/v1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Absent kinds are treated as `ConfigurationPolicy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Standard object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Remediation settings and object templates
    #[serde(default)]
    pub spec: ConfigurationPolicySpec,
}

/// ConfigurationPolicy spec
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationPolicySpec {
    /// `inform` or `enforce`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_action: Option<String>,

    /// `low`, `medium`, `high` or `critical`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Embedded Kubernetes objects, in declared order
    #[serde(rename = "object-templates", default)]
    pub object_templates: Vec<ObjectTemplate>,
}

/// One entry of `object-templates`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTemplate {
    /// `musthave`, `mustnothave` or `mustonlyhave`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_type: Option<String>,

    /// Raw Kubernetes object
    #[serde(default)]
    pub object_definition: serde_json::Value,
}

impl ConfigurationPolicy {
    /// False only when the document declares a different kind.
    #[must_use]
    pub fn is_configuration_policy(&self) -> bool {
        self.kind
            .as_deref()
            .is_none_or(|kind| kind == CONFIGURATION_POLICY_KIND)
    }
}
