//! Test utilities for unit testing the extractor and reconciler
//!
//! This module provides helpers for creating cluster records, policies and
//! embedded object templates.

use crds::*;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Child policies of the `cnfdf12` reference cluster: 3 policies, 16 objects
const REFERENCE_POLICIES: &str = include_str!("testdata/cnfdf12-policies.yaml");

/// Helper to create a test ManagedCluster, optionally carrying the AZTP label
pub fn create_test_managed_cluster(name: &str, variant_label: Option<&str>) -> ManagedCluster {
    let labels = variant_label.map(|value| {
        BTreeMap::from([
            ("name".to_string(), name.to_string()),
            (AZTP_VARIANT_LABEL.to_string(), value.to_string()),
        ])
    });
    ManagedCluster {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels,
            ..Default::default()
        },
        spec: ManagedClusterSpec {
            hub_accepts_client: true,
            ..Default::default()
        },
        status: None,
    }
}

/// Helper to create a test child Policy from raw policy templates
pub fn create_test_policy(name: &str, namespace: &str, disabled: bool, templates: Vec<Value>) -> Policy {
    Policy {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: PolicySpec {
            disabled,
            remediation_action: Some("inform".to_string()),
            policy_templates: templates
                .into_iter()
                .map(|object_definition| PolicyTemplate { object_definition })
                .collect(),
        },
        status: None,
    }
}

/// Helper to create a raw ConfigurationPolicy template wrapping `objects`
pub fn create_test_configuration_policy(name: &str, objects: Vec<Value>) -> Value {
    let object_templates: Vec<Value> = objects
        .into_iter()
        .map(|object| json!({ "complianceType": "musthave", "objectDefinition": object }))
        .collect();
    json!({
        "apiVersion": "policy.open-cluster-management.io/v1",
        "kind": CONFIGURATION_POLICY_KIND,
        "metadata": { "name": name },
        "spec": {
            "remediationAction": "inform",
            "severity": "low",
            "object-templates": object_templates,
        },
    })
}

/// Helper to create a raw Kubernetes object
pub fn create_test_object(api_version: &str, kind: &str, name: &str, namespace: Option<&str>) -> Value {
    let mut metadata = json!({ "name": name });
    if let Some(namespace) = namespace {
        metadata["namespace"] = json!(namespace);
    }
    json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": metadata,
    })
}

/// Reference child policy set, moved into `namespace`
pub fn create_reference_policies(namespace: &str) -> Vec<Policy> {
    serde_yaml::Deserializer::from_str(REFERENCE_POLICIES)
        .map(|document| {
            let mut policy = Policy::deserialize(document).unwrap();
            policy.metadata.namespace = Some(namespace.to_string());
            policy
        })
        .collect()
}
