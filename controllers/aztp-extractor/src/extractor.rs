//! Policy extraction.
//!
//! Walks `Policy -> ConfigurationPolicy -> object template` and returns the
//! embedded Kubernetes objects with their status stripped. Extraction is all
//! or nothing: one malformed template fails the whole namespace.

use crate::error::ControllerError;
use crate::object::ExtractedObject;
use crds::{ConfigurationPolicy, Policy};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use ztp_client::ZtpClientTrait;

/// List every child policy in `namespace`.
pub async fn policies_for(
    client: &dyn ZtpClientTrait,
    namespace: &str,
) -> Result<Vec<Policy>, ControllerError> {
    Ok(client.list_policies(namespace).await?)
}

/// Extract the objects of all enabled policies, in policy, template and
/// object-template order.
pub fn objects_from(policies: &[Policy]) -> Result<Vec<ExtractedObject>, ControllerError> {
    let definitions = policies
        .iter()
        .filter(|policy| {
            if policy.is_disabled() {
                debug!("skipping disabled policy {}", policy_name(policy));
            }
            !policy.is_disabled()
        })
        .flat_map(|policy| {
            policy
                .spec
                .policy_templates
                .iter()
                .map(move |template| (policy, &template.object_definition))
        });

    let mut objects = Vec::new();
    for (policy, definition) in definitions {
        let config_policy = parse_configuration_policy(policy, definition)?;
        if !config_policy.is_configuration_policy() {
            debug!(
                "skipping {} template in policy {}",
                config_policy.kind.as_deref().unwrap_or_default(),
                policy_name(policy)
            );
            continue;
        }

        for object_template in config_policy.spec.object_templates {
            let mut object = ExtractedObject::from_value(object_template.object_definition)
                .map_err(|e| {
                    ControllerError::Parse(format!(
                        "policy {} template {}: {}",
                        policy_name(policy),
                        config_policy.metadata.name.as_deref().unwrap_or_default(),
                        e
                    ))
                })?;
            object.clear_status();
            objects.push(object);
        }
    }
    Ok(objects)
}

fn parse_configuration_policy(
    policy: &Policy,
    definition: &Value,
) -> Result<ConfigurationPolicy, ControllerError> {
    ConfigurationPolicy::deserialize(definition).map_err(|e| {
        ControllerError::Parse(format!(
            "policy {} has a malformed template: {}",
            policy_name(policy),
            e
        ))
    })
}

fn policy_name(policy: &Policy) -> String {
    format!(
        "{}/{}",
        policy.metadata.namespace.as_deref().unwrap_or_default(),
        policy.metadata.name.as_deref().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use serde_json::json;
    use ztp_client::{MockOperation, MockZtpClient};

    #[tokio::test]
    async fn test_policies_for_namespace() {
        let client = MockZtpClient::new();
        client.add_policy(create_test_policy("p1", "cnfdf12", false, vec![]));
        client.add_policy(create_test_policy("p2", "cnfdf12", true, vec![]));
        client.add_policy(create_test_policy("p3", "other", false, vec![]));

        let policies = policies_for(&client, "cnfdf12").await.unwrap();
        assert_eq!(policies.len(), 2);
        assert_eq!(client.calls_of(MockOperation::ListPolicies).len(), 1);
    }

    #[tokio::test]
    async fn test_policies_for_api_error() {
        let client = MockZtpClient::new();
        client.fail(MockOperation::ListPolicies, "forbidden");
        let err = policies_for(&client, "cnfdf12").await.unwrap_err();
        assert!(matches!(err, ControllerError::Client(_)));
    }

    #[test]
    fn test_order_and_status() {
        let policies = vec![
            create_test_policy(
                "first",
                "c1",
                false,
                vec![
                    create_test_configuration_policy(
                        "a",
                        vec![
                            create_test_object("v1", "Namespace", "ns-a", None),
                            create_test_object("sriovnetwork.openshift.io/v1", "SriovNetwork", "sn-a", Some("ns-a")),
                        ],
                    ),
                    create_test_configuration_policy(
                        "b",
                        vec![create_test_object("tuned.openshift.io/v1", "Tuned", "t-1", Some("tuning"))],
                    ),
                ],
            ),
            create_test_policy(
                "second",
                "c1",
                false,
                vec![create_test_configuration_policy(
                    "c",
                    vec![json!({
                        "apiVersion": "operators.coreos.com/v1alpha1",
                        "kind": "Subscription",
                        "metadata": { "name": "sub", "namespace": "openshift-ptp" },
                        "status": { "state": "AtLatestKnown" },
                    })],
                )],
            ),
        ];

        let objects = objects_from(&policies).unwrap();
        let names: Vec<_> = objects.iter().map(|o| o.name().unwrap()).collect();
        assert_eq!(names, ["ns-a", "sn-a", "t-1", "sub"]);
        for object in &objects {
            assert_eq!(object.body()["status"], json!({}));
        }
    }

    #[test]
    fn test_disabled_policies_are_skipped() {
        let policies = vec![
            create_test_policy(
                "off",
                "c1",
                true,
                vec![create_test_configuration_policy(
                    "a",
                    vec![create_test_object("tuned.openshift.io/v1", "Tuned", "t-1", None)],
                )],
            ),
            create_test_policy(
                "on",
                "c1",
                false,
                vec![create_test_configuration_policy(
                    "b",
                    vec![create_test_object("v1", "Namespace", "ns-b", None)],
                )],
            ),
        ];
        let objects = objects_from(&policies).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].name(), Some("ns-b"));
    }

    #[test]
    fn test_foreign_template_kinds_are_skipped() {
        let policies = vec![create_test_policy(
            "mixed",
            "c1",
            false,
            vec![
                json!({
                    "apiVersion": "policy.open-cluster-management.io/v1",
                    "kind": "CertificatePolicy",
                    "metadata": { "name": "certs" },
                    "spec": { "minimumDuration": "300h" },
                }),
                create_test_configuration_policy(
                    "cfg",
                    vec![create_test_object("v1", "Namespace", "ns-a", None)],
                ),
            ],
        )];
        let objects = objects_from(&policies).unwrap();
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn test_malformed_template_aborts_everything() {
        let policies = vec![
            create_test_policy(
                "good",
                "c1",
                false,
                vec![create_test_configuration_policy(
                    "a",
                    vec![create_test_object("v1", "Namespace", "ns-a", None)],
                )],
            ),
            create_test_policy(
                "bad",
                "c1",
                false,
                vec![json!({
                    "kind": "ConfigurationPolicy",
                    "spec": { "object-templates": "oops" },
                })],
            ),
        ];
        assert!(matches!(objects_from(&policies), Err(ControllerError::Parse(_))));
    }

    #[test]
    fn test_object_without_kind_aborts() {
        let policies = vec![create_test_policy(
            "bad-object",
            "c1",
            false,
            vec![create_test_configuration_policy(
                "a",
                vec![json!({ "apiVersion": "v1", "metadata": { "name": "nameless-kind" } })],
            )],
        )];
        assert!(matches!(objects_from(&policies), Err(ControllerError::Parse(_))));
    }

    #[test]
    fn test_reference_policy_set() {
        let objects = objects_from(&create_reference_policies("cnfdf12")).unwrap();
        assert_eq!(objects.len(), 16);
    }
}
