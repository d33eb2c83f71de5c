//! Reconciliation of ManagedCluster add and delete events.
//!
//! One output ConfigMap, `<cluster>-aztp` in namespace `<cluster>`, is kept per
//! labelled cluster. It is created at most once: an existing artifact is never
//! touched, so refreshing one means deleting it and re-adding the cluster.

use crate::config::Config;
use crate::error::ControllerError;
use crate::extractor;
use crate::object::{classify, ExtractedObject};
use crate::templates::{self, TemplateParams};
use crate::wrapper;
use crds::{AztpVariant, ManagedCluster};
use k8s_openapi::api::core::v1::ConfigMap;
use std::fmt;
use tracing::{debug, info, warn};
use ztp_client::ZtpClientTrait;

/// Result of handling an add event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Cluster carries no usable variant label
    Ineligible,
    /// Artifact existed before this event
    AlreadyPresent,
    /// Artifact created by this event
    Created,
    /// Someone else created the artifact between the lookup and the create
    CreateRaced,
}

/// Name of the output ConfigMap of a cluster
#[must_use]
pub fn artifact_name(cluster_name: &str) -> String {
    format!("{cluster_name}-aztp")
}

/// Variant requested by a cluster, if it is eligible at all.
#[must_use]
pub fn eligible_variant(cluster: &ManagedCluster) -> Option<AztpVariant> {
    cluster.aztp_variant()
}

/// Reconciles output artifacts for managed clusters.
pub struct Reconciler {
    client: Box<dyn ZtpClientTrait>,
    config: Config,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Creates a reconciler talking to the hub through `client`.
    pub fn new(client: Box<dyn ZtpClientTrait>, config: Config) -> Self {
        Self { client, config }
    }

    /// Handle a ManagedCluster add event.
    pub async fn handle_add(&self, cluster: &ManagedCluster) -> Result<AddOutcome, ControllerError> {
        let cluster_name = cluster_name(cluster)?;
        info!("handling addition of managedcluster {}", cluster_name);

        let Some(variant) = eligible_variant(cluster) else {
            debug!("managedcluster {} is not labelled for AZTP, skipping", cluster_name);
            return Ok(AddOutcome::Ineligible);
        };
        info!("managedcluster {} is labelled for AZTP variant {}", cluster_name, variant);

        let target_name = artifact_name(cluster_name);
        match self.client.get_config_map(cluster_name, &target_name).await {
            Ok(_) => {
                info!(
                    "configmap {} already exists in {} namespace, skip policy extraction",
                    target_name, cluster_name
                );
                return Ok(AddOutcome::AlreadyPresent);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let policies = extractor::policies_for(self.client.as_ref(), cluster_name).await?;
        let objects = extractor::objects_from(&policies)?;
        info!(
            "found {} policies and {} objects for {}",
            policies.len(),
            objects.len(),
            cluster_name
        );

        let artifact = self.compose(cluster_name, variant, objects)?;
        match self.client.create_config_map(cluster_name, &artifact).await {
            Ok(_) => {
                info!("created configmap {} in {} namespace", target_name, cluster_name);
                Ok(AddOutcome::Created)
            }
            Err(e) if e.is_already_exists() => {
                warn!(
                    "configmap {} was created concurrently in {} namespace, keeping it",
                    target_name, cluster_name
                );
                Ok(AddOutcome::CreateRaced)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Handle a ManagedCluster delete event. The label is not consulted: the
    /// artifact may outlive a label change.
    pub async fn handle_delete(&self, cluster: &ManagedCluster) -> Result<(), ControllerError> {
        let cluster_name = cluster_name(cluster)?;
        info!("handling deletion of managedcluster {}", cluster_name);

        let target_name = artifact_name(cluster_name);
        match self.client.delete_config_map(cluster_name, &target_name).await {
            Ok(()) => {
                info!("deleted configmap {} in {} namespace", target_name, cluster_name);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("configmap {} not found in {} namespace", target_name, cluster_name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Build the output artifact from extracted objects.
    ///
    /// Direct kinds go to the outer ConfigMap, followed by the bootstrap set
    /// for [`AztpVariant::Full`] and finally the inner ConfigMap holding every
    /// other object.
    pub fn compose(
        &self,
        cluster_name: &str,
        variant: AztpVariant,
        objects: Vec<ExtractedObject>,
    ) -> Result<ConfigMap, ControllerError> {
        let mut classified = classify(objects);

        if variant == AztpVariant::Full {
            let bootstrap = templates::render(&TemplateParams::from_config(&self.config))?;
            debug!("adding {} bootstrap objects for {}", bootstrap.len(), cluster_name);
            classified.direct.extend(bootstrap);
        }

        let inner = wrapper::wrap(
            &classified.wrapped,
            &self.config.inner_config_map_name,
            &self.config.inner_config_map_namespace,
        )?;
        classified.direct.push(wrapper::config_map_to_object(&inner)?);

        wrapper::wrap(&classified.direct, &artifact_name(cluster_name), cluster_name)
    }
}

fn cluster_name(cluster: &ManagedCluster) -> Result<&str, ControllerError> {
    cluster
        .metadata
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ControllerError::Reconciliation("managedcluster has no name".to_string()))
}

#[cfg(test)]
#[path = "reconciler_test.rs"]
mod reconciler_test;
