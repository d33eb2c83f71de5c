//! ManagedCluster watch loop.
//!
//! A single raw watch feeds add and delete events to the reconciler one at a
//! time. The loop only returns on failure or when the API server closes the
//! stream; reconnecting is up to the caller.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crds::ManagedCluster;
use futures::{Stream, StreamExt, TryStreamExt};
use kube::api::{Api, WatchEvent, WatchParams};
use std::pin::pin;
use tracing::{debug, error, info};

/// Watch event reduced to what the extractor acts on
#[derive(Debug, Clone)]
pub enum ClusterEvent {
    /// Cluster seen for the first time on this watch
    Add(ManagedCluster),
    /// Ignored: artifacts are only computed on add
    Modify(ManagedCluster),
    /// Cluster removed from the hub
    Delete(ManagedCluster),
    /// Error event sent by the API server
    Error(String),
}

impl ClusterEvent {
    /// Convert a raw watch event; bookmarks carry nothing and map to `None`.
    #[must_use]
    pub fn from_watch_event(event: WatchEvent<ManagedCluster>) -> Option<Self> {
        match event {
            WatchEvent::Added(cluster) => Some(Self::Add(cluster)),
            WatchEvent::Modified(cluster) => Some(Self::Modify(cluster)),
            WatchEvent::Deleted(cluster) => Some(Self::Delete(cluster)),
            WatchEvent::Bookmark(_) => None,
            WatchEvent::Error(e) => Some(Self::Error(format!(
                "{} ({}): {}",
                e.code, e.reason, e.message
            ))),
        }
    }
}

/// Watches ManagedCluster resources.
#[derive(Debug)]
pub struct Watcher {
    reconciler: Reconciler,
    managed_cluster_api: Api<ManagedCluster>,
}

impl Watcher {
    /// Creates a watcher feeding events from `managed_cluster_api` to `reconciler`.
    pub fn new(reconciler: Reconciler, managed_cluster_api: Api<ManagedCluster>) -> Self {
        Self {
            reconciler,
            managed_cluster_api,
        }
    }

    /// Open one watch on all ManagedClusters and process it until it ends.
    ///
    /// Resource version `0` makes the API server replay an add event for every
    /// existing cluster first.
    pub async fn watch_managed_clusters(&self) -> Result<(), ControllerError> {
        info!("watching ManagedClusters");
        let stream = self
            .managed_cluster_api
            .watch(&WatchParams::default(), "0")
            .await
            .map_err(|e| ControllerError::Watch(format!("failed to open watch: {e}")))?;

        let events = stream
            .map_err(|e| ControllerError::Watch(e.to_string()))
            .try_filter_map(|event| async move { Ok(ClusterEvent::from_watch_event(event)) });
        process_events(&self.reconciler, events).await
    }
}

/// Dispatch events serially to the reconciler.
///
/// Handler failures are logged and the loop moves on. A watch error event, a
/// transport error or the end of the stream stop the loop with
/// [`ControllerError::Watch`].
pub async fn process_events<S>(reconciler: &Reconciler, events: S) -> Result<(), ControllerError>
where
    S: Stream<Item = Result<ClusterEvent, ControllerError>>,
{
    let mut events = pin!(events);
    while let Some(event) = events.next().await {
        match event? {
            ClusterEvent::Add(cluster) => {
                if let Err(e) = reconciler.handle_add(&cluster).await {
                    error!("failed to handle addition of managedcluster {}: {}", display_name(&cluster), e);
                }
            }
            ClusterEvent::Delete(cluster) => {
                if let Err(e) = reconciler.handle_delete(&cluster).await {
                    error!("failed to handle deletion of managedcluster {}: {}", display_name(&cluster), e);
                }
            }
            ClusterEvent::Modify(cluster) => {
                debug!("ignoring modification of managedcluster {}", display_name(&cluster));
            }
            ClusterEvent::Error(message) => {
                return Err(ControllerError::Watch(format!("watcher error: {message}")));
            }
        }
    }
    Err(ControllerError::Watch("watch stream closed".to_string()))
}

fn display_name(cluster: &ManagedCluster) -> &str {
    cluster.metadata.name.as_deref().unwrap_or("<unnamed>")
}
