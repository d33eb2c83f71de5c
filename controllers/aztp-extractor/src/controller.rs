//! Main controller implementation.
//!
//! The `Controller` owns the ManagedCluster watcher and reopens the watch
//! after `RETRY_TIME` whenever it ends, until shutdown is requested.

use crate::config::Config;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::Watcher;
use crds::ManagedCluster;
use kube::{Api, Client};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};
use ztp_client::ZtpClient;

/// AZTP extractor controller
#[derive(Debug)]
pub struct Controller {
    watcher: Watcher,
    retry_time: Duration,
}

impl Controller {
    /// Creates a new controller instance sharing one client between the
    /// ManagedCluster watch, ConfigMaps and Policies.
    pub fn new(client: Client, config: Config) -> Self {
        info!("Initializing AZTP extractor");
        let retry_time = config.retry_time;
        let reconciler = Reconciler::new(Box::new(ZtpClient::new(client.clone())), config);
        let managed_cluster_api: Api<ManagedCluster> = Api::all(client);
        Self {
            watcher: Watcher::new(reconciler, managed_cluster_api),
            retry_time,
        }
    }

    /// Run until `shutdown` resolves.
    pub async fn run<S>(&self, shutdown: S) -> Result<(), ControllerError>
    where
        S: Future<Output = ()>,
    {
        run_with(|| self.watcher.watch_managed_clusters(), self.retry_time, shutdown).await
    }
}

/// Outer loop: watch, wait `retry_time`, watch again. Both the watch and the
/// wait are abandoned as soon as `shutdown` resolves.
pub async fn run_with<F, Fut, S>(
    mut watch: F,
    retry_time: Duration,
    shutdown: S,
) -> Result<(), ControllerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), ControllerError>>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown requested, stopping ManagedCluster watch");
                return Ok(());
            }
            result = watch() => {
                let cause = match result {
                    Ok(()) => "watch ended".to_string(),
                    Err(e) => e.to_string(),
                };
                error!("managed cluster watcher exited: {}. will retry in {:?}", cause, retry_time);
            }
        }

        tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown requested while waiting to retry");
                return Ok(());
            }
            () = tokio::time::sleep(retry_time) => {}
        }
    }
}
