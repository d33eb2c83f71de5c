//! AZTP Extractor
//!
//! Watches ManagedCluster resources on the hub. For every cluster labelled
//! `ztp-accelerated-provisioning=full|policies`, the Kubernetes objects carried
//! by the child policies in the cluster namespace are packed into a single
//! `<cluster>-aztp` ConfigMap, ready for accelerated provisioning.

mod config;
mod controller;
mod error;
mod extractor;
mod object;
mod reconciler;
mod templates;
mod watcher;
mod wrapper;

#[cfg(test)]
mod test_utils;

use crate::config::Config;
use crate::error::ControllerError;
use controller::Controller;
use kube::Client;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("A rustls crypto provider was already installed");
    }

    info!("Starting AZTP extractor");

    let config = Config::from_env();
    config.log_summary();

    let kube_config = kube::Config::incluster().map_err(|e| {
        error!("Failed to load in-cluster credentials: {}", e);
        ControllerError::InvalidConfig(format!("in-cluster credentials unavailable: {e}"))
    })?;
    let client = Client::try_from(kube_config)?;

    let controller = Controller::new(client, config);
    controller.run(shutdown_signal()).await?;

    info!("AZTP extractor stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}
