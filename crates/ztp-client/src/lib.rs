//! ZTP Kubernetes Client
//!
//! The narrow slice of the Kubernetes API used by the AZTP extractor:
//! ConfigMap get/create/delete and listing of child `Policy` objects.
//!
//! The reconciler only sees [`ZtpClientTrait`]; production code plugs in
//! [`ZtpClient`], and tests enable the `test-util` feature to use
//! `MockZtpClient`.
//!
//! # Example
//!
//! ```no_run
//! use ztp_client::{ZtpClient, ZtpClientTrait};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ZtpClient::new(kube::Client::try_default().await?);
//! let policies = client.list_policies("cnfdf12").await?;
//! match client.get_config_map("cnfdf12", "cnfdf12-aztp").await {
//!     Ok(_) => println!("artifact present"),
//!     Err(e) if e.is_not_found() => println!("artifact missing, {} policies", policies.len()),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod ztp_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::ZtpClient;
pub use error::ZtpClientError;
pub use ztp_trait::ZtpClientTrait;
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockCall, MockOperation, MockZtpClient};
