//! AZTP CRD Definitions
//!
//! Typed views of the Open Cluster Management resources the AZTP extractor
//! reads. None of these are owned by the extractor: `ManagedCluster` comes from
//! cluster registration, `Policy` from policy propagation, and
//! `ConfigurationPolicy` is only ever found embedded inside a `Policy`.

pub mod managed_cluster;
pub mod policy;
pub mod configuration_policy;

pub use managed_cluster::*;
pub use policy::*;
pub use configuration_policy::*;
