//! Capacity aggregation library for kubesize
//!
//! This crate provides the core reporting pipeline:
//! - Exact resource-quantity arithmetic (milli-unit integers, no floats)
//! - The aggregate capacity record and its accumulation rules
//! - Node role derivation from labels
//! - The cluster query abstraction over the Kubernetes API
//! - The cluster-wide and per-node-role report generators
//!
//! Rendering and CLI wiring live in the `kubesize` binary crate.

pub mod aggregate;
pub mod error;
pub mod model;
pub mod quantity;
pub mod query;
pub mod roles;

pub use aggregate::{cluster_capacity, node_role_capacity, NodeRoleCapacity};
pub use error::CapacityError;
pub use model::{ClusterCapacityData, WorkloadTotals};
pub use quantity::{QuantityError, ResourceAmount};
pub use query::{ClusterQuery, KubeClusterQuery, PodFilter};
pub use roles::{node_roles, ROLE_NONE};
