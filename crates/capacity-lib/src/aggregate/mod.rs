//! Capacity report generators.
//!
//! Two generators share the accumulation model in [`crate::model`]: the
//! cluster generator produces one record for the whole cluster, the
//! node-role generator produces one record per role label observed across
//! the nodes. Both run as a single synchronous pass of sequential queries
//! and abort on the first failure; no partial report is ever returned.

mod cluster;
mod node_role;


pub use cluster::cluster_capacity;
pub use node_role::{node_role_capacity, NodeRoleCapacity};
