//! Per-role capacity aggregation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::CapacityError;
use crate::model::{ClusterCapacityData, WorkloadTotals};
use crate::query::{ClusterQuery, PodFilter};
use crate::roles::node_roles;

/// One aggregate record per node role, plus the role names in their stable
/// output order (lexicographic, which puts `<none>` first).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeRoleCapacity {
    pub by_role: BTreeMap<String, ClusterCapacityData>,
    pub role_names: Vec<String>,
}

/// Produce one aggregate record per distinct role label.
///
/// Each node's roles are derived from its labels, then the node's full
/// contribution (counts, capacity, allocatable, pod counts, request/limit
/// sums) is folded into every role it belongs to. A node with k roles
/// contributes identically to all k records; nothing is divided.
///
/// Two pod queries are issued per node (raw and non-terminated). That is
/// O(2N) API calls for N nodes, a known scaling cost kept for its simple,
/// directly observable per-node semantics.
pub async fn node_role_capacity(
    query: &dyn ClusterQuery,
) -> Result<NodeRoleCapacity, CapacityError> {
    let mut by_role: BTreeMap<String, ClusterCapacityData> = BTreeMap::new();

    let nodes = query.list_nodes().await?;
    for node in &nodes {
        let name = node.metadata.name.as_deref().unwrap_or_default();
        let roles = node_roles(node);
        debug!(node = name, roles = ?roles, "derived node roles");

        let node_pods = query.list_pods(&PodFilter::on_node(name)?).await?;
        let non_terminated = query
            .list_pods(&PodFilter::on_node(name)?.non_terminated())
            .await?;
        let workload = WorkloadTotals::from_pods(&non_terminated)?;

        for role in roles {
            let data = by_role.entry(role).or_default();
            data.accumulate_node(node)?;
            data.total_pod_count += node_pods.len() as i64;
            data.total_non_term_pod_count += non_terminated.len() as i64;
            data.accumulate_workload(&workload);
        }
    }

    for data in by_role.values_mut() {
        data.finalize();
    }

    let role_names: Vec<String> = by_role.keys().cloned().collect();
    Ok(NodeRoleCapacity {
        by_role,
        role_names,
    })
}
