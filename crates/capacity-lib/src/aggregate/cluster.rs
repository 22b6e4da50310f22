//! Whole-cluster capacity aggregation.

use tracing::debug;

use crate::error::CapacityError;
use crate::model::{ClusterCapacityData, WorkloadTotals};
use crate::query::{ClusterQuery, PodFilter};

/// Produce one aggregate record for the entire cluster.
///
/// Nodes are folded first, then two pod listings follow: an unfiltered one
/// for the raw pod count (terminated pods included) and a non-terminated one
/// that feeds the request/limit sums. A pending pod with no node assignment
/// is part of the non-terminated set here even though a per-node query would
/// miss it, so cluster and node-role totals can legitimately diverge.
pub async fn cluster_capacity(
    query: &dyn ClusterQuery,
) -> Result<ClusterCapacityData, CapacityError> {
    let mut data = ClusterCapacityData::default();

    let nodes = query.list_nodes().await?;
    for node in &nodes {
        data.accumulate_node(node)?;
    }
    debug!(
        nodes = data.total_node_count,
        ready = data.total_ready_node_count,
        "accumulated nodes"
    );

    let all_pods = query.list_pods(&PodFilter::all()).await?;
    data.total_pod_count = all_pods.len() as i64;

    let non_terminated = query.list_pods(&PodFilter::all().non_terminated()).await?;
    data.total_non_term_pod_count = non_terminated.len() as i64;
    data.accumulate_workload(&WorkloadTotals::from_pods(&non_terminated)?);

    data.finalize();
    Ok(data)
}
