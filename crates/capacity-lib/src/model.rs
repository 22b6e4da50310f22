//! The aggregate capacity record and its accumulation rules.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Node, Pod};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::Serialize;

use crate::quantity::{QuantityError, ResourceAmount};

/// Look up a named resource in a capacity/allocatable/requests map.
///
/// A missing entry is zero, matching the API convention that absent
/// resources contribute nothing.
fn amount(
    resources: Option<&BTreeMap<String, Quantity>>,
    name: &str,
) -> Result<ResourceAmount, QuantityError> {
    resources
        .and_then(|r| r.get(name))
        .map(ResourceAmount::parse_quantity)
        .unwrap_or(Ok(ResourceAmount::ZERO))
}

/// Request and limit sums over a set of pods.
///
/// Computed once per pod set so the node-role generator can fan a node's
/// contribution into several role buckets without re-walking containers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadTotals {
    pub requests_cpu: ResourceAmount,
    pub requests_memory: ResourceAmount,
    pub limits_cpu: ResourceAmount,
    pub limits_memory: ResourceAmount,
}

impl WorkloadTotals {
    /// Sum container requests and limits across `pods`.
    ///
    /// Callers are expected to pass only non-terminated pods; this function
    /// does not filter by phase.
    pub fn from_pods(pods: &[Pod]) -> Result<Self, QuantityError> {
        let mut totals = WorkloadTotals::default();
        for pod in pods {
            let containers = pod.spec.as_ref().map(|s| s.containers.as_slice());
            for container in containers.unwrap_or_default() {
                let Some(resources) = container.resources.as_ref() else {
                    continue;
                };
                totals.requests_cpu += amount(resources.requests.as_ref(), "cpu")?;
                totals.requests_memory += amount(resources.requests.as_ref(), "memory")?;
                totals.limits_cpu += amount(resources.limits.as_ref(), "cpu")?;
                totals.limits_memory += amount(resources.limits.as_ref(), "memory")?;
            }
        }
        Ok(totals)
    }
}

/// One aggregate capacity record, for the whole cluster or for one node role.
///
/// Populated in a single pass, finalized once with [`finalize`], then handed
/// to a renderer. Nothing is persisted between invocations.
///
/// [`finalize`]: ClusterCapacityData::finalize
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterCapacityData {
    pub total_node_count: i64,
    pub total_ready_node_count: i64,
    pub total_unready_node_count: i64,
    pub total_unschedulable_node_count: i64,

    /// Raw pod count, terminated pods included.
    pub total_pod_count: i64,
    /// Pods whose phase is neither Succeeded nor Failed; this is the set
    /// feeding the request and limit sums.
    pub total_non_term_pod_count: i64,
    /// Allocatable pod slots minus non-terminated pods. Negative means the
    /// cluster is overcommitted on pod slots; never clamped.
    pub total_available_pods: i64,

    pub total_capacity_pods: ResourceAmount,
    pub total_capacity_cpu: ResourceAmount,
    pub total_capacity_memory: ResourceAmount,

    pub total_allocatable_pods: ResourceAmount,
    pub total_allocatable_cpu: ResourceAmount,
    pub total_allocatable_memory: ResourceAmount,

    pub total_requests_cpu: ResourceAmount,
    pub total_requests_memory: ResourceAmount,
    pub total_limits_cpu: ResourceAmount,
    pub total_limits_memory: ResourceAmount,

    /// Allocatable minus requested. May be negative (overcommit), never
    /// clamped.
    pub total_available_cpu: ResourceAmount,
    pub total_available_memory: ResourceAmount,
}

impl ClusterCapacityData {
    /// Fold one node's counts, capacity and allocatable into the record.
    ///
    /// The unready count is always recomputed as `total - ready` rather than
    /// accumulated on its own, so the two can never drift apart.
    pub fn accumulate_node(&mut self, node: &Node) -> Result<(), QuantityError> {
        self.total_node_count += 1;

        let status = node.status.as_ref();
        let conditions = status.and_then(|s| s.conditions.as_deref());
        if conditions
            .unwrap_or_default()
            .iter()
            .any(|c| c.type_ == "Ready" && c.status == "True")
        {
            self.total_ready_node_count += 1;
        }
        self.total_unready_node_count = self.total_node_count - self.total_ready_node_count;

        if node
            .spec
            .as_ref()
            .and_then(|s| s.unschedulable)
            .unwrap_or(false)
        {
            self.total_unschedulable_node_count += 1;
        }

        let capacity = status.and_then(|s| s.capacity.as_ref());
        self.total_capacity_pods += amount(capacity, "pods")?;
        self.total_capacity_cpu += amount(capacity, "cpu")?;
        self.total_capacity_memory += amount(capacity, "memory")?;

        let allocatable = status.and_then(|s| s.allocatable.as_ref());
        self.total_allocatable_pods += amount(allocatable, "pods")?;
        self.total_allocatable_cpu += amount(allocatable, "cpu")?;
        self.total_allocatable_memory += amount(allocatable, "memory")?;

        Ok(())
    }

    /// Fold request/limit sums into the record.
    pub fn accumulate_workload(&mut self, totals: &WorkloadTotals) {
        self.total_requests_cpu += totals.requests_cpu;
        self.total_requests_memory += totals.requests_memory;
        self.total_limits_cpu += totals.limits_cpu;
        self.total_limits_memory += totals.limits_memory;
    }

    /// Compute the derived available fields. Called exactly once, after all
    /// accumulation for the record is done.
    pub fn finalize(&mut self) {
        self.total_available_pods =
            self.total_allocatable_pods.to_whole() - self.total_non_term_pod_count;
        self.total_available_cpu = self.total_allocatable_cpu - self.total_requests_cpu;
        self.total_available_memory = self.total_allocatable_memory - self.total_requests_memory;
    }
}
