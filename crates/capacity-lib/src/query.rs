//! Cluster query abstraction.
//!
//! The report generators only need two operations: list nodes and list pods
//! under a filter. They are behind the [`ClusterQuery`] trait so the
//! aggregation logic can be driven by an in-memory fake in tests while the
//! binary plugs in [`KubeClusterQuery`] over a live API connection.

use std::fmt;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Api, ListParams};
use kube::Client;
use tracing::debug;

use crate::error::CapacityError;

/// Which pods a listing should return.
///
/// Renders to a Kubernetes field selector; the non-terminated form excludes
/// the Succeeded and Failed phases, matching what `kubectl describe node`
/// counts against allocatable.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PodFilter {
    node_name: Option<String>,
    non_terminated_only: bool,
}

impl PodFilter {
    /// Every pod, terminated ones included.
    pub fn all() -> Self {
        PodFilter::default()
    }

    /// Restrict the listing to pods assigned to one node.
    ///
    /// Fails if the name cannot appear as a field selector value. Node names
    /// are DNS labels so this should be unreachable, but a malformed name
    /// must abort the report rather than silently select nothing.
    pub fn on_node(node_name: &str) -> Result<Self, CapacityError> {
        if node_name.is_empty()
            || node_name
                .chars()
                .any(|c| matches!(c, ',' | '=' | '!') || c.is_whitespace())
        {
            return Err(CapacityError::FieldSelector(node_name.to_string()));
        }
        Ok(PodFilter {
            node_name: Some(node_name.to_string()),
            non_terminated_only: false,
        })
    }

    /// Additionally exclude pods in the Succeeded or Failed phase.
    pub fn non_terminated(mut self) -> Self {
        self.non_terminated_only = true;
        self
    }

    /// Whether this filter excludes terminated pods.
    pub fn is_non_terminated(&self) -> bool {
        self.non_terminated_only
    }

    /// The node this filter is scoped to, if any.
    pub fn node_name(&self) -> Option<&str> {
        self.node_name.as_deref()
    }

    /// The field selector string for the API server, if any restriction
    /// applies.
    pub fn field_selector(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(node) = &self.node_name {
            parts.push(format!("spec.nodeName={node}"));
        }
        if self.non_terminated_only {
            parts.push("status.phase!=Succeeded".to_string());
            parts.push("status.phase!=Failed".to_string());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(","))
        }
    }
}

impl fmt::Display for PodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.node_name, self.non_terminated_only) {
            (None, false) => write!(f, "all"),
            (None, true) => write!(f, "non-terminated"),
            (Some(node), false) => write!(f, "node {node}"),
            (Some(node), true) => write!(f, "node {node}, non-terminated"),
        }
    }
}

/// Read-only view of the cluster inventory.
#[async_trait]
pub trait ClusterQuery: Send + Sync {
    /// List every node in the cluster.
    async fn list_nodes(&self) -> Result<Vec<Node>, CapacityError>;

    /// List pods matching `filter`.
    async fn list_pods(&self, filter: &PodFilter) -> Result<Vec<Pod>, CapacityError>;
}

/// [`ClusterQuery`] backed by a live `kube` client.
///
/// Pod listings span all namespaces unless a namespace scope was given on
/// the connection flags.
pub struct KubeClusterQuery {
    client: Client,
    namespace: Option<String>,
}

impl KubeClusterQuery {
    pub fn new(client: Client, namespace: Option<String>) -> Self {
        KubeClusterQuery { client, namespace }
    }

    fn pods_api(&self) -> Api<Pod> {
        match &self.namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }
}

#[async_trait]
impl ClusterQuery for KubeClusterQuery {
    async fn list_nodes(&self) -> Result<Vec<Node>, CapacityError> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let list = nodes
            .list(&ListParams::default())
            .await
            .map_err(CapacityError::NodeList)?;
        debug!(count = list.items.len(), "listed nodes");
        Ok(list.items)
    }

    async fn list_pods(&self, filter: &PodFilter) -> Result<Vec<Pod>, CapacityError> {
        let mut params = ListParams::default();
        if let Some(selector) = filter.field_selector() {
            params = params.fields(&selector);
        }
        let list = self
            .pods_api()
            .list(&params)
            .await
            .map_err(|source| CapacityError::PodList {
                query: filter.to_string(),
                source,
            })?;
        debug!(filter = %filter, count = list.items.len(), "listed pods");
        Ok(list.items)
    }
}
