//! Node role derivation from labels.

use std::collections::BTreeSet;

use k8s_openapi::api::core::v1::Node;

/// Label key prefix whose suffix names a role (`node-role.kubernetes.io/worker`).
pub const NODE_ROLE_PREFIX: &str = "node-role.kubernetes.io/";

/// Legacy label whose value names a role.
pub const NODE_ROLE_LABEL: &str = "kubernetes.io/role";

/// Sentinel role for nodes with no role labels at all.
pub const ROLE_NONE: &str = "<none>";

/// Derive the set of roles a node belongs to.
///
/// Both label conventions contribute; duplicates collapse into the set. A
/// node with no role labels gets the single sentinel role [`ROLE_NONE`], so
/// every node lands in exactly one bucket at minimum.
pub fn node_roles(node: &Node) -> BTreeSet<String> {
    let mut roles = BTreeSet::new();

    if let Some(labels) = &node.metadata.labels {
        for (key, value) in labels {
            if let Some(role) = key.strip_prefix(NODE_ROLE_PREFIX) {
                if !role.is_empty() {
                    roles.insert(role.to_string());
                }
            } else if key == NODE_ROLE_LABEL && !value.is_empty() {
                roles.insert(value.clone());
            }
        }
    }

    if roles.is_empty() {
        roles.insert(ROLE_NONE.to_string());
    }
    roles
}
