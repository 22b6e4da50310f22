//! `kubesize node-role`: capacity grouped by node role.

use anyhow::{Context, Result};
use capacity_lib::{node_role_capacity, ClusterQuery};

use crate::output::{self, DisplayArgs};

pub async fn run(query: &dyn ClusterQuery, display: &DisplayArgs) -> Result<()> {
    let report = node_role_capacity(query)
        .await
        .context("failed to generate node-role capacity report")?;
    output::display_node_role_data(&report, display)
}
