//! `kubesize cluster`: whole-cluster capacity report.

use anyhow::{Context, Result};
use capacity_lib::{cluster_capacity, ClusterQuery};

use crate::output::{self, DisplayArgs};

pub async fn run(query: &dyn ClusterQuery, display: &DisplayArgs) -> Result<()> {
    let data = cluster_capacity(query)
        .await
        .context("failed to generate cluster capacity report")?;
    output::display_cluster_data(&data, display)
}
