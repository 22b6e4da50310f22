//! kubesize CLI
//!
//! A command-line tool that queries a Kubernetes cluster for node and pod
//! inventory and reports aggregate size and capacity, either cluster-wide
//! or grouped by node role.

mod client;
mod commands;
mod output;

use anyhow::Result;
use capacity_lib::KubeClusterQuery;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Kubernetes cluster size and capacity
#[derive(Parser)]
#[command(name = "kubesize")]
#[command(author, version, about = "Report Kubernetes cluster size and capacity", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: client::ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get cluster size and capacity
    #[command(visible_alias = "c")]
    Cluster {
        #[command(flatten)]
        display: output::DisplayArgs,
    },

    /// Get cluster capacity grouped by node role
    #[command(name = "node-role", visible_alias = "nr")]
    NodeRole {
        #[command(flatten)]
        display: output::DisplayArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so table/JSON/YAML reports on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = client::create_client(&cli.connection).await?;
    let query = KubeClusterQuery::new(client, cli.connection.namespace.clone());

    match cli.command {
        Commands::Cluster { display } => commands::cluster::run(&query, &display).await,
        Commands::NodeRole { display } => commands::node_role::run(&query, &display).await,
    }
}
