//! Kubernetes client construction from connection flags.

use anyhow::{Context, Result};
use clap::Args;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

/// Cluster connection flags, shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Path to kubeconfig file (uses the default lookup if not specified)
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kubeconfig: Option<String>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Kubernetes API server address, overriding the kubeconfig
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    /// Restrict pod queries to one namespace (all namespaces by default)
    #[arg(long, short = 'n', global = true)]
    pub namespace: Option<String>,
}

/// Build a ready-to-use client from the connection flags.
///
/// An explicit kubeconfig path or context takes priority; otherwise the
/// configuration is inferred the usual way (in-cluster environment, then
/// the default kubeconfig lookup).
pub async fn create_client(args: &ConnectionArgs) -> Result<Client> {
    let mut config = if args.kubeconfig.is_some() || args.context.is_some() {
        let kubeconfig = match &args.kubeconfig {
            Some(path) => Kubeconfig::read_from(path)
                .with_context(|| format!("failed to read kubeconfig from {path}"))?,
            None => Kubeconfig::read().context("failed to read kubeconfig")?,
        };
        let options = KubeConfigOptions {
            context: args.context.clone(),
            ..Default::default()
        };
        Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .context("failed to build configuration from kubeconfig")?
    } else {
        Config::infer()
            .await
            .context("failed to infer cluster configuration")?
    };

    if let Some(server) = &args.server {
        config.cluster_url = server
            .parse()
            .with_context(|| format!("invalid API server address {server:?}"))?;
    }

    Client::try_from(config).context("failed to create cluster client")
}
