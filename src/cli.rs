use clap::{Parser, Subcommand};

use kube_watchdogs::rebalancer::DEFAULT_MAX_REBALANCE_RATE;

/// Cluster-wide sentinel namespace value: "no namespace restriction".
pub const ALL_NAMESPACES: &str = "";

#[derive(Parser)]
#[command(name = "kube-watchdogs")]
#[command(about = "Cluster-remediation watchdogs: rebalancer, restarter, and sweepers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Namespace to operate in. Defaults to the cluster-wide sentinel
    /// (all namespaces).
    #[arg(long, global = true, default_value = ALL_NAMESPACES)]
    pub namespace: String,

    /// Path to a kubeconfig file, overriding `KUBECONFIG` and the
    /// default user-home location.
    #[arg(long, global = true)]
    pub kubeconfig: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete every pod that was evicted by the node (phase=Failed,
    /// reason=Evicted)
    CleanEvicted,

    /// Delete the oldest ready+running pod whose name starts with
    /// `--prefix`, if at least `--minPods` such pods exist
    DeleteOldest {
        /// Pod-name prefix to match
        #[arg(long = "prefix", short = 'p')]
        prefix: String,

        /// Minimum number of matching pods required before acting
        #[arg(long = "minPods", short = 'm', default_value_t = 3)]
        min_pods: u32,
    },

    /// Rebalance every eligible replica set in the namespace
    RebalancePods {
        /// Fraction of a replica set's pods that may be deleted in one
        /// invocation, in [0, 1]
        #[arg(long, default_value_t = DEFAULT_MAX_REBALANCE_RATE)]
        rate: f64,
    },

    /// Trigger a rolling restart of one or more deployments
    RestartDeploy {
        /// Deployment names to restart
        names: Vec<String>,

        /// Restart every deployment in the namespace
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Trigger a rolling restart of one or more stateful sets
    RestartSts {
        /// StatefulSet names to restart
        names: Vec<String>,

        /// Restart every stateful set in the namespace
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Check cluster connectivity and permissions
    Check,

    /// Print the release and commit identifiers
    Version,
}
