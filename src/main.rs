mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let kubeconfig_path = cli.kubeconfig.as_deref();

    match cli.command {
        Commands::Version => commands::version::run()?,
        Commands::Check => commands::check::run(kubeconfig_path).await?,
        Commands::CleanEvicted => {
            commands::clean_evicted::run(&cli.namespace, kubeconfig_path).await?
        }
        Commands::DeleteOldest { prefix, min_pods } => {
            commands::delete_oldest::run(&cli.namespace, &prefix, min_pods, kubeconfig_path).await?
        }
        Commands::RebalancePods { rate } => {
            commands::rebalance_pods::run(&cli.namespace, rate, kubeconfig_path).await?
        }
        Commands::RestartDeploy { names, all } => {
            commands::restart_deploy::run(&cli.namespace, &names, all, kubeconfig_path).await?
        }
        Commands::RestartSts { names, all } => {
            commands::restart_sts::run(&cli.namespace, &names, all, kubeconfig_path).await?
        }
    }

    Ok(())
}
