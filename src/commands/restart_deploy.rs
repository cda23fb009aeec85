use anyhow::Context;

use kube_watchdogs::restart::{self, WorkloadKind};
use kube_watchdogs::{kubeconfig, validation};

/// `restart-deploy`: annotation-patches one or more deployments to trigger
/// a rolling replacement.
pub async fn run(
    namespace: &str,
    names: &[String],
    all: bool,
    kubeconfig_path: Option<&str>,
) -> anyhow::Result<()> {
    validation::validate_namespace(namespace, true)?;
    for name in names {
        validation::validate_name(name)?;
    }

    let client = kubeconfig::build_client(kubeconfig_path)
        .await
        .context("failed to build Kubernetes client")?;

    if all {
        restart::restart_all(&client, WorkloadKind::Deployment, namespace).await?;
    } else {
        if names.is_empty() {
            anyhow::bail!("provide at least one deployment name, or pass --all");
        }
        restart::restart_named(&client, WorkloadKind::Deployment, namespace, names).await?;
    }

    if all {
        println!("restart triggered for all deployments in namespace {namespace:?}");
    } else {
        println!("restart triggered for {} deployment(s)", names.len());
    }
    Ok(())
}
