use anyhow::Context;

use kube_watchdogs::restart::{self, WorkloadKind};
use kube_watchdogs::{kubeconfig, validation};

/// `restart-sts`: annotation-patches one or more stateful sets to trigger
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
        restart::restart_all(&client, WorkloadKind::StatefulSet, namespace).await?;
        println!("restart triggered for all stateful sets in namespace {namespace:?}");
    } else {
        if names.is_empty() {
            anyhow::bail!("provide at least one stateful set name, or pass --all");
        }
        restart::restart_named(&client, WorkloadKind::StatefulSet, namespace, names).await?;
        println!("restart triggered for {} stateful set(s)", names.len());
    }

    Ok(())
}
