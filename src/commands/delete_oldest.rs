use anyhow::Context;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, DeleteParams, ListParams};
use tracing::info;

use kube_watchdogs::{kubeconfig, predicates, validation};

/// `delete-oldest`: among ready+running pods whose name starts with
/// `prefix`, deletes the one with the earliest start time, provided at
/// least `min_pods` such pods exist.
pub async fn run(
    namespace: &str,
    prefix: &str,
    min_pods: u32,
    kubeconfig_path: Option<&str>,
) -> anyhow::Result<()> {
    validation::validate_namespace(namespace, true)?;
    validation::validate_prefix(prefix)?;
    validation::validate_min_pods(min_pods)?;

    let client = kubeconfig::build_client(kubeconfig_path)
        .await
        .context("failed to build Kubernetes client")?;

    let pods: Api<Pod> = Api::namespaced(client, namespace);

    let pod_list = pods
        .list(&ListParams::default())
        .await
        .context("failed to list pods")?;

    let mut matching: Vec<Pod> = pod_list
        .items
        .into_iter()
        .filter(|p| predicates::is_pod_ready_running(p))
        .filter(|p| p.metadata.name.as_deref().is_some_and(|n| n.starts_with(prefix)))
        .collect();

    if matching.len() < min_pods as usize {
        anyhow::bail!(
            "insufficient pods matching prefix {prefix:?}: found {}, need at least {min_pods}",
            matching.len()
        );
    }

    // Pods without a recorded start time are excluded from the comparison
    // entirely rather than implicitly sorting first: `None < Some(_)`
    // under the derived `Ord` would otherwise let an unpopulated
    // `startTime` win over pods with a genuinely earlier real timestamp.
    let oldest_index = matching
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            p.status
                .as_ref()
                .and_then(|s| s.start_time.as_ref())
                .map(|t| (i, t.0))
        })
        .min_by_key(|(_, start_time)| *start_time)
        .map(|(i, _)| i);

    let Some(oldest_index) = oldest_index else {
        anyhow::bail!("no pod matching prefix {prefix:?} has a recorded start time");
    };

    let oldest = matching.remove(oldest_index);
    let name = oldest.metadata.name.clone().unwrap_or_default();

    pods.delete(&name, &DeleteParams::default())
        .await
        .with_context(|| format!("failed to delete pod {name}"))?;

    info!(namespace, name, "oldest_pod_deleted");
    println!("deleted oldest pod matching prefix {prefix:?}: {name}");
    Ok(())
}
