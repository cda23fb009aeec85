use anyhow::Context;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, DeleteParams, ListParams};
use tracing::{info, warn};

use kube_watchdogs::{kubeconfig, predicates, validation};

/// `clean-evicted`: deletes every pod where `IsEvictedPod` holds in the
/// given namespace. A plain list+filter+delete loop; all the interesting
/// logic lives in the predicate itself.
pub async fn run(namespace: &str, kubeconfig_path: Option<&str>) -> anyhow::Result<()> {
    validation::validate_namespace(namespace, false)?;

    let client = kubeconfig::build_client(kubeconfig_path)
        .await
        .context("failed to build Kubernetes client")?;

    let pods: Api<Pod> = if namespace.is_empty() {
        Api::all(client.clone())
    } else {
        Api::namespaced(client.clone(), namespace)
    };

    let pod_list = pods
        .list(&ListParams::default())
        .await
        .context("failed to list pods")?;

    let evicted: Vec<_> = pod_list.items.into_iter().filter(predicates::is_evicted_pod).collect();

    let mut deleted = 0usize;
    for pod in &evicted {
        let name = pod.metadata.name.as_deref().unwrap_or_default();
        let pod_namespace = pod.metadata.namespace.as_deref().unwrap_or_default();
        let api: Api<Pod> = Api::namespaced(client.clone(), pod_namespace);
        match api.delete(name, &DeleteParams::default()).await {
            Ok(_) => {
                deleted += 1;
                info!(namespace = pod_namespace, name, "evicted_pod_deleted");
            }
            Err(e) => warn!(namespace = pod_namespace, name, error = %e, "evicted_pod_delete_failed"),
        }
    }

    println!("deleted={deleted}, evicted={}", evicted.len());
    Ok(())
}
