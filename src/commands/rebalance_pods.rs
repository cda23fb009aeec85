use anyhow::Context;
use k8s_openapi::api::apps::v1::ReplicaSet;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Api, ListParams};
use kube::ResourceExt;
use tracing::{info, warn};

use kube_watchdogs::candidates;
use kube_watchdogs::rebalancer::{KubeRebalanceApi, Rebalancer};
use kube_watchdogs::replicaset_status::ReplicaSetStatus;
use kube_watchdogs::{kubeconfig, validation};

/// Caps the number of replica sets processed by a single invocation, so
/// one run cannot do unbounded work.
const MAX_REPLICASETS_PER_RUN: usize = 100;

/// `rebalance-pods`: rebalances every eligible replica set in the
/// namespace.
pub async fn run(namespace: &str, rate: f64, kubeconfig_path: Option<&str>) -> anyhow::Result<()> {
    validation::validate_namespace(namespace, false)?;
    validation::validate_rate(rate)?;

    let client = kubeconfig::build_client(kubeconfig_path)
        .await
        .context("failed to build Kubernetes client")?;

    let node_api: Api<Node> = Api::all(client.clone());
    let nodes = node_api
        .list(&ListParams::default())
        .await
        .context("failed to list nodes")?
        .items;

    let rs_api: Api<ReplicaSet> = if namespace.is_empty() {
        Api::all(client.clone())
    } else {
        Api::namespaced(client.clone(), namespace)
    };
    let replicasets = rs_api
        .list(&ListParams::default())
        .await
        .context("failed to list replicasets")?
        .items;

    let pod_api: Api<Pod> = if namespace.is_empty() {
        Api::all(client.clone())
    } else {
        Api::namespaced(client.clone(), namespace)
    };
    let pods = pod_api
        .list(&ListParams::default())
        .await
        .context("failed to list pods")?
        .items;

    let status = ReplicaSetStatus::new(replicasets.iter());
    let states = candidates::assemble_replica_states(&nodes, &replicasets, &pods);

    if states.len() > MAX_REPLICASETS_PER_RUN {
        warn!(
            total = states.len(),
            limit = MAX_REPLICASETS_PER_RUN,
            "rebalance_run_truncated"
        );
    }

    let mut rebalanced = 0usize;
    let mut skipped_rolling_update = 0usize;
    let mut failed = Vec::new();

    for state in states.into_iter().take(MAX_REPLICASETS_PER_RUN) {
        let rs_name = state.replicaset.name_any();
        let rs_namespace = state.replicaset.namespace().unwrap_or_default();

        if status.is_rolling_updating(&state.replicaset) {
            skipped_rolling_update += 1;
            info!(namespace = %rs_namespace, replicaset = %rs_name, "rebalance_skipped_rolling_update");
            continue;
        }

        let api = KubeRebalanceApi::namespaced(client.clone(), &rs_namespace);
        let mut rebalancer = Rebalancer::new(state, rate);

        match rebalancer.rebalance(&api).await {
            (changed, None) => {
                if changed {
                    rebalanced += 1;
                    info!(namespace = %rs_namespace, replicaset = %rs_name, "replicaset_rebalanced");
                }
            }
            (changed, Some(e)) => {
                if changed {
                    rebalanced += 1;
                }
                warn!(namespace = %rs_namespace, replicaset = %rs_name, error = %e, "rebalance_failed");
                failed.push(rs_name);
            }
        }
    }

    println!(
        "rebalanced={rebalanced}, skipped_rolling_update={skipped_rolling_update}, failed={}",
        failed.len()
    );

    if !failed.is_empty() {
        anyhow::bail!("rebalance failed for {} replica set(s): {}", failed.len(), failed.join(", "));
    }

    Ok(())
}
