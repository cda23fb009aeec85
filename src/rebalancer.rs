//! The pod-rebalancer: decides which pods of a single replica set to
//! evict so the orchestrator reschedules them more evenly.

use std::collections::{HashMap, HashSet};

use kube::api::{Api, DeleteParams};
use kube::Client;

use crate::candidates::ReplicaState;
use crate::errors::Error;
use crate::predicates;

/// Deletion side effect, injected by the driver as a small capability
/// trait so tests can substitute a fake instead of a live cluster.
pub trait RebalanceApi {
    fn delete_pod(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), Error>> + Send;
}

/// A `kube::Api<Pod>`-backed implementation, one per namespace.
pub struct KubeRebalanceApi {
    pods: Api<k8s_openapi::api::core::v1::Pod>,
}

impl KubeRebalanceApi {
    pub fn namespaced(client: Client, namespace: &str) -> Self {
        Self {
            pods: Api::namespaced(client, namespace),
        }
    }
}

impl RebalanceApi for KubeRebalanceApi {
    async fn delete_pod(&self, _namespace: &str, name: &str) -> Result<(), Error> {
        self.pods.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}

/// Default cap on the fraction of a replica set's pods a single
/// invocation may delete.
pub const DEFAULT_MAX_REBALANCE_RATE: f64 = 0.25;

/// Decides and (optionally) applies pod deletions for one `ReplicaState`.
///
/// Holds the assembled `ReplicaState` immutably; deleted pod identities
/// accumulate in `deleted` rather than mutating `pod_status[i].deleted`
/// in place.
pub struct Rebalancer {
    state: ReplicaState,
    max_rebalance_rate: f64,
    deleted: HashSet<(String, String)>,
}

impl Rebalancer {
    /// Builds a rebalancer for `state`, pre-filtering `state.nodes` down
    /// to the nodes the orchestrator could actually reschedule surviving
    /// clones to, using the first pod's spec as a schedulability
    /// template. Uses the strict `filter_scheduleable` predicate rather
    /// than a looser "merge with all nodes" fallback; see DESIGN.md.
    ///
    /// If `state` has no pods, `nodes` is left untouched.
    pub fn new(mut state: ReplicaState, max_rebalance_rate: f64) -> Self {
        if let Some(first) = state.pod_status.first() {
            if let Some(pod_spec) = first.pod.spec.clone() {
                let filtered: Vec<_> = predicates::filter_scheduleable(&state.nodes, &pod_spec)
                    .into_iter()
                    .cloned()
                    .collect();
                state.nodes = filtered;
            }
        }

        Self {
            state,
            max_rebalance_rate,
            deleted: HashSet::new(),
        }
    }

    fn identity(pod: &k8s_openapi::api::core::v1::Pod) -> (String, String) {
        (
            pod.metadata.namespace.clone().unwrap_or_default(),
            pod.metadata.name.clone().unwrap_or_default(),
        )
    }

    fn is_deleted(&self, pod: &k8s_openapi::api::core::v1::Pod) -> bool {
        self.deleted.contains(&Self::identity(pod))
    }

    /// Finds the node with the most non-deleted pods assigned to it.
    /// Ties are broken by hash-map iteration order — acceptable, as
    /// repeated invocations eventually touch every persistently
    /// overloaded node.
    fn hottest_node(&self) -> Option<(String, u32)> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for ps in &self.state.pod_status {
            if self.is_deleted(&ps.pod) {
                continue;
            }
            let Some(node_name) = ps.pod.spec.as_ref().and_then(|s| s.node_name.as_deref()) else {
                continue;
            };
            *counts.entry(node_name).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(name, count)| (name.to_string(), count))
    }

    /// Runs the rebalance decision loop and applies deletions through
    /// `api`. Returns `(changed, error)`: `changed` is best-effort — true
    /// iff at least one deletion was issued successfully, even if a
    /// later deletion in the same invocation failed.
    pub async fn rebalance<A: RebalanceApi>(&mut self, api: &A) -> (bool, Option<Error>) {
        let spec_replicas = self.state.replicaset.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
        let current_replicas = self.state.replicaset.status.as_ref().map(|s| s.replicas).unwrap_or(0);
        let node_count = self.state.nodes.len();

        if node_count < 2 || spec_replicas < 2 || current_replicas < spec_replicas {
            return (false, None);
        }

        let max_del = std::cmp::max(1, (spec_replicas as f64 * self.max_rebalance_rate).floor() as i64);
        let average = spec_replicas as f64 / node_count as f64;
        let namespace = self.state.replicaset.metadata.namespace.clone().unwrap_or_default();

        let mut deleted_count = 0i64;

        while deleted_count < max_del {
            let Some((hot_node, count)) = self.hottest_node() else {
                return (deleted_count > 0, None);
            };
            if count < 1 {
                return (deleted_count > 0, None);
            }
            if (count as f64) < average + 1.0 {
                return (deleted_count > 0, None);
            }

            let victim = self.state.pod_status.iter().find(|ps| {
                !self.is_deleted(&ps.pod)
                    && ps.pod.spec.as_ref().and_then(|s| s.node_name.as_deref()) == Some(hot_node.as_str())
            });
            let Some(victim) = victim else {
                return (deleted_count > 0, None);
            };
            let name = victim.pod.metadata.name.clone().unwrap_or_default();
            let identity = Self::identity(&victim.pod);

            match api.delete_pod(&namespace, &name).await {
                Ok(()) => {
                    self.deleted.insert(identity);
                    deleted_count += 1;
                }
                Err(e) => return (deleted_count > 0, Some(e)),
            }
        }

        (deleted_count > 0, None)
    }
}
