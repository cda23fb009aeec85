//! Candidate assembler: groups eligible pods by their owning,
//! steady-state replica set and attaches the full node list to each
//! resulting bundle.

use k8s_openapi::api::apps::v1::ReplicaSet;
use k8s_openapi::api::core::v1::{Node, Pod};

use crate::predicates;

/// A pod tracked inside a `ReplicaState`. `deleted` starts `false` and is
/// set once a delete request has been issued successfully; it is never
/// flipped back.
#[derive(Debug, Clone)]
pub struct PodStatus {
    pub pod: Pod,
    pub deleted: bool,
}

/// Per-replica-set bundle consumed by the rebalancer.
///
/// Invariant: every pod in `pod_status` has an owner-reference to
/// `replicaset`'s UID and was ready+running at assembly time.
#[derive(Debug, Clone)]
pub struct ReplicaState {
    pub replicaset: ReplicaSet,
    pub nodes: Vec<Node>,
    pub pod_status: Vec<PodStatus>,
}

/// True iff `rs` is a steady-state replica set worth rebalancing: it has
/// a desired count, observed replicas equal desired, and at least one
/// replica (desired=0 replica sets are scaled-down and irrelevant).
fn is_steady_state(rs: &ReplicaSet) -> bool {
    let Some(desired) = rs.spec.as_ref().and_then(|s| s.replicas) else {
        return false;
    };
    let observed = rs.status.as_ref().map(|s| s.replicas).unwrap_or(0);
    desired != 0 && desired == observed
}

/// Builds one `ReplicaState` per eligible replica set that received at
/// least one candidate pod. Output order is unspecified — callers must
/// treat the result as a set.
pub fn assemble_replica_states(
    nodes: &[Node],
    replicasets: &[ReplicaSet],
    pods: &[Pod],
) -> Vec<ReplicaState> {
    let eligible: Vec<&ReplicaSet> = replicasets.iter().filter(|rs| is_steady_state(rs)).collect();

    let mut states: Vec<ReplicaState> = eligible
        .iter()
        .map(|rs| ReplicaState {
            replicaset: (*rs).clone(),
            nodes: nodes.to_vec(),
            pod_status: Vec::new(),
        })
        .collect();

    for pod in pods {
        if !predicates::is_pod_ready_running(pod) {
            continue;
        }
        if !predicates::can_be_rebalanced(pod) {
            continue;
        }
        let Some(owner_index) = eligible
            .iter()
            .position(|rs| predicates::is_pod_owned_by(rs, pod))
        else {
            continue;
        };
        states[owner_index].pod_status.push(PodStatus {
            pod: pod.clone(),
            deleted: false,
        });
    }

    states.retain(|s| !s.pod_status.is_empty());
    states
}
