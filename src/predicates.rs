//! Pure predicate library shared by the rebalancer and the other
//! watchdog operations. No I/O, no mutation of inputs.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::ReplicaSet;
use k8s_openapi::api::core::v1::{Node, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use crate::errors::Error;
use crate::quantity;

/// CPU (milli-units) and memory (bytes) pair.
///
/// Produced either as a *request* (max over a pod's containers — a
/// conservative lower bound on what any single container needs, not the
/// pod's total footprint) or as a node's allocatable *capacity*.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceRequest {
    pub cpu_millis: i64,
    pub memory_bytes: i64,
}

/// True iff the pod's phase is `Running` (or unset) and it carries a
/// readiness condition with status `"True"`.
///
/// An empty phase is tolerated for forward compatibility with
/// incompletely populated objects (e.g. fixtures, older API servers).
pub fn is_pod_ready_running(pod: &Pod) -> bool {
    let Some(status) = &pod.status else {
        return false;
    };
    let phase_ok = matches!(status.phase.as_deref(), Some("Running") | None | Some(""));
    if !phase_ok {
        return false;
    }
    status
        .conditions
        .as_ref()
        .is_some_and(|conds| conds.iter().any(|c| c.type_ == "Ready" && c.status == "True"))
}

/// True iff the pod's phase is `Failed` and its reason is `"Evicted"`.
pub fn is_evicted_pod(pod: &Pod) -> bool {
    let Some(status) = &pod.status else {
        return false;
    };
    status.phase.as_deref() == Some("Failed") && status.reason.as_deref() == Some("Evicted")
}

/// True iff some owner-reference of `pod` carries `replicaset`'s UID.
pub fn is_pod_owned_by(replicaset: &ReplicaSet, pod: &Pod) -> bool {
    let Some(rs_uid) = replicaset.metadata.uid.as_deref() else {
        return false;
    };
    pod.metadata
        .owner_references
        .as_ref()
        .is_some_and(|owners| owners.iter().any(|o| o.uid == rs_uid))
}

/// The per-resource *maximum* across a pod spec's containers: answers
/// "can any one container of this pod still fit?", not "what is the
/// pod's total footprint." Containers with no request contribute zero.
pub fn get_pod_request_resources(pod_spec: &PodSpec) -> ResourceRequest {
    let mut max = ResourceRequest::default();
    for container in &pod_spec.containers {
        let Some(requests) = container.resources.as_ref().and_then(|r| r.requests.as_ref())
        else {
            continue;
        };
        if let Some(cpu) = requests.get("cpu").and_then(|q| quantity::parse_cpu_millis(q).ok()) {
            max.cpu_millis = max.cpu_millis.max(cpu);
        }
        if let Some(mem) = requests
            .get("memory")
            .and_then(|q| quantity::parse_memory_bytes(q).ok())
        {
            max.memory_bytes = max.memory_bytes.max(mem);
        }
    }
    max
}

/// Reads a node's allocatable CPU and memory. Fails when either entry is
/// absent — a node without a usable allocatable list cannot be reasoned
/// about for scheduling purposes.
pub fn get_node_resource_capacity(node: &Node) -> Result<ResourceRequest, Error> {
    let allocatable: &BTreeMap<String, Quantity> = node
        .status
        .as_ref()
        .and_then(|s| s.allocatable.as_ref())
        .ok_or_else(|| Error::MissingAllocatable(node.metadata.name.clone()))?;

    let cpu = allocatable
        .get("cpu")
        .ok_or_else(|| Error::MissingAllocatable(node.metadata.name.clone()))?;
    let memory = allocatable
        .get("memory")
        .ok_or_else(|| Error::MissingAllocatable(node.metadata.name.clone()))?;

    Ok(ResourceRequest {
        cpu_millis: quantity::parse_cpu_millis(cpu)?,
        memory_bytes: quantity::parse_memory_bytes(memory)?,
    })
}

/// True iff, for every taint on `node`, some toleration of `pod_spec`
/// matches it (key, value, effect, operator).
pub fn tolerates_all_taints(pod_spec: &PodSpec, node: &Node) -> bool {
    let Some(taints) = node.spec.as_ref().and_then(|s| s.taints.as_ref()) else {
        return true;
    };
    let tolerations = pod_spec.tolerations.as_deref().unwrap_or(&[]);

    taints.iter().all(|taint| {
        tolerations.iter().any(|t| {
            let key_matches = match &t.key {
                None => true,
                Some(k) => k == &taint.key,
            };
            if !key_matches {
                return false;
            }

            let effect_matches = match &t.effect {
                None => true,
                Some(e) => e == &taint.effect,
            };
            if !effect_matches {
                return false;
            }

            match t.operator.as_deref() {
                Some("Exists") => true,
                Some("Equal") | None => t.value == taint.value,
                _ => false,
            }
        })
    })
}

/// Evaluates a single `NodeSelectorTerm` against a node's labels.
///
/// Supports `In`, `NotIn`, `Exists`, `DoesNotExist`. `Gt`/`Lt` require
/// numeric comparison of label values and are intentionally unsupported:
/// they evaluate to `false` rather than guessing, so the rebalancer never
/// claims a pod can be rescheduled when it cannot prove it.
pub fn node_selector_term_matches(
    term: &k8s_openapi::api::core::v1::NodeSelectorTerm,
    labels: &BTreeMap<String, String>,
) -> bool {
    let Some(expressions) = term.match_expressions.as_ref() else {
        return true;
    };
    expressions.iter().all(|expr| {
        let label_value = labels.get(&expr.key);
        match expr.operator.as_str() {
            "In" => expr
                .values
                .as_ref()
                .is_some_and(|vs| label_value.is_some_and(|v| vs.contains(v))),
            "NotIn" => !expr
                .values
                .as_ref()
                .is_some_and(|vs| label_value.is_some_and(|v| vs.contains(v))),
            "Exists" => label_value.is_some(),
            "DoesNotExist" => label_value.is_none(),
            "Gt" | "Lt" => false,
            _ => false,
        }
    })
}

/// True iff `node`'s labels satisfy `pod_spec`'s node selector (the
/// simple `nodeSelector` map, AND of all entries).
pub fn node_matches_node_selector(pod_spec: &PodSpec, node: &Node) -> bool {
    let Some(selector) = pod_spec.node_selector.as_ref() else {
        return true;
    };
    let empty = BTreeMap::new();
    let labels = node.metadata.labels.as_ref().unwrap_or(&empty);
    selector.iter().all(|(k, v)| labels.get(k) == Some(v))
}

/// True iff `pod_spec`'s node selector *and* required node affinity (if
/// any) are satisfied, `node` is not marked unschedulable, and every
/// taint is tolerated.
pub fn can_schedule(node: &Node, pod_spec: &PodSpec) -> bool {
    if node.spec.as_ref().and_then(|s| s.unschedulable).unwrap_or(false) {
        return false;
    }
    if !tolerates_all_taints(pod_spec, node) {
        return false;
    }
    if !node_matches_node_selector(pod_spec, node) {
        return false;
    }

    let required = pod_spec
        .affinity
        .as_ref()
        .and_then(|a| a.node_affinity.as_ref())
        .and_then(|na| na.required_during_scheduling_ignored_during_execution.as_ref());
    if let Some(required) = required {
        let empty = BTreeMap::new();
        let labels = node.metadata.labels.as_ref().unwrap_or(&empty);
        let any_term_matches = required
            .node_selector_terms
            .iter()
            .any(|term| node_selector_term_matches(term, labels));
        if !any_term_matches {
            return false;
        }
    }

    true
}

/// The subset of `nodes` for which `can_schedule` holds *and* the node's
/// allocatable capacity is at least `pod_spec`'s max container request,
/// in both CPU and memory.
pub fn filter_scheduleable<'a>(nodes: &'a [Node], pod_spec: &PodSpec) -> Vec<&'a Node> {
    let request = get_pod_request_resources(pod_spec);
    nodes
        .iter()
        .filter(|node| {
            if !can_schedule(node, pod_spec) {
                return false;
            }
            let Ok(capacity) = get_node_resource_capacity(node) else {
                return false;
            };
            capacity.cpu_millis >= request.cpu_millis && capacity.memory_bytes >= request.memory_bytes
        })
        .collect()
}

/// True iff `pod` is safe to delete-and-let-the-orchestrator-reschedule:
/// not owned by a `StatefulSet`/`DaemonSet` (identity-bound /
/// orchestrator-bound respectively), does not use a memory-medium
/// `EmptyDir` or any `HostPath` volume (data loss risk), and has no
/// init container reported not-ready.
pub fn can_be_rebalanced(pod: &Pod) -> bool {
    let owned_by_unmovable = pod.metadata.owner_references.as_ref().is_some_and(|owners| {
        owners
            .iter()
            .any(|o| o.kind == "StatefulSet" || o.kind == "DaemonSet")
    });
    if owned_by_unmovable {
        return false;
    }

    if let Some(spec) = &pod.spec {
        if let Some(volumes) = &spec.volumes {
            for volume in volumes {
                if let Some(empty_dir) = &volume.empty_dir {
                    if empty_dir.medium.as_deref() == Some("Memory") {
                        return false;
                    }
                }
                if volume.host_path.is_some() {
                    return false;
                }
            }
        }
    }

    let init_not_ready = pod
        .status
        .as_ref()
        .and_then(|s| s.init_container_statuses.as_ref())
        .is_some_and(|statuses| statuses.iter().any(|s| !s.ready));
    if init_not_ready {
        return false;
    }

    true
}
