mod common;

use common::*;
use k8s_openapi::api::core::v1::{EmptyDirVolumeSource, HostPathVolumeSource, PodStatus, Volume};
use kube_watchdogs::predicates;

// ══════════════════════════════════════════════════════════════════
// Predicate contracts, no cluster required.
// ══════════════════════════════════════════════════════════════════

#[test]
fn can_schedule_false_on_unschedulable_node() {
    let node = make_node("n1", true, 4000, 8_000_000_000);
    let pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    assert!(!predicates::can_schedule(&node, pod.spec.as_ref().unwrap()));
}

#[test]
fn is_pod_ready_running_false_when_pending() {
    let mut pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    pod.status.as_mut().unwrap().phase = Some("Pending".to_string());
    assert!(!predicates::is_pod_ready_running(&pod));
}

#[test]
fn is_pod_ready_running_true_on_empty_phase_with_ready_condition() {
    let mut pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    pod.status.as_mut().unwrap().phase = None;
    assert!(predicates::is_pod_ready_running(&pod));
}

#[test]
fn is_evicted_pod_true_on_failed_evicted() {
    let mut pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    pod.status = Some(PodStatus {
        phase: Some("Failed".to_string()),
        reason: Some("Evicted".to_string()),
        ..Default::default()
    });
    assert!(predicates::is_evicted_pod(&pod));
}

#[test]
fn is_evicted_pod_false_on_failed_other_reason() {
    let mut pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    pod.status = Some(PodStatus {
        phase: Some("Failed".to_string()),
        reason: Some("OOMKilled".to_string()),
        ..Default::default()
    });
    assert!(!predicates::is_evicted_pod(&pod));
}

#[test]
fn can_be_rebalanced_false_on_daemonset_owner() {
    let mut pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    pod.metadata.owner_references = Some(vec![owner_ref("DaemonSet", "ds", "owner-1")]);
    assert!(!predicates::can_be_rebalanced(&pod));
}

#[test]
fn can_be_rebalanced_false_on_statefulset_owner() {
    let mut pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    pod.metadata.owner_references = Some(vec![owner_ref("StatefulSet", "sts", "owner-1")]);
    assert!(!predicates::can_be_rebalanced(&pod));
}

#[test]
fn can_be_rebalanced_false_on_host_path_volume() {
    let mut pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    pod.spec.as_mut().unwrap().volumes = Some(vec![Volume {
        name: "data".to_string(),
        host_path: Some(HostPathVolumeSource {
            path: "/var/lib/data".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }]);
    assert!(!predicates::can_be_rebalanced(&pod));
}

#[test]
fn can_be_rebalanced_false_on_memory_backed_empty_dir() {
    let mut pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    pod.spec.as_mut().unwrap().volumes = Some(vec![Volume {
        name: "cache".to_string(),
        empty_dir: Some(EmptyDirVolumeSource {
            medium: Some("Memory".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }]);
    assert!(!predicates::can_be_rebalanced(&pod));
}

#[test]
fn can_be_rebalanced_true_for_plain_pod() {
    let pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    assert!(predicates::can_be_rebalanced(&pod));
}

#[test]
fn tolerates_all_taints_false_without_matching_toleration() {
    let node = make_node("n1", false, 4000, 8_000_000_000);
    let node = node_with_taint(node, "dedicated", Some("gpu"), "NoSchedule");
    let pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    assert!(!predicates::tolerates_all_taints(pod.spec.as_ref().unwrap(), &node));
}

#[test]
fn node_selector_unsupported_operators_are_conservative() {
    use k8s_openapi::api::core::v1::{NodeSelectorRequirement, NodeSelectorTerm};
    use std::collections::BTreeMap;

    let term = NodeSelectorTerm {
        match_expressions: Some(vec![NodeSelectorRequirement {
            key: "cpu-count".to_string(),
            operator: "Gt".to_string(),
            values: Some(vec!["4".to_string()]),
        }]),
        match_fields: None,
    };
    let mut labels = BTreeMap::new();
    labels.insert("cpu-count".to_string(), "8".to_string());

    assert!(!predicates::node_selector_term_matches(&term, &labels));
}

#[test]
fn filter_scheduleable_excludes_insufficient_capacity() {
    let small = make_node("small", false, 100, 100_000_000);
    let big = make_node("big", false, 4000, 8_000_000_000);
    let nodes = vec![small, big.clone()];

    let mut pod = make_ready_running_pod("p1", "default", "n1", "owner-1");
    pod.spec.as_mut().unwrap().containers[0].resources =
        Some(k8s_openapi::api::core::v1::ResourceRequirements {
            requests: Some({
                let mut m = std::collections::BTreeMap::new();
                m.insert("cpu".to_string(), k8s_openapi::apimachinery::pkg::api::resource::Quantity("500m".to_string()));
                m.insert(
                    "memory".to_string(),
                    k8s_openapi::apimachinery::pkg::api::resource::Quantity("200000000".to_string()),
                );
                m
            }),
            ..Default::default()
        });

    let fit = predicates::filter_scheduleable(&nodes, pod.spec.as_ref().unwrap());
    assert_eq!(fit.len(), 1);
    assert_eq!(fit[0].metadata.name.as_deref(), Some("big"));
}
