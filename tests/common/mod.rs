use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{ReplicaSet, ReplicaSetSpec, ReplicaSetStatus as K8sReplicaSetStatus};
use k8s_openapi::api::core::v1::{
    Container, Node, NodeSpec, NodeStatus, Pod, PodCondition, PodSpec, PodStatus, Taint, Toleration,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};

pub fn owner_ref(kind: &str, name: &str, uid: &str) -> OwnerReference {
    OwnerReference {
        api_version: "apps/v1".to_string(),
        kind: kind.to_string(),
        name: name.to_string(),
        uid: uid.to_string(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

pub fn make_node(name: &str, unschedulable: bool, cpu_millis: i64, memory_bytes: i64) -> Node {
    let mut allocatable = BTreeMap::new();
    allocatable.insert("cpu".to_string(), Quantity(format!("{cpu_millis}m")));
    allocatable.insert("memory".to_string(), Quantity(memory_bytes.to_string()));

    Node {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(BTreeMap::new()),
            ..Default::default()
        },
        spec: Some(NodeSpec {
            unschedulable: Some(unschedulable),
            taints: Some(Vec::new()),
            ..Default::default()
        }),
        status: Some(NodeStatus {
            allocatable: Some(allocatable),
            ..Default::default()
        }),
    }
}

pub fn node_with_taint(mut node: Node, key: &str, value: Option<&str>, effect: &str) -> Node {
    let taint = Taint {
        key: key.to_string(),
        value: value.map(str::to_string),
        effect: effect.to_string(),
        time_added: None,
    };
    node.spec.as_mut().unwrap().taints.get_or_insert_with(Vec::new).push(taint);
    node
}

pub fn node_with_labels(mut node: Node, labels: &[(&str, &str)]) -> Node {
    let map = node.metadata.labels.get_or_insert_with(BTreeMap::new);
    for (k, v) in labels {
        map.insert(k.to_string(), v.to_string());
    }
    node
}

pub fn make_ready_running_pod(name: &str, namespace: &str, node_name: &str, owner_uid: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            owner_references: Some(vec![owner_ref("ReplicaSet", "rs", owner_uid)]),
            ..Default::default()
        },
        spec: Some(PodSpec {
            node_name: Some(node_name.to_string()),
            containers: vec![Container {
                name: "main".to_string(),
                image: Some("nginx:1.25".to_string()),
                ..Default::default()
            }],
            tolerations: Some(vec![Toleration::default()]),
            ..Default::default()
        }),
        status: Some(PodStatus {
            phase: Some("Running".to_string()),
            conditions: Some(vec![PodCondition {
                type_: "Ready".to_string(),
                status: "True".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        }),
    }
}

pub fn make_replicaset(
    name: &str,
    namespace: &str,
    uid: &str,
    desired: i32,
    observed: i32,
    owners: Vec<OwnerReference>,
) -> ReplicaSet {
    ReplicaSet {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(uid.to_string()),
            owner_references: if owners.is_empty() { None } else { Some(owners) },
            ..Default::default()
        },
        spec: Some(ReplicaSetSpec {
            replicas: Some(desired),
            ..Default::default()
        }),
        status: Some(K8sReplicaSetStatus {
            replicas: observed,
            ..Default::default()
        }),
    }
}
