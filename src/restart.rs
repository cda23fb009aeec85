//! Workload restarter: triggers an orchestrator-driven rolling
//! replacement by patching a workload's pod-template annotations with a
//! fresh timestamp.
//!
//! Generalizes the `Rollout` trait / `patch_rollout_annotation` pattern
//! to both Deployments and StatefulSets, using a strategic-merge patch
//! so unrelated fields are left untouched.

use chrono::Utc;
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use kube::api::{Api, Patch, PatchParams};
use kube::{Client, ResourceExt};
use tracing::info;

use crate::errors::Error;

/// Annotation set by the patch, matching `kubectl rollout restart`'s own
/// convention for compatibility with external tooling.
pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

/// Stable field-manager identifier so repeated invocations do not create
/// ownership churn on the annotation.
pub const FIELD_MANAGER: &str = "kubectl-rollout";

/// Hard cap on the number of named targets per invocation, limiting
/// blast radius for a single restart command.
pub const MAX_NAMED_TARGETS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
}

impl WorkloadKind {
    fn label(self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "Deployment",
            WorkloadKind::StatefulSet => "StatefulSet",
        }
    }
}

/// Builds the strategic-merge patch body for a given timestamp. Pulled
/// out from `restart_patch` so the payload shape can be asserted in
/// tests without depending on wall-clock time.
pub fn build_restart_patch(timestamp: chrono::DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": {
                        RESTARTED_AT_ANNOTATION: timestamp.to_rfc3339(),
                    }
                }
            }
        }
    })
}

fn restart_patch() -> serde_json::Value {
    build_restart_patch(Utc::now())
}

async fn patch_deployment(client: &Client, namespace: &str, name: &str) -> Result<(), Error> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    api.patch(name, &PatchParams::apply(FIELD_MANAGER), &Patch::Strategic(&restart_patch()))
        .await?;
    Ok(())
}

async fn patch_stateful_set(client: &Client, namespace: &str, name: &str) -> Result<(), Error> {
    let api: Api<StatefulSet> = Api::namespaced(client.clone(), namespace);
    api.patch(name, &PatchParams::apply(FIELD_MANAGER), &Patch::Strategic(&restart_patch()))
        .await?;
    Ok(())
}

async fn patch_one(client: &Client, kind: WorkloadKind, namespace: &str, name: &str) -> Result<(), Error> {
    match kind {
        WorkloadKind::Deployment => patch_deployment(client, namespace, name).await,
        WorkloadKind::StatefulSet => patch_stateful_set(client, namespace, name).await,
    }
}

/// Restarts each named workload. Fails fatally with `Error::NotFound` on
/// the first missing target — a name the caller explicitly asked for
/// that doesn't exist is a caller error, not something to skip silently.
/// Rejects more than `MAX_NAMED_TARGETS` names upfront.
pub async fn restart_named(
    client: &Client,
    kind: WorkloadKind,
    namespace: &str,
    names: &[String],
) -> Result<(), Error> {
    if names.len() > MAX_NAMED_TARGETS {
        return Err(Error::Validation {
            field: "names",
            message: format!("at most {MAX_NAMED_TARGETS} targets allowed per invocation"),
        });
    }

    for name in names {
        let exists = match kind {
            WorkloadKind::Deployment => {
                let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
                api.get_opt(name).await?.is_some()
            }
            WorkloadKind::StatefulSet => {
                let api: Api<StatefulSet> = Api::namespaced(client.clone(), namespace);
                api.get_opt(name).await?.is_some()
            }
        };
        if !exists {
            return Err(Error::NotFound {
                kind: kind.label(),
                namespace: namespace.to_string(),
                name: name.clone(),
            });
        }

        patch_one(client, kind, namespace, name).await?;
        info!(kind = kind.label(), namespace, name, "workload_restarted");
    }

    Ok(())
}

/// Restarts every workload of `kind` in `namespace`. Partial failure is
/// reported with the list of failed names, never silently swallowed.
pub async fn restart_all(client: &Client, kind: WorkloadKind, namespace: &str) -> Result<(), Error> {
    let names: Vec<String> = match kind {
        WorkloadKind::Deployment => {
            let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
            api.list(&Default::default()).await?.items.iter().map(|d| d.name_any()).collect()
        }
        WorkloadKind::StatefulSet => {
            let api: Api<StatefulSet> = Api::namespaced(client.clone(), namespace);
            api.list(&Default::default()).await?.items.iter().map(|s| s.name_any()).collect()
        }
    };

    let total = names.len();
    let mut failed = Vec::new();

    for name in &names {
        match patch_one(client, kind, namespace, name).await {
            Ok(()) => info!(kind = kind.label(), namespace, name, "workload_restarted"),
            Err(e) => {
                tracing::warn!(kind = kind.label(), namespace, name, error = %e, "workload_restart_failed");
                failed.push(name.clone());
            }
        }
    }

    if !failed.is_empty() {
        return Err(Error::PartialFailure {
            kind: kind.label(),
            count: failed.len(),
            total,
            failed,
        });
    }

    Ok(())
}
