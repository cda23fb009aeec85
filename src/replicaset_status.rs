//! Replica-set-status analyzer.
//!
//! Detects whether a replica set's owning deployment is mid-rollout: more
//! than one *active* (desired replicas > 0) replica set sharing an owner
//! UID is the standard signature of an in-flight rolling update.

use std::collections::HashMap;

use k8s_openapi::api::apps::v1::ReplicaSet;

/// A read-only snapshot built once per invocation from the replica-set
/// list: owner UID → count of active replica sets owning it.
pub struct ReplicaSetStatus {
    active_owners: HashMap<String, u32>,
}

impl ReplicaSetStatus {
    pub fn new<'a>(replicasets: impl IntoIterator<Item = &'a ReplicaSet>) -> Self {
        let mut active_owners: HashMap<String, u32> = HashMap::new();

        for rs in replicasets {
            let desired = rs.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
            if desired <= 0 {
                continue;
            }
            let Some(owners) = rs.metadata.owner_references.as_ref() else {
                continue;
            };
            for owner in owners {
                *active_owners.entry(owner.uid.clone()).or_insert(0) += 1;
            }
        }

        Self { active_owners }
    }

    /// True iff any owner-reference of `rs` maps to ≥2 active replica
    /// sets — i.e. the owning deployment currently has more than one
    /// active replica set.
    pub fn is_rolling_updating(&self, rs: &ReplicaSet) -> bool {
        let Some(owners) = rs.metadata.owner_references.as_ref() else {
            return false;
        };
        owners
            .iter()
            .any(|owner| self.active_owners.get(&owner.uid).copied().unwrap_or(0) >= 2)
    }
}
