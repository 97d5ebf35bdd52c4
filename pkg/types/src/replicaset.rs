use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pod::PodSpec;
use crate::workload::{OwnerReference, Workload};

// --- ReplicaSet status ---

/// Only `replicas` feeds the quota check; the ready/available counts are
/// reported by the workload controller and passed through unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaSetStatus {
    #[serde(default)]
    pub replicas: u32,
    #[serde(default)]
    pub ready_replicas: u32,
    #[serde(default)]
    pub available_replicas: u32,
}

// --- ReplicaSet spec ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaSetSpec {
    pub replicas: u32,
    /// Pass-through label selector, never matched server-side.
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    #[serde(default)]
    pub template: PodSpec,
}

// --- ReplicaSet ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaSet {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub spec: ReplicaSetSpec,
    #[serde(default)]
    pub status: ReplicaSetStatus,
    /// Controller that manages this RS, usually a Deployment.
    #[serde(default)]
    pub owner_reference: Option<OwnerReference>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Workload for ReplicaSet {
    const KIND: &'static str = "ReplicaSet";

    fn name(&self) -> &str {
        &self.name
    }

    fn desired_replicas(&self) -> u32 {
        self.spec.replicas
    }

    fn observed_replicas(&self) -> u32 {
        self.status.replicas
    }

    fn template(&self) -> &PodSpec {
        &self.spec.template
    }
}
