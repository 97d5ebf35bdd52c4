use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pod::PodSpec;
use crate::workload::Workload;

/// As with ReplicaSets, only `replicas` matters to the quota check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSetStatus {
    #[serde(default)]
    pub replicas: u32,
    #[serde(default)]
    pub ready_replicas: u32,
    #[serde(default)]
    pub current_replicas: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSetSpec {
    pub replicas: u32,
    /// Pass-through, like `service_name` below.
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    /// Headless service governing the pods' network identity.
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub template: PodSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSet {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub spec: StatefulSetSpec,
    #[serde(default)]
    pub status: StatefulSetStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Workload for StatefulSet {
    const KIND: &'static str = "StatefulSet";

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
