use serde::{Deserialize, Serialize};

use crate::pod::PodSpec;

/// Reference to the object that manages another one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerReference {
    pub kind: String,
    pub name: String,
}

/// A replicated set of identical pods (ReplicaSet, StatefulSet).
pub trait Workload {
    const KIND: &'static str;

    fn name(&self) -> &str;

    /// `spec.replicas`
    fn desired_replicas(&self) -> u32;

    /// `status.replicas`
    fn observed_replicas(&self) -> u32;

    fn template(&self) -> &PodSpec;

    /// True while the controller still has replicas left to create.
    fn is_scaling_up(&self) -> bool {
        self.desired_replicas() > self.observed_replicas()
    }

    /// `"<Kind>/<name>"`, as reported in quota status.
    fn reference(&self) -> String {
        format!("{}/{}", Self::KIND, self.name())
    }
}

/// Body of `PUT .../{replicasets,statefulsets}/{name}/scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scale {
    pub replicas: u32,
}
