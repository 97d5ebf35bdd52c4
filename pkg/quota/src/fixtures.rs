//! Object builders shared by the unit tests.

use chrono::Utc;
use pkg_state::{CacheSnapshot, ObjectCache};
use pkg_types::limitrange::{LimitRange, LimitRangeItem, LimitType};
use pkg_types::pod::{ContainerSpec, PodSpec};
use pkg_types::quantity::Quantity;
use pkg_types::quota::ResourceQuota;
use pkg_types::replicaset::{ReplicaSet, ReplicaSetSpec, ReplicaSetStatus};
use pkg_types::resource::{ResourceList, ResourceName, ResourceRequirements, ResourceValues};
use pkg_types::statefulset::{StatefulSet, StatefulSetSpec, StatefulSetStatus};

use crate::lister::{LimitRangeLister, ReplicaSetLister, ResourceQuotaLister, StatefulSetLister};

pub const NAMESPACE: &str = "prod";

pub fn q(s: &str) -> Quantity {
    s.parse().unwrap()
}

pub fn values(cpu: &str, memory: &str) -> ResourceValues {
    ResourceValues {
        cpu: q(cpu),
        memory: q(memory),
    }
}

pub fn container(name: &str, requests: ResourceValues, limits: ResourceValues) -> ContainerSpec {
    ContainerSpec {
        name: name.to_string(),
        image: format!("registry.local/{}:1.0", name),
        resources: ResourceRequirements { requests, limits },
    }
}

pub fn unset() -> ResourceValues {
    ResourceValues::default()
}

pub fn container_limits(default: ResourceValues, default_request: ResourceValues) -> LimitRangeItem {
    LimitRangeItem {
        limit_type: LimitType::Container,
        default,
        default_request,
        max: ResourceValues::default(),
    }
}

pub fn pod_limits(default: ResourceValues, default_request: ResourceValues) -> LimitRangeItem {
    LimitRangeItem {
        limit_type: LimitType::Pod,
        ..container_limits(default, default_request)
    }
}

pub fn limit_range(name: &str, limits: Vec<LimitRangeItem>) -> LimitRange {
    LimitRange {
        name: name.to_string(),
        namespace: NAMESPACE.to_string(),
        limits,
        created_at: Utc::now(),
    }
}

fn resource_list(entries: &[(ResourceName, &str)]) -> ResourceList {
    entries.iter().map(|(name, value)| (*name, q(value))).collect()
}

pub fn quota(
    name: &str,
    hard: &[(ResourceName, &str)],
    used: &[(ResourceName, &str)],
) -> ResourceQuota {
    ResourceQuota {
        name: name.to_string(),
        namespace: NAMESPACE.to_string(),
        hard: resource_list(hard),
        used: resource_list(used),
        created_at: Utc::now(),
    }
}

pub fn replica_set(
    name: &str,
    desired: u32,
    observed: u32,
    containers: Vec<ContainerSpec>,
) -> ReplicaSet {
    ReplicaSet {
        name: name.to_string(),
        namespace: NAMESPACE.to_string(),
        spec: ReplicaSetSpec {
            replicas: desired,
            selector: [("app".to_string(), name.to_string())].into(),
            template: PodSpec { containers },
        },
        status: ReplicaSetStatus {
            replicas: observed,
            ready_replicas: observed,
            available_replicas: observed,
        },
        owner_reference: None,
        created_at: Utc::now(),
    }
}

pub fn stateful_set(
    name: &str,
    desired: u32,
    observed: u32,
    containers: Vec<ContainerSpec>,
) -> StatefulSet {
    StatefulSet {
        name: name.to_string(),
        namespace: NAMESPACE.to_string(),
        spec: StatefulSetSpec {
            replicas: desired,
            selector: [("app".to_string(), name.to_string())].into(),
            service_name: format!("{}-headless", name),
            template: PodSpec { containers },
        },
        status: StatefulSetStatus {
            replicas: observed,
            ready_replicas: observed,
            current_replicas: observed,
        },
        created_at: Utc::now(),
    }
}

/// Builds a synced cache from loose objects.
#[derive(Default)]
pub struct CacheBuilder {
    snapshot: CacheSnapshot,
}

impl CacheBuilder {
    pub fn quota(mut self, quota: ResourceQuota) -> Self {
        self.snapshot.add_resource_quota(quota);
        self
    }

    pub fn limit_range(mut self, range: LimitRange) -> Self {
        self.snapshot.add_limit_range(range);
        self
    }

    pub fn replica_set(mut self, rs: ReplicaSet) -> Self {
        self.snapshot.add_replica_set(rs);
        self
    }

    pub fn stateful_set(mut self, ss: StatefulSet) -> Self {
        self.snapshot.add_stateful_set(ss);
        self
    }

    pub fn build(self) -> ObjectCache {
        let cache = ObjectCache::new();
        cache.replace(self.snapshot).unwrap();
        cache
    }
}

/// Lister whose every call fails.
pub struct FailingLister;

fn unavailable<T>() -> anyhow::Result<Vec<T>> {
    Err(anyhow::anyhow!("cache unavailable"))
}

impl ResourceQuotaLister for FailingLister {
    fn list_resource_quotas(&self, _: &str) -> anyhow::Result<Vec<ResourceQuota>> {
        unavailable()
    }
}

impl ReplicaSetLister for FailingLister {
    fn list_replica_sets(&self, _: &str) -> anyhow::Result<Vec<ReplicaSet>> {
        unavailable()
    }
}

impl StatefulSetLister for FailingLister {
    fn list_stateful_sets(&self, _: &str) -> anyhow::Result<Vec<StatefulSet>> {
        unavailable()
    }
}

impl LimitRangeLister for FailingLister {
    fn list_limit_ranges(&self, _: &str) -> anyhow::Result<Vec<LimitRange>> {
        unavailable()
    }
}
