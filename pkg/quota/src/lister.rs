//! Read-only listers the checker consumes. The object cache implements all
//! of them; anything else that can list a namespace (a fake in tests, a
//! remote API) can be plugged in instead.

use pkg_state::ObjectCache;
use pkg_types::limitrange::LimitRange;
use pkg_types::quota::ResourceQuota;
use pkg_types::replicaset::ReplicaSet;
use pkg_types::statefulset::StatefulSet;

pub trait ResourceQuotaLister: Send + Sync {
    fn list_resource_quotas(&self, namespace: &str) -> anyhow::Result<Vec<ResourceQuota>>;
}

pub trait ReplicaSetLister: Send + Sync {
    fn list_replica_sets(&self, namespace: &str) -> anyhow::Result<Vec<ReplicaSet>>;
}

pub trait StatefulSetLister: Send + Sync {
    fn list_stateful_sets(&self, namespace: &str) -> anyhow::Result<Vec<StatefulSet>>;
}

pub trait LimitRangeLister: Send + Sync {
    fn list_limit_ranges(&self, namespace: &str) -> anyhow::Result<Vec<LimitRange>>;
}

impl ResourceQuotaLister for ObjectCache {
    fn list_resource_quotas(&self, namespace: &str) -> anyhow::Result<Vec<ResourceQuota>> {
        self.resource_quotas(namespace)
    }
}

impl ReplicaSetLister for ObjectCache {
    fn list_replica_sets(&self, namespace: &str) -> anyhow::Result<Vec<ReplicaSet>> {
        self.replica_sets(namespace)
    }
}

impl StatefulSetLister for ObjectCache {
    fn list_stateful_sets(&self, namespace: &str) -> anyhow::Result<Vec<StatefulSet>> {
        self.stateful_sets(namespace)
    }
}

impl LimitRangeLister for ObjectCache {
    fn list_limit_ranges(&self, namespace: &str) -> anyhow::Result<Vec<LimitRange>> {
        self.limit_ranges(namespace)
    }
}
