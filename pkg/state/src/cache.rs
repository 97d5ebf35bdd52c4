use chrono::{DateTime, Utc};
use pkg_types::limitrange::LimitRange;
use pkg_types::quota::ResourceQuota;
use pkg_types::replicaset::ReplicaSet;
use pkg_types::statefulset::StatefulSet;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// Objects of one namespace, each list sorted by name.
#[derive(Debug, Clone, Default)]
pub struct NamespaceObjects {
    pub resource_quotas: Vec<ResourceQuota>,
    pub limit_ranges: Vec<LimitRange>,
    pub replica_sets: Vec<ReplicaSet>,
    pub stateful_sets: Vec<StatefulSet>,
}

impl NamespaceObjects {
    fn sort(&mut self) {
        self.resource_quotas.sort_by(|a, b| a.name.cmp(&b.name));
        self.limit_ranges.sort_by(|a, b| a.name.cmp(&b.name));
        self.replica_sets.sort_by(|a, b| a.name.cmp(&b.name));
        self.stateful_sets.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// A full listing of the store, built by the cache sync controller and
/// swapped into the cache in one step.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    namespaces: BTreeMap<String, NamespaceObjects>,
}

impl CacheSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, namespace: &str) -> &mut NamespaceObjects {
        self.namespaces.entry(namespace.to_string()).or_default()
    }

    pub fn add_resource_quota(&mut self, quota: ResourceQuota) {
        self.entry(&quota.namespace.clone()).resource_quotas.push(quota);
    }

    pub fn add_limit_range(&mut self, range: LimitRange) {
        self.entry(&range.namespace.clone()).limit_ranges.push(range);
    }

    pub fn add_replica_set(&mut self, rs: ReplicaSet) {
        self.entry(&rs.namespace.clone()).replica_sets.push(rs);
    }

    pub fn add_stateful_set(&mut self, ss: StatefulSet) {
        self.entry(&ss.namespace.clone()).stateful_sets.push(ss);
    }

    /// Total number of objects across all namespaces.
    pub fn object_count(&self) -> usize {
        self.namespaces
            .values()
            .map(|ns| {
                ns.resource_quotas.len()
                    + ns.limit_ranges.len()
                    + ns.replica_sets.len()
                    + ns.stateful_sets.len()
            })
            .sum()
    }
}

#[derive(Default)]
struct CacheInner {
    namespaces: BTreeMap<String, NamespaceObjects>,
    last_sync: Option<DateTime<Utc>>,
}

/// Read-only, eventually consistent view of the objects the quota checker
/// needs. Readers get cloned snapshots; only `replace` writes.
#[derive(Clone, Default)]
pub struct ObjectCache {
    inner: Arc<RwLock<CacheInner>>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fresh snapshot and mark the cache as synced.
    pub fn replace(&self, snapshot: CacheSnapshot) -> anyhow::Result<()> {
        let mut namespaces = snapshot.namespaces;
        for objects in namespaces.values_mut() {
            objects.sort();
        }
        let mut inner = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("object cache lock poisoned"))?;
        inner.namespaces = namespaces;
        inner.last_sync = Some(Utc::now());
        Ok(())
    }

    pub fn is_synced(&self) -> anyhow::Result<bool> {
        Ok(self.last_sync()?.is_some())
    }

    pub fn last_sync(&self) -> anyhow::Result<Option<DateTime<Utc>>> {
        Ok(self.lock_read()?.last_sync)
    }

    fn lock_read(&self) -> anyhow::Result<RwLockReadGuard<'_, CacheInner>> {
        self.inner
            .read()
            .map_err(|_| anyhow::anyhow!("object cache lock poisoned"))
    }

    fn read<T>(
        &self,
        namespace: &str,
        select: impl FnOnce(&NamespaceObjects) -> Vec<T>,
    ) -> anyhow::Result<Vec<T>> {
        let inner = self.lock_read()?;
        if inner.last_sync.is_none() {
            anyhow::bail!("object cache has not synced yet");
        }
        Ok(inner.namespaces.get(namespace).map(select).unwrap_or_default())
    }

    pub fn resource_quotas(&self, namespace: &str) -> anyhow::Result<Vec<ResourceQuota>> {
        self.read(namespace, |ns| ns.resource_quotas.clone())
    }

    pub fn limit_ranges(&self, namespace: &str) -> anyhow::Result<Vec<LimitRange>> {
        self.read(namespace, |ns| ns.limit_ranges.clone())
    }

    pub fn replica_sets(&self, namespace: &str) -> anyhow::Result<Vec<ReplicaSet>> {
        self.read(namespace, |ns| ns.replica_sets.clone())
    }

    pub fn stateful_sets(&self, namespace: &str) -> anyhow::Result<Vec<StatefulSet>> {
        self.read(namespace, |ns| ns.stateful_sets.clone())
    }
}
