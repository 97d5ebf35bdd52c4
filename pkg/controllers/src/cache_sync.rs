use pkg_constants::registry::{
    LIMIT_RANGES, REPLICA_SETS, RESOURCE_QUOTAS, STATEFUL_SETS, resource_prefix, split_object_key,
};
use pkg_state::{CacheSnapshot, ObjectCache, StateStore};
use pkg_types::limitrange::LimitRange;
use pkg_types::quota::ResourceQuota;
use pkg_types::replicaset::ReplicaSet;
use pkg_types::statefulset::StatefulSet;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Background controller that keeps the object cache in step with the
/// state store by relisting everything on a fixed interval.
pub struct CacheSyncController {
    store: StateStore,
    cache: ObjectCache,
    resync_interval: Duration,
}

impl CacheSyncController {
    pub fn new(store: StateStore, cache: ObjectCache, resync_interval: Duration) -> Self {
        Self {
            store,
            cache,
            resync_interval,
        }
    }

    /// Start the resync loop as a background task. The first tick fires
    /// immediately, so the cache is populated right after startup.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "CacheSyncController started (interval={}s)",
                self.resync_interval.as_secs()
            );
            let mut interval = tokio::time::interval(self.resync_interval);
            loop {
                interval.tick().await;
                if let Err(e) = self.resync().await {
                    warn!("CacheSyncController resync error: {:#}", e);
                }
            }
        })
    }

    /// One pass: list every cached kind and swap the result into the cache.
    pub async fn resync(&self) -> anyhow::Result<usize> {
        let mut snapshot = CacheSnapshot::new();

        for quota in self.list::<ResourceQuota>(RESOURCE_QUOTAS, |q, ns| q.namespace = ns.into()).await? {
            snapshot.add_resource_quota(quota);
        }
        for range in self.list::<LimitRange>(LIMIT_RANGES, |r, ns| r.namespace = ns.into()).await? {
            snapshot.add_limit_range(range);
        }
        for rs in self.list::<ReplicaSet>(REPLICA_SETS, |r, ns| r.namespace = ns.into()).await? {
            snapshot.add_replica_set(rs);
        }
        for ss in self.list::<StatefulSet>(STATEFUL_SETS, |s, ns| s.namespace = ns.into()).await? {
            snapshot.add_stateful_set(ss);
        }

        let count = snapshot.object_count();
        self.cache.replace(snapshot)?;
        debug!("Object cache resynced ({} objects)", count);
        Ok(count)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        set_namespace: impl Fn(&mut T, &str),
    ) -> anyhow::Result<Vec<T>> {
        let entries = self
            .store
            .list_json::<T>(&resource_prefix(resource))
            .await
            .with_context(|| format!("while listing {} from the state store", resource))?;
        Ok(place_in_namespaces(resource, entries, set_namespace))
    }
}

/// Trust the registry key over the stored body for an object's namespace.
/// Keys that do not follow the registry layout are skipped.
fn place_in_namespaces<T>(
    resource: &str,
    entries: Vec<(String, T)>,
    set_namespace: impl Fn(&mut T, &str),
) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|(key, mut object)| match split_object_key(resource, &key) {
            Some((namespace, _)) => {
                set_namespace(&mut object, namespace);
                Some(object)
            }
            None => {
                warn!("Ignoring {} entry with malformed key {}", resource, key);
                None
            }
        })
        .collect()
}
