use anyhow::Context;
use pkg_state::ObjectCache;
use pkg_types::quota::ResourceQuota;
use pkg_types::resource::ResourceName;
use pkg_types::status::ResourceQuotasStatus;
use pkg_types::workload::Workload;
use std::sync::Arc;
use tracing::debug;

use crate::CHECKED_RESOURCES;
use crate::compare::check_available_resources;
use crate::defaults::{DefaultLimits, get_default_limits};
use crate::lister::{LimitRangeLister, ReplicaSetLister, ResourceQuotaLister, StatefulSetLister};
use crate::status::ExceededStatuses;
use crate::usage::next_replica_usage;

/// Checks whether ResourceQuotas would block workloads that are scaling up.
///
/// Every call reads fresh listings and holds no state between calls, so
/// two calls against an unchanged cache return the same answer. Deployment
/// `maxUnavailable` is not taken into account for ReplicaSets owned by a
/// Deployment.
pub struct ResourceQuotaStatusService {
    rq_lister: Arc<dyn ResourceQuotaLister>,
    rs_lister: Arc<dyn ReplicaSetLister>,
    ss_lister: Arc<dyn StatefulSetLister>,
    lr_lister: Arc<dyn LimitRangeLister>,
}

impl ResourceQuotaStatusService {
    pub fn new(
        rq_lister: Arc<dyn ResourceQuotaLister>,
        rs_lister: Arc<dyn ReplicaSetLister>,
        ss_lister: Arc<dyn StatefulSetLister>,
        lr_lister: Arc<dyn LimitRangeLister>,
    ) -> Self {
        Self {
            rq_lister,
            rs_lister,
            ss_lister,
            lr_lister,
        }
    }

    /// Serve every listing from the shared object cache.
    pub fn from_cache(cache: ObjectCache) -> Self {
        let cache = Arc::new(cache);
        Self::new(cache.clone(), cache.clone(), cache.clone(), cache)
    }

    pub fn check_resource_quota_status(
        &self,
        namespace: &str,
    ) -> anyhow::Result<ResourceQuotasStatus> {
        let quotas = self
            .rq_lister
            .list_resource_quotas(namespace)
            .with_context(|| format!("while listing ResourceQuotas [namespace: {}]", namespace))?;

        let statuses = self.check_resources_requests(namespace, CHECKED_RESOURCES, &quotas)?;
        Ok(statuses.into_status())
    }

    /// Scan ReplicaSets, then StatefulSets, that are below their desired
    /// replica count and record every quota that lacks room for one more pod.
    pub fn check_resources_requests(
        &self,
        namespace: &str,
        resources: &[ResourceName],
        quotas: &[ResourceQuota],
    ) -> anyhow::Result<ExceededStatuses> {
        let defaults = get_default_limits(self.lr_lister.as_ref(), namespace)?;
        let mut statuses = ExceededStatuses::new();

        let replica_sets = self
            .rs_lister
            .list_replica_sets(namespace)
            .with_context(|| format!("while listing ReplicaSets [namespace: {}]", namespace))?;
        scan_workloads(&replica_sets, resources, quotas, &defaults, &mut statuses);

        let stateful_sets = self
            .ss_lister
            .list_stateful_sets(namespace)
            .with_context(|| format!("while listing StatefulSets [namespace: {}]", namespace))?;
        scan_workloads(&stateful_sets, resources, quotas, &defaults, &mut statuses);

        Ok(statuses)
    }
}

fn scan_workloads<W: Workload>(
    workloads: &[W],
    resources: &[ResourceName],
    quotas: &[ResourceQuota],
    defaults: &DefaultLimits,
    statuses: &mut ExceededStatuses,
) {
    for workload in workloads.iter().filter(|w| w.is_scaling_up()) {
        let usage = next_replica_usage(&workload.template().containers, resources, defaults);
        let exceeded = check_available_resources(&usage, resources, quotas);
        if exceeded.is_empty() {
            continue;
        }
        let reference = workload.reference();
        debug!(
            "{} ({}/{} replicas) blocked by {} quota limit(s)",
            reference,
            workload.observed_replicas(),
            workload.desired_replicas(),
            exceeded.len()
        );
        for exc in &exceeded {
            statuses.record(exc, &reference);
        }
    }
}
