use pkg_types::resource::ResourceName;
use pkg_types::status::{ExceededQuota, ResourceQuotasStatus};
use std::collections::BTreeMap;

use crate::compare::ExceededRef;

/// Affected workloads per quota and resource.
///
/// Ordered maps keep the flattened output stable: quotas by name,
/// resources in `ResourceName` order, workloads in the order recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceededStatuses {
    entries: BTreeMap<String, BTreeMap<ResourceName, Vec<String>>>,
}

impl ExceededStatuses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `affected` under the quota/resource pair, creating the entry
    /// on first use.
    pub fn record(&mut self, exceeded: &ExceededRef, affected: &str) {
        self.entries
            .entry(exceeded.quota_name.clone())
            .or_default()
            .entry(exceeded.resource_name)
            .or_default()
            .push(affected.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn affected(&self, quota_name: &str, resource_name: ResourceName) -> Option<&[String]> {
        self.entries
            .get(quota_name)?
            .get(&resource_name)
            .map(Vec::as_slice)
    }

    pub fn into_exceeded_quotas(self) -> Vec<ExceededQuota> {
        self.entries
            .into_iter()
            .flat_map(|(quota_name, resources)| {
                resources
                    .into_iter()
                    .map(move |(resource_name, affected_resources)| ExceededQuota {
                        quota_name: quota_name.clone(),
                        resource_name: resource_name.to_string(),
                        affected_resources,
                    })
            })
            .collect()
    }

    pub fn into_status(self) -> ResourceQuotasStatus {
        if self.is_empty() {
            return ResourceQuotasStatus {
                exceeded: false,
                exceeded_quotas: Vec::new(),
            };
        }
        ResourceQuotasStatus {
            exceeded: true,
            exceeded_quotas: self.into_exceeded_quotas(),
        }
    }
}
