use serde::{Deserialize, Serialize};

/// A quota that would block at least one scaling workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceededQuota {
    pub quota_name: String,
    pub resource_name: String,
    /// `"<Kind>/<name>"` of every workload blocked by this quota.
    pub affected_resources: Vec<String>,
}

/// Answer to "would any quota in this namespace block a scale-up?".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuotasStatus {
    pub exceeded: bool,
    #[serde(default)]
    pub exceeded_quotas: Vec<ExceededQuota>,
}
