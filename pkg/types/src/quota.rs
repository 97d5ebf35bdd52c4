use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::{ResourceList, ResourceName};

/// Resource quota for a namespace: `hard` is the ceiling, `used` the
/// consumption last observed by the quota controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuota {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub hard: ResourceList,
    #[serde(default)]
    pub used: ResourceList,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ResourceQuota {
    /// `hard - used` for a resource in whole units (each side rounded up
    /// first), or `None` when the quota does not track both values.
    pub fn headroom(&self, name: ResourceName) -> Option<i64> {
        let hard = self.hard.get(&name)?;
        let used = self.used.get(&name)?;
        Some(hard.value().saturating_sub(used.value()))
    }
}

/// Body of `PUT .../resourcequotas/{name}/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceQuotaStatusUpdate {
    #[serde(default)]
    pub used: ResourceList,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn quota(hard: &[(ResourceName, &str)], used: &[(ResourceName, &str)]) -> ResourceQuota {
        let list = |entries: &[(ResourceName, &str)]| -> ResourceList {
            entries.iter().map(|(n, v)| (*n, v.parse().unwrap())).collect()
        };
        ResourceQuota {
            name: "compute".to_string(),
            namespace: "prod".to_string(),
            hard: list(hard),
            used: list(used),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn headroom_rounds_each_side_up() {
        let q = quota(&[(ResourceName::LimitsCpu, "2")], &[(ResourceName::LimitsCpu, "1500m")]);
        assert_eq!(q.headroom(ResourceName::LimitsCpu), Some(0));

        let q = quota(&[(ResourceName::RequestsMemory, "1Gi")], &[(ResourceName::RequestsMemory, "900Mi")]);
        assert_eq!(q.headroom(ResourceName::RequestsMemory), Some(124 * 1024 * 1024));
    }

    #[test]
    fn headroom_needs_hard_and_used() {
        let q = quota(&[(ResourceName::RequestsCpu, "1")], &[(ResourceName::LimitsCpu, "1")]);
        assert_eq!(q.headroom(ResourceName::RequestsCpu), None);
        assert_eq!(q.headroom(ResourceName::LimitsCpu), None);
    }

    #[test]
    fn overused_quota_has_negative_headroom() {
        let q = quota(&[(ResourceName::Pods, "2")], &[(ResourceName::Pods, "5")]);
        assert_eq!(q.headroom(ResourceName::Pods), Some(-3));
    }
}
