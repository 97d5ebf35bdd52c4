use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::ResourceValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitType {
    Container,
    Pod,
}

/// One entry of a LimitRange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRangeItem {
    #[serde(rename = "type")]
    pub limit_type: LimitType,
    /// Limit applied to containers that set none.
    #[serde(default)]
    pub default: ResourceValues,
    /// Request applied to containers that set none.
    #[serde(default)]
    pub default_request: ResourceValues,
    /// Stored and served as-is. Enforcing it is an admission concern; the
    /// quota check never reads it.
    #[serde(default)]
    pub max: ResourceValues,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRange {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub limits: Vec<LimitRangeItem>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_uses_kubernetes_field_names() {
        let item: LimitRangeItem = serde_json::from_str(
            r#"{"type": "Container", "defaultRequest": {"memory": "128Mi"}, "max": {"cpu": "2"}}"#,
        )
        .unwrap();
        assert_eq!(item.limit_type, LimitType::Container);
        assert_eq!(item.default_request.memory.to_string(), "128Mi");
        assert!(item.default.memory.is_zero());

        let stored = serde_json::to_value(&item).unwrap();
        assert_eq!(stored["max"]["cpu"], "2");
    }
}
