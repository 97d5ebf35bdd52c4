use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::quantity::Quantity;

// --- Resource names ---

/// Names a quota can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceName {
    #[serde(rename = "requests.memory")]
    RequestsMemory,
    #[serde(rename = "requests.cpu")]
    RequestsCpu,
    #[serde(rename = "limits.memory")]
    LimitsMemory,
    #[serde(rename = "limits.cpu")]
    LimitsCpu,
    #[serde(rename = "pods")]
    Pods,
}

impl ResourceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceName::RequestsMemory => "requests.memory",
            ResourceName::RequestsCpu => "requests.cpu",
            ResourceName::LimitsMemory => "limits.memory",
            ResourceName::LimitsCpu => "limits.cpu",
            ResourceName::Pods => "pods",
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requests.memory" => Ok(ResourceName::RequestsMemory),
            "requests.cpu" => Ok(ResourceName::RequestsCpu),
            "limits.memory" => Ok(ResourceName::LimitsMemory),
            "limits.cpu" => Ok(ResourceName::LimitsCpu),
            "pods" => Ok(ResourceName::Pods),
            other => anyhow::bail!("unsupported resource name '{}'", other),
        }
    }
}

/// Quota-style resource list keyed by resource name.
pub type ResourceList = BTreeMap<ResourceName, Quantity>;

// --- Compute resources ---

/// CPU and memory pair. A zero quantity means the value was not set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceValues {
    #[serde(default)]
    pub cpu: Quantity,
    #[serde(default)]
    pub memory: Quantity,
}

/// Container resource requests and limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default)]
    pub requests: ResourceValues,
    #[serde(default)]
    pub limits: ResourceValues,
}

impl ResourceRequirements {
    /// The quantity backing a quota resource name, if it has one.
    pub fn get(&self, name: ResourceName) -> Option<Quantity> {
        match name {
            ResourceName::RequestsMemory => Some(self.requests.memory),
            ResourceName::RequestsCpu => Some(self.requests.cpu),
            ResourceName::LimitsMemory => Some(self.limits.memory),
            ResourceName::LimitsCpu => Some(self.limits.cpu),
            ResourceName::Pods => None,
        }
    }
}
