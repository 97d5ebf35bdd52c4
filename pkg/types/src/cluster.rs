use serde::{Deserialize, Serialize};

/// Response of `GET /api/v1/cluster/info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    pub endpoint: String,
    pub version: String,
    pub state_store: String,
    pub cache_synced: bool,
    pub namespace_count: usize,
}
