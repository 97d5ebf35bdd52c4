use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pkg_constants::registry::{NAMESPACES, resource_prefix};
use pkg_types::cluster::ClusterInfo;
use tracing::{error, info};

use crate::AppState;

/// GET /api/v1/cluster/info: return server metadata.
pub async fn cluster_info(State(state): State<AppState>) -> Response {
    info!("Serving cluster info request");

    let namespaces = match state.store.list_prefix(&resource_prefix(NAMESPACES)).await {
        Ok(entries) => entries.len(),
        Err(e) => {
            error!("Failed to list namespaces: {:#}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to list namespaces").into_response();
        }
    };

    let cache_synced = match state.cache.is_synced() {
        Ok(synced) => synced,
        Err(e) => {
            error!("Failed to read object cache state: {:#}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response();
        }
    };

    let info = ClusterInfo {
        endpoint: format!("http://{}", state.listen_addr),
        version: concat!("v", env!("CARGO_PKG_VERSION")).to_string(),
        state_store: "SlateDB (local)".to_string(),
        cache_synced,
        namespace_count: namespaces,
    };

    (StatusCode::OK, Json(info)).into_response()
}
