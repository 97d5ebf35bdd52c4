use axum::{
    Json,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::AppState;

/// GET /api/v1/namespaces/{ns}/resourcequotasstatus: which quotas would
/// block the workloads that are scaling up right now.
pub async fn resource_quotas_status(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
) -> Response {
    match state.quota_status.check_resource_quota_status(&ns) {
        Ok(status) => {
            info!(
                "ResourceQuota status for {}: exceeded={} ({} entries)",
                ns,
                status.exceeded,
                status.exceeded_quotas.len()
            );
            (StatusCode::OK, Json(status)).into_response()
        }
        Err(e) => {
            error!("ResourceQuota status check failed for {}: {:#}", ns, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response()
        }
    }
}
