use axum::{
    Json,
    extract::{Path as AxumPath, State},
    response::Response,
};
use pkg_types::replicaset::{ReplicaSet, ReplicaSetStatus};
use pkg_types::statefulset::{StatefulSet, StatefulSetStatus};
use pkg_types::workload::Scale;
use tracing::info;

use super::resources::update_object;
use crate::AppState;

// `scale` sets spec.replicas (what a user or autoscaler asks for), `status`
// sets what the workload controller last observed. A workload whose desired
// count is above its observed count is what the quota check looks at.

pub async fn scale_replica_set(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
    Json(scale): Json<Scale>,
) -> Response {
    info!("Scaling ReplicaSet {}/{} to {}", ns, name, scale.replicas);
    update_object::<ReplicaSet>(&state, &ns, &name, |rs| rs.spec.replicas = scale.replicas).await
}

pub async fn update_replica_set_status(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
    Json(status): Json<ReplicaSetStatus>,
) -> Response {
    update_object::<ReplicaSet>(&state, &ns, &name, |rs| rs.status = status).await
}

pub async fn scale_stateful_set(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
    Json(scale): Json<Scale>,
) -> Response {
    info!("Scaling StatefulSet {}/{} to {}", ns, name, scale.replicas);
    update_object::<StatefulSet>(&state, &ns, &name, |ss| ss.spec.replicas = scale.replicas).await
}

pub async fn update_stateful_set_status(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
    Json(status): Json<StatefulSetStatus>,
) -> Response {
    update_object::<StatefulSet>(&state, &ns, &name, |ss| ss.status = status).await
}
