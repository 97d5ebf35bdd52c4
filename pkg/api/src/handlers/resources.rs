use axum::{
    Json,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use pkg_constants::registry::{
    LIMIT_RANGES, NAMESPACED_RESOURCES, NAMESPACES, REPLICA_SETS, RESOURCE_QUOTAS, STATEFUL_SETS,
    namespace_key, namespace_prefix, object_key, resource_prefix,
};
use pkg_types::limitrange::LimitRange;
use pkg_types::namespace::Namespace;
use pkg_types::quota::{ResourceQuota, ResourceQuotaStatusUpdate};
use pkg_types::replicaset::ReplicaSet;
use pkg_types::statefulset::StatefulSet;
use pkg_types::validate::{validate_name, validate_object};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{error, info, warn};

use crate::AppState;

/// A namespaced object kept under `/registry/<resource>/<ns>/<name>`.
pub trait StoredObject: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: &'static str;
    const RESOURCE: &'static str;

    fn name(&self) -> &str;
    fn set_namespace(&mut self, namespace: &str);
    fn stamp_created(&mut self);
}

macro_rules! stored_object {
    ($ty:ty, $kind:literal, $resource:expr) => {
        impl StoredObject for $ty {
            const KIND: &'static str = $kind;
            const RESOURCE: &'static str = $resource;

            fn name(&self) -> &str {
                &self.name
            }

            fn set_namespace(&mut self, namespace: &str) {
                self.namespace = namespace.to_string();
            }

            fn stamp_created(&mut self) {
                self.created_at = Utc::now();
            }
        }
    };
}

stored_object!(ResourceQuota, "ResourceQuota", RESOURCE_QUOTAS);
stored_object!(LimitRange, "LimitRange", LIMIT_RANGES);
stored_object!(ReplicaSet, "ReplicaSet", REPLICA_SETS);
stored_object!(StatefulSet, "StatefulSet", STATEFUL_SETS);

// ============================================================
// Namespaces
// ============================================================

pub async fn create_namespace(
    State(state): State<AppState>,
    Json(mut ns): Json<Namespace>,
) -> Response {
    if let Err(e) = validate_name(&ns.name) {
        return (StatusCode::BAD_REQUEST, format!("invalid namespace: {}", e)).into_response();
    }
    ns.created_at = Utc::now();
    if let Err(e) = state.store.put_json(&namespace_key(&ns.name), &ns).await {
        warn!("Failed to create namespace {}: {:#}", ns.name, e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create namespace").into_response();
    }
    info!("Created namespace: {}", ns.name);
    (StatusCode::CREATED, Json(ns)).into_response()
}

pub async fn list_namespaces(State(state): State<AppState>) -> Response {
    match state
        .store
        .list_json::<Namespace>(&resource_prefix(NAMESPACES))
        .await
    {
        Ok(entries) => {
            let namespaces: Vec<Namespace> = entries.into_iter().map(|(_, ns)| ns).collect();
            (StatusCode::OK, Json(namespaces)).into_response()
        }
        Err(e) => {
            error!("Failed to list namespaces: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to list namespaces").into_response()
        }
    }
}

// ============================================================
// Namespaced objects
// ============================================================

/// `POST /api/v1/namespaces/{ns}/<resource>`. The path namespace wins over
/// whatever the body carries.
pub async fn create_object<T: StoredObject>(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
    Json(mut object): Json<T>,
) -> Response {
    if let Err(e) = validate_object(T::KIND, &ns, object.name()) {
        return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
    }
    match state.store.get(&namespace_key(&ns)).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (StatusCode::NOT_FOUND, format!("namespace {} not found", ns)).into_response();
        }
        Err(e) => {
            error!("Failed to look up namespace {}: {:#}", ns, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    object.set_namespace(&ns);
    object.stamp_created();
    let key = object_key(T::RESOURCE, &ns, object.name());
    if let Err(e) = state.store.put_json(&key, &object).await {
        warn!("Failed to create {} {}/{}: {:#}", T::KIND, ns, object.name(), e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to create {}", T::KIND),
        )
            .into_response();
    }
    info!("Created {} {}/{}", T::KIND, ns, object.name());
    (StatusCode::CREATED, Json(object)).into_response()
}

/// `GET /api/v1/namespaces/{ns}/<resource>`, read straight from the store.
pub async fn list_objects<T: StoredObject>(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
) -> Response {
    match state
        .store
        .list_json::<T>(&namespace_prefix(T::RESOURCE, &ns))
        .await
    {
        Ok(entries) => {
            let objects: Vec<T> = entries.into_iter().map(|(_, object)| object).collect();
            (StatusCode::OK, Json(objects)).into_response()
        }
        Err(e) => {
            error!("Failed to list {} in {}: {:#}", T::RESOURCE, ns, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to list {}", T::RESOURCE),
            )
                .into_response()
        }
    }
}

/// Read-modify-write of a stored object. `None` from the store maps to 404.
pub(crate) async fn update_object<T: StoredObject>(
    state: &AppState,
    ns: &str,
    name: &str,
    apply: impl FnOnce(&mut T),
) -> Response {
    let key = object_key(T::RESOURCE, ns, name);
    let mut object = match state.store.get_json::<T>(&key).await {
        Ok(Some(object)) => object,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                format!("{} {}/{} not found", T::KIND, ns, name),
            )
                .into_response();
        }
        Err(e) => {
            error!("Failed to read {} {}/{}: {:#}", T::KIND, ns, name, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    apply(&mut object);
    if let Err(e) = state.store.put_json(&key, &object).await {
        warn!("Failed to update {} {}/{}: {:#}", T::KIND, ns, name, e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (StatusCode::OK, Json(object)).into_response()
}

// ============================================================
// ResourceQuota status
// ============================================================

/// `PUT /api/v1/namespaces/{ns}/resourcequotas/{name}/status`: replaces
/// `used` wholesale, the way a quota controller reports consumption.
pub async fn update_quota_status(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
    Json(update): Json<ResourceQuotaStatusUpdate>,
) -> Response {
    info!("Updating used of ResourceQuota {}/{}", ns, name);
    update_object::<ResourceQuota>(&state, &ns, &name, |quota| quota.used = update.used).await
}

// ============================================================
// Generic delete
// ============================================================

pub async fn delete_resource(
    State(state): State<AppState>,
    AxumPath((resource_type, ns, name)): AxumPath<(String, String, String)>,
) -> Response {
    if !NAMESPACED_RESOURCES.contains(&resource_type.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            format!("unknown resource type {}", resource_type),
        )
            .into_response();
    }
    let key = object_key(&resource_type, &ns, &name);
    match state.store.get(&key).await {
        Ok(Some(_)) => {}
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!("Failed to read {}: {:#}", key, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    match state.store.delete(&key).await {
        Ok(()) => {
            info!("Deleted {}/{}/{}", resource_type, ns, name);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            warn!("Failed to delete {}: {:#}", key, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
