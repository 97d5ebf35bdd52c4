use axum::{
    Router, middleware,
    routing::{delete, get, put},
};
use chrono::Utc;
use pkg_constants::registry::namespace_key;
use pkg_constants::state::DEFAULT_NAMESPACES;
use pkg_controllers::CacheSyncController;
use pkg_quota::ResourceQuotaStatusService;
use pkg_state::{ObjectCache, StateStore};
use pkg_types::limitrange::LimitRange;
use pkg_types::namespace::Namespace;
use pkg_types::quota::ResourceQuota;
use pkg_types::replicaset::ReplicaSet;
use pkg_types::statefulset::StatefulSet;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use crate::AppState;
use crate::auth::auth_middleware;
use crate::handlers::{cluster, quota_status, resources, workloads};
use crate::request_id::request_id_middleware;

/// Server configuration passed from the binary's CLI.
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub data_dir: String,
    pub join_token: String,
    pub resync_interval: Duration,
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let store = StateStore::new(&config.data_dir).await?;
    seed_default_namespaces(&store).await?;

    let cache = ObjectCache::new();
    CacheSyncController::new(store.clone(), cache.clone(), config.resync_interval).start();

    let state = AppState {
        store,
        cache: cache.clone(),
        quota_status: Arc::new(ResourceQuotaStatusService::from_cache(cache)),
        join_token: config.join_token,
        listen_addr: config.addr.to_string(),
    };

    let app = router(state);

    info!("Starting API server on {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/v1/namespaces",
            get(resources::list_namespaces).post(resources::create_namespace),
        )
        // Quotas
        .route(
            "/api/v1/namespaces/{ns}/resourcequotas",
            get(resources::list_objects::<ResourceQuota>)
                .post(resources::create_object::<ResourceQuota>),
        )
        .route(
            "/api/v1/namespaces/{ns}/resourcequotas/{name}/status",
            put(resources::update_quota_status),
        )
        .route(
            "/api/v1/namespaces/{ns}/resourcequotasstatus",
            get(quota_status::resource_quotas_status),
        )
        // LimitRanges
        .route(
            "/api/v1/namespaces/{ns}/limitranges",
            get(resources::list_objects::<LimitRange>)
                .post(resources::create_object::<LimitRange>),
        )
        // ReplicaSets
        .route(
            "/api/v1/namespaces/{ns}/replicasets",
            get(resources::list_objects::<ReplicaSet>)
                .post(resources::create_object::<ReplicaSet>),
        )
        .route(
            "/api/v1/namespaces/{ns}/replicasets/{name}/scale",
            put(workloads::scale_replica_set),
        )
        .route(
            "/api/v1/namespaces/{ns}/replicasets/{name}/status",
            put(workloads::update_replica_set_status),
        )
        // StatefulSets
        .route(
            "/api/v1/namespaces/{ns}/statefulsets",
            get(resources::list_objects::<StatefulSet>)
                .post(resources::create_object::<StatefulSet>),
        )
        .route(
            "/api/v1/namespaces/{ns}/statefulsets/{name}/scale",
            put(workloads::scale_stateful_set),
        )
        .route(
            "/api/v1/namespaces/{ns}/statefulsets/{name}/status",
            put(workloads::update_stateful_set_status),
        )
        .route(
            "/api/v1/{resource_type}/{ns}/{name}",
            delete(resources::delete_resource),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/api/v1/cluster/info", get(cluster::cluster_info))
        .merge(api_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Seed default and system namespaces on startup.
async fn seed_default_namespaces(store: &StateStore) -> anyhow::Result<()> {
    for name in DEFAULT_NAMESPACES {
        let key = namespace_key(name);
        if store.get(&key).await?.is_none() {
            let ns = Namespace {
                name: name.to_string(),
                labels: BTreeMap::new(),
                created_at: Utc::now(),
            };
            store.put_json(&key, &ns).await?;
            info!("Seeded namespace: {}", name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use pkg_constants::network::REQUEST_ID_HEADER;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const TOKEN: &str = "test-token";

    struct TestServer {
        app: Router,
        state: AppState,
    }

    impl TestServer {
        async fn start() -> Self {
            let dir = std::env::temp_dir().join(format!("console-api-{}", uuid::Uuid::new_v4()));
            let store = StateStore::new(dir.to_str().unwrap()).await.unwrap();
            seed_default_namespaces(&store).await.unwrap();
            let cache = ObjectCache::new();
            let state = AppState {
                store,
                cache: cache.clone(),
                quota_status: Arc::new(ResourceQuotaStatusService::from_cache(cache)),
                join_token: TOKEN.to_string(),
                listen_addr: "127.0.0.1:8080".to_string(),
            };
            Self {
                app: router(state.clone()),
                state,
            }
        }

        async fn resync(&self) {
            CacheSyncController::new(
                self.state.store.clone(),
                self.state.cache.clone(),
                Duration::from_secs(60),
            )
            .resync()
            .await
            .unwrap();
        }

        async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
            let mut req = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN));
            let body = match body {
                Some(json) => {
                    req = req.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };
            let resp = self.app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
            let status = resp.status();
            let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
            (status, bytes.to_vec())
        }
    }

    fn memory_quota(used: &str) -> Value {
        json!({
            "name": "compute",
            "hard": {"requests.memory": "1Gi"},
            "used": {"requests.memory": used},
        })
    }

    fn scaling_replica_set() -> Value {
        json!({
            "name": "web",
            "spec": {
                "replicas": 2,
                "template": {"containers": [{
                    "name": "app",
                    "image": "nginx:1.27",
                    "resources": {"requests": {"memory": "200Mi"}},
                }]},
            },
            "status": {"replicas": 1},
        })
    }

    #[tokio::test]
    async fn quota_status_reports_blocked_workloads() {
        let server = TestServer::start().await;
        let (status, _) = server
            .send(Method::POST, "/api/v1/namespaces/default/resourcequotas", Some(memory_quota("900Mi")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = server
            .send(Method::POST, "/api/v1/namespaces/default/replicasets", Some(scaling_replica_set()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        server.resync().await;

        let (status, body) = server
            .send(Method::GET, "/api/v1/namespaces/default/resourcequotasstatus", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            json!({
                "exceeded": true,
                "exceededQuotas": [{
                    "quotaName": "compute",
                    "resourceName": "requests.memory",
                    "affectedResources": ["ReplicaSet/web"],
                }],
            })
        );
    }

    #[tokio::test]
    async fn quota_status_follows_quota_status_updates() {
        let server = TestServer::start().await;
        server
            .send(Method::POST, "/api/v1/namespaces/default/resourcequotas", Some(memory_quota("900Mi")))
            .await;
        server
            .send(Method::POST, "/api/v1/namespaces/default/replicasets", Some(scaling_replica_set()))
            .await;
        let (status, _) = server
            .send(
                Method::PUT,
                "/api/v1/namespaces/default/resourcequotas/compute/status",
                Some(json!({"used": {"requests.memory": "700Mi"}})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        server.resync().await;

        let (status, body) = server
            .send(Method::GET, "/api/v1/namespaces/default/resourcequotasstatus", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"exceeded": false, "exceededQuotas": []}));
    }

    #[tokio::test]
    async fn quota_status_before_first_sync_is_a_server_error() {
        let server = TestServer::start().await;
        let (status, body) = server
            .send(Method::GET, "/api/v1/namespaces/default/resourcequotasstatus", None)
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("while listing ResourceQuotas [namespace: default]"));
        assert!(body.contains("not synced"));
    }

    #[tokio::test]
    async fn invalid_names_are_rejected() {
        let server = TestServer::start().await;
        let mut quota = memory_quota("0");
        quota["name"] = json!("Compute_1");
        let (status, body) = server
            .send(Method::POST, "/api/v1/namespaces/default/resourcequotas", Some(quota))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().contains("invalid ResourceQuota name"));

        let (status, _) = server
            .send(Method::POST, "/api/v1/namespaces", Some(json!({"name": "-bad"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn scaling_a_missing_workload_is_not_found() {
        let server = TestServer::start().await;
        let (status, _) = server
            .send(
                Method::PUT,
                "/api/v1/namespaces/default/replicasets/ghost/scale",
                Some(json!({"replicas": 3})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = server
            .send(
                Method::PUT,
                "/api/v1/namespaces/default/statefulsets/ghost/status",
                Some(json!({"replicas": 1})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn scale_updates_desired_replicas() {
        let server = TestServer::start().await;
        server
            .send(Method::POST, "/api/v1/namespaces/default/replicasets", Some(scaling_replica_set()))
            .await;
        let (status, body) = server
            .send(
                Method::PUT,
                "/api/v1/namespaces/default/replicasets/web/scale",
                Some(json!({"replicas": 5})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["spec"]["replicas"], 5);
        assert_eq!(body["namespace"], "default");
    }

    #[tokio::test]
    async fn api_requires_the_bearer_token() {
        let server = TestServer::start().await;
        let unauthenticated = |uri: &str| {
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };

        let resp = server
            .app
            .clone()
            .oneshot(unauthenticated("/api/v1/namespaces"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = server
            .app
            .clone()
            .oneshot(unauthenticated("/api/v1/cluster/info"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn delete_rejects_unknown_resource_types() {
        let server = TestServer::start().await;
        let (status, _) = server
            .send(Method::DELETE, "/api/v1/secrets/default/db", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = server
            .send(Method::DELETE, "/api/v1/resourcequotas/default/missing", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
