pub mod auth;
pub mod handlers;
pub mod request_id;
pub mod server;

use std::sync::Arc;

use pkg_quota::ResourceQuotaStatusService;
use pkg_state::{ObjectCache, StateStore};

/// Shared application state injected into all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: StateStore,
    pub cache: ObjectCache,
    pub quota_status: Arc<ResourceQuotaStatusService>,
    pub join_token: String,
    pub listen_addr: String,
}
