//! State store / cache constants.

/// How often the object cache is resynced from the state store, in seconds.
pub const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 10;

/// Namespaces created on first start.
pub const DEFAULT_NAMESPACES: &[&str] = &["default", "kube-system"];
