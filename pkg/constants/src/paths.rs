//! Filesystem path constants.

/// Default config file path for the server.
pub const DEFAULT_SERVER_CONFIG: &str = "/etc/console/config.yaml";

/// Default data directory for the server state store.
pub const DEFAULT_SERVER_DATA_DIR: &str = "/tmp/console-data";

/// Default config file path for `consolectl`.
pub const DEFAULT_CLIENT_CONFIG: &str = "/etc/console/client.yaml";
