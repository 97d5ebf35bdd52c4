//! Registry key layout.
//!
//! Namespaced objects live under `/registry/<plural>/<namespace>/<name>`.

/// Prefix of every key written by the API server.
pub const REGISTRY_PREFIX: &str = "/registry";

pub const NAMESPACES: &str = "namespaces";
pub const RESOURCE_QUOTAS: &str = "resourcequotas";
pub const LIMIT_RANGES: &str = "limitranges";
pub const REPLICA_SETS: &str = "replicasets";
pub const STATEFUL_SETS: &str = "statefulsets";

/// Resource types that can be addressed by the generic delete route.
pub const NAMESPACED_RESOURCES: &[&str] =
    &[RESOURCE_QUOTAS, LIMIT_RANGES, REPLICA_SETS, STATEFUL_SETS];

/// Key prefix for all objects of `resource` in every namespace.
pub fn resource_prefix(resource: &str) -> String {
    format!("{}/{}/", REGISTRY_PREFIX, resource)
}

/// Key prefix for all objects of `resource` in `namespace`.
pub fn namespace_prefix(resource: &str, namespace: &str) -> String {
    format!("{}/{}/{}/", REGISTRY_PREFIX, resource, namespace)
}

/// Key of a single namespaced object.
pub fn object_key(resource: &str, namespace: &str, name: &str) -> String {
    format!("{}/{}/{}/{}", REGISTRY_PREFIX, resource, namespace, name)
}

/// Key of a namespace object.
pub fn namespace_key(name: &str) -> String {
    format!("{}/{}/{}", REGISTRY_PREFIX, NAMESPACES, name)
}

/// Split `/registry/<resource>/<namespace>/<name>` into `(namespace, name)`.
pub fn split_object_key<'a>(resource: &str, key: &'a str) -> Option<(&'a str, &'a str)> {
    let rest = key
        .strip_prefix(REGISTRY_PREFIX)?
        .strip_prefix('/')?
        .strip_prefix(resource)?
        .strip_prefix('/')?;
    let (namespace, name) = rest.split_once('/')?;
    if namespace.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((namespace, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_round_trips_through_split() {
        let key = object_key(REPLICA_SETS, "prod", "web-7d9f");
        assert_eq!(key, "/registry/replicasets/prod/web-7d9f");
        assert_eq!(split_object_key(REPLICA_SETS, &key), Some(("prod", "web-7d9f")));
    }

    #[test]
    fn split_rejects_foreign_or_malformed_keys() {
        assert_eq!(split_object_key(REPLICA_SETS, "/registry/statefulsets/prod/db"), None);
        assert_eq!(split_object_key(REPLICA_SETS, "/registry/replicasets/prod"), None);
        assert_eq!(split_object_key(REPLICA_SETS, "/registry/replicasets/prod/a/b"), None);
        assert_eq!(split_object_key(REPLICA_SETS, "/registry/replicasets//web"), None);
    }
}
