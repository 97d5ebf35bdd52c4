//! Kubernetes-style API objects served by the console backend.

pub mod cluster;
pub mod config;
pub mod limitrange;
pub mod namespace;
pub mod pod;
pub mod quantity;
pub mod quota;
pub mod replicaset;
pub mod resource;
pub mod statefulset;
pub mod status;
pub mod validate;
pub mod workload;
