pub mod cluster;
pub mod quota_status;
pub mod resources;
pub mod workloads;
