//! Resource-quota feasibility checks.
//!
//! Answers "which ResourceQuotas in a namespace would stop a workload from
//! creating its next replica?". Workloads that are below their desired
//! replica count get the footprint of one more pod estimated (falling back
//! to LimitRange defaults for unset container values) and compared against
//! each quota's remaining headroom.

pub mod compare;
pub mod defaults;
pub mod lister;
pub mod service;
pub mod status;
pub mod usage;

#[cfg(test)]
pub(crate) mod fixtures;

use pkg_types::resource::ResourceName;

pub use service::ResourceQuotaStatusService;

/// Resources examined by the feasibility check, in reporting order.
pub const CHECKED_RESOURCES: &[ResourceName] = &[
    ResourceName::RequestsMemory,
    ResourceName::RequestsCpu,
    ResourceName::LimitsMemory,
    ResourceName::LimitsCpu,
];
