use pkg_types::pod::ContainerSpec;
use pkg_types::quantity::Quantity;
use pkg_types::resource::ResourceName;
use std::collections::BTreeMap;
use tracing::debug;

use crate::defaults::DefaultLimits;

/// Projected consumption of one extra pod, per resource name.
pub type ProjectedUsage = BTreeMap<ResourceName, Quantity>;

/// Footprint of the next replica: the sum over all containers of the
/// template, each container contributing its own value or, when that is
/// zero, the namespace default.
///
/// An explicit `0` cannot be told apart from "unset" and also receives the
/// default.
pub fn next_replica_usage(
    containers: &[ContainerSpec],
    resources: &[ResourceName],
    defaults: &DefaultLimits,
) -> ProjectedUsage {
    let mut usage = ProjectedUsage::new();
    for &name in resources {
        let Some(fallback) = defaults.get(name) else {
            debug!("Usage of `{}` is not estimated per replica", name);
            continue;
        };
        let total = usage.entry(name).or_insert_with(Quantity::zero);
        for container in containers {
            match container.resources.get(name) {
                Some(value) if !value.is_zero() => *total += value,
                _ => *total += fallback,
            }
        }
    }
    usage
}
