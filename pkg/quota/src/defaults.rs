use anyhow::Context;
use pkg_types::limitrange::{LimitRange, LimitRangeItem, LimitType};
use pkg_types::quantity::Quantity;
use pkg_types::resource::{ResourceRequirements, ResourceValues};

use crate::lister::LimitRangeLister;

/// Requests and limits applied to containers that leave them unset.
/// Same shape as a container's own resources.
pub type DefaultLimits = ResourceRequirements;

/// Effective defaults for a namespace: the elementwise maximum over every
/// Container-type LimitRange item. No LimitRanges yields all zeros.
pub fn get_default_limits(
    lister: &dyn LimitRangeLister,
    namespace: &str,
) -> anyhow::Result<DefaultLimits> {
    let ranges = lister
        .list_limit_ranges(namespace)
        .with_context(|| format!("while listing LimitRanges [namespace: {}]", namespace))?;
    Ok(aggregate_limit_ranges(&ranges))
}

pub fn aggregate_limit_ranges(ranges: &[LimitRange]) -> DefaultLimits {
    let mut defaults = DefaultLimits::default();
    for item in ranges
        .iter()
        .flat_map(|range| &range.limits)
        .filter(|item| item.limit_type == LimitType::Container)
    {
        let request = effective_default_request(item);
        raise(&mut defaults.requests.memory, request.memory);
        raise(&mut defaults.requests.cpu, request.cpu);
        raise(&mut defaults.limits.memory, item.default.memory);
        raise(&mut defaults.limits.cpu, item.default.cpu);
    }
    defaults
}

/// An unset `defaultRequest` falls back to the item's `default`, per resource.
fn effective_default_request(item: &LimitRangeItem) -> ResourceValues {
    let pick = |request: Quantity, limit: Quantity| if request.is_zero() { limit } else { request };
    ResourceValues {
        cpu: pick(item.default_request.cpu, item.default.cpu),
        memory: pick(item.default_request.memory, item.default.memory),
    }
}

// Ties keep the current value.
fn raise(current: &mut Quantity, candidate: Quantity) {
    if candidate > *current {
        *current = candidate;
    }
}
