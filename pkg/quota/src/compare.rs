use pkg_types::quantity::Quantity;
use pkg_types::quota::ResourceQuota;
use pkg_types::resource::ResourceName;

use crate::usage::ProjectedUsage;

/// A quota/resource pair without room for the projected usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceededRef {
    pub quota_name: String,
    pub resource_name: ResourceName,
}

/// Compare projected usage with every quota's `hard - used` headroom.
///
/// A quota that lacks either `hard` or `used` for a resource does not
/// constrain that resource. Values are compared as whole units, each
/// rounded up, so `500m` of CPU needs a full core of headroom.
pub fn check_available_resources(
    usage: &ProjectedUsage,
    resources: &[ResourceName],
    quotas: &[ResourceQuota],
) -> Vec<ExceededRef> {
    let mut exceeded = Vec::new();
    for quota in quotas {
        for &name in resources {
            let Some(headroom) = quota.headroom(name) else {
                continue;
            };
            let projected = usage.get(&name).map(Quantity::value).unwrap_or(0);
            if headroom < projected {
                exceeded.push(ExceededRef {
                    quota_name: quota.name.clone(),
                    resource_name: name,
                });
            }
        }
    }
    exceeded
}
