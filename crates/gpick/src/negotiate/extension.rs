use hashbrown::HashSet;

use crate::{generic::QueryError, CapabilityQuery};

/// Name of the device extension that provides swapchains.
pub const SWAPCHAIN_EXTENSION: &str = "VK_KHR_swapchain";

/// Returns required extensions the device does not expose, sorted by name.
pub fn missing_extensions<Q, S>(
    query: &Q,
    device: Q::Device,
    required: &[S],
) -> Result<Vec<String>, QueryError>
where
    Q: CapabilityQuery + ?Sized,
    S: AsRef<str>,
{
    let mut missing: HashSet<&str> = required.iter().map(|name| name.as_ref()).collect();

    if missing.is_empty() {
        return Ok(Vec::new());
    }

    for extension in query.extensions(device)? {
        missing.remove(extension.as_str());
    }

    let mut missing: Vec<String> = missing.into_iter().map(str::to_owned).collect();
    missing.sort_unstable();
    Ok(missing)
}

/// Returns `true` if the device exposes every required extension.
pub fn supports_required<Q, S>(
    query: &Q,
    device: Q::Device,
    required: &[S],
) -> Result<bool, QueryError>
where
    Q: CapabilityQuery + ?Sized,
    S: AsRef<str>,
{
    Ok(missing_extensions(query, device, required)?.is_empty())
}
