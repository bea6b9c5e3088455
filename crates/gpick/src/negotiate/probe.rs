use crate::{
    generic::{QueryError, SwapchainSupport},
    CapabilityQuery,
};

/// Gathers surface capabilities, formats and present modes
/// for a device/surface pair.
///
/// Empty lists are returned as is. Whether they are acceptable
/// is decided by the scorer and the negotiator.
pub fn probe_swapchain_support<Q>(
    query: &Q,
    device: Q::Device,
    surface: Q::Surface,
) -> Result<SwapchainSupport, QueryError>
where
    Q: CapabilityQuery + ?Sized,
{
    Ok(SwapchainSupport {
        capabilities: query.surface_capabilities(device, surface)?,
        formats: query.surface_formats(device, surface)?,
        present_modes: query.present_modes(device, surface)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generic::{ColorSpace, PixelFormat, PresentMode, SurfaceFormat},
        negotiate::mock::{capabilities, MockDevice, MockQuery},
    };

    #[test]
    fn aggregates_all_three_queries() {
        let formats = [
            SurfaceFormat::new(PixelFormat::Rgba8Unorm, ColorSpace::SrgbNonlinear),
            SurfaceFormat::new(PixelFormat::Bgra8Srgb, ColorSpace::SrgbNonlinear),
        ];
        let query = MockQuery::new([MockDevice::suitable("a")
            .with_formats(&formats)
            .with_present_modes(&[PresentMode::Fifo, PresentMode::Mailbox])]);

        let support = probe_swapchain_support(&query, 0, ()).unwrap();
        assert_eq!(support.capabilities, capabilities());
        assert_eq!(support.formats, formats);
        assert_eq!(support.present_modes, [PresentMode::Fifo, PresentMode::Mailbox]);
        assert!(support.is_adequate());
    }

    #[test]
    fn empty_lists_are_not_errors() {
        let query = MockQuery::new([MockDevice::suitable("a")
            .with_formats(&[])
            .with_present_modes(&[])]);

        let support = probe_swapchain_support(&query, 0, ()).unwrap();
        assert!(support.formats.is_empty());
        assert!(support.present_modes.is_empty());
        assert!(!support.is_adequate());
    }
}
