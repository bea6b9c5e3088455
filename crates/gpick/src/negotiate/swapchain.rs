use crate::generic::{
    ColorSpace, CompositeAlpha, Extent2, ImageUsage, NegotiateError, PixelFormat, PresentMode,
    QueueFamilyIndices, SharingMode, SurfaceCapabilities, SurfaceFormat, SurfaceTransforms,
    SwapchainSupport,
};

/// Preferred swapchain parameters.
/// Negotiation falls back to what the surface supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SwapchainPreferences {
    pub surface_format: SurfaceFormat,
    pub present_mode: PresentMode,
    pub image_usage: ImageUsage,
}

impl Default for SwapchainPreferences {
    fn default() -> Self {
        SwapchainPreferences {
            surface_format: SurfaceFormat::new(PixelFormat::Bgra8Srgb, ColorSpace::SrgbNonlinear),
            present_mode: PresentMode::Mailbox,
            image_usage: ImageUsage::COLOR_ATTACHMENT,
        }
    }
}

/// Concrete parameters chosen for a swapchain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Negotiated {
    pub format: SurfaceFormat,
    pub present_mode: PresentMode,
    pub extent: Extent2,
    pub image_count: u32,
}

/// Everything needed to create a swapchain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapchainConfig {
    pub format: SurfaceFormat,
    pub present_mode: PresentMode,
    pub extent: Extent2,
    pub image_count: u32,
    pub pre_transform: SurfaceTransforms,
    pub composite_alpha: CompositeAlpha,
    pub sharing: SharingMode,
    pub image_usage: ImageUsage,
}

/// Picks the preferred format if the surface lists it exactly,
/// otherwise the first listed one.
pub fn choose_surface_format(
    formats: &[SurfaceFormat],
    preferred: SurfaceFormat,
) -> Option<SurfaceFormat> {
    if formats.contains(&preferred) {
        return Some(preferred);
    }

    let first = *formats.first()?;
    tracing::debug!(?preferred, fallback = ?first, "Preferred surface format is not supported");
    Some(first)
}

/// Picks the preferred mode if listed, otherwise FIFO.
pub fn choose_present_mode(modes: &[PresentMode], preferred: PresentMode) -> PresentMode {
    if modes.contains(&preferred) {
        preferred
    } else {
        PresentMode::Fifo
    }
}

/// Uses the surface's current extent unless it asks for the window size,
/// in which case the framebuffer size is clamped into the supported range.
pub fn choose_extent(capabilities: &SurfaceCapabilities, framebuffer: Extent2) -> Extent2 {
    if !capabilities.current_extent.is_undefined() {
        return capabilities.current_extent;
    }

    framebuffer.clamp(capabilities.min_image_extent, capabilities.max_image_extent)
}

/// One image more than the minimum, capped by the maximum when there is one.
pub fn choose_image_count(capabilities: &SurfaceCapabilities) -> u32 {
    let count = capabilities.min_image_count.saturating_add(1);

    match capabilities.max_image_count {
        0 => count,
        max => count.min(max),
    }
}

fn choose_composite_alpha(supported: CompositeAlpha) -> CompositeAlpha {
    if supported.contains(CompositeAlpha::OPAQUE) {
        return CompositeAlpha::OPAQUE;
    }

    // Flags iterate from the lowest bit.
    supported.iter().next().unwrap_or(CompositeAlpha::OPAQUE)
}

/// Chooses format, present mode, extent and image count.
pub fn negotiate(
    support: &SwapchainSupport,
    framebuffer: Extent2,
    preferences: &SwapchainPreferences,
) -> Result<Negotiated, NegotiateError> {
    let format = choose_surface_format(&support.formats, preferences.surface_format)
        .ok_or(NegotiateError::NoSurfaceFormats)?;

    Ok(Negotiated {
        format,
        present_mode: choose_present_mode(&support.present_modes, preferences.present_mode),
        extent: choose_extent(&support.capabilities, framebuffer),
        image_count: choose_image_count(&support.capabilities),
    })
}

/// Negotiates a swapchain and fills in the remaining creation parameters.
pub fn configure_swapchain(
    support: &SwapchainSupport,
    queue_families: &QueueFamilyIndices,
    framebuffer: Extent2,
    preferences: &SwapchainPreferences,
) -> Result<SwapchainConfig, NegotiateError> {
    let sharing = queue_families
        .sharing_mode()
        .ok_or(NegotiateError::IncompleteQueueFamilies)?;

    let negotiated = negotiate(support, framebuffer, preferences)?;
    let capabilities = &support.capabilities;

    let image_usage = preferences.image_usage & capabilities.supported_usage;
    if image_usage != preferences.image_usage {
        tracing::warn!(
            requested = ?preferences.image_usage,
            supported = ?capabilities.supported_usage,
            "Surface does not support all requested image usages"
        );
    }

    let config = SwapchainConfig {
        format: negotiated.format,
        present_mode: negotiated.present_mode,
        extent: negotiated.extent,
        image_count: negotiated.image_count,
        pre_transform: capabilities.current_transform,
        composite_alpha: choose_composite_alpha(capabilities.supported_composite_alpha),
        sharing,
        image_usage,
    };

    tracing::info!(
        format = ?config.format.format,
        color_space = ?config.format.color_space,
        present_mode = %config.present_mode,
        extent = %config.extent,
        image_count = config.image_count,
        "Swapchain negotiated"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiate::mock::capabilities;

    const BGRA_SRGB: SurfaceFormat =
        SurfaceFormat::new(PixelFormat::Bgra8Srgb, ColorSpace::SrgbNonlinear);
    const RGBA_SRGB: SurfaceFormat =
        SurfaceFormat::new(PixelFormat::Rgba8Srgb, ColorSpace::SrgbNonlinear);

    fn support(formats: &[SurfaceFormat], modes: &[PresentMode]) -> SwapchainSupport {
        SwapchainSupport {
            capabilities: capabilities(),
            formats: formats.to_vec(),
            present_modes: modes.to_vec(),
        }
    }

    #[test]
    fn preferred_format_is_found_anywhere() {
        let formats = [RGBA_SRGB, BGRA_SRGB];
        assert_eq!(choose_surface_format(&formats, BGRA_SRGB), Some(BGRA_SRGB));
    }

    #[test]
    fn first_format_is_the_fallback() {
        let linear = SurfaceFormat::new(PixelFormat::Rgba8Unorm, ColorSpace::ExtendedSrgbLinear);
        assert_eq!(choose_surface_format(&[linear], BGRA_SRGB), Some(linear));

        // Same format in another color space is not a match.
        let other_space =
            SurfaceFormat::new(PixelFormat::Bgra8Srgb, ColorSpace::DisplayP3Nonlinear);
        assert_eq!(
            choose_surface_format(&[RGBA_SRGB, other_space], BGRA_SRGB),
            Some(RGBA_SRGB)
        );
    }

    #[test]
    fn no_formats() {
        assert_eq!(choose_surface_format(&[], BGRA_SRGB), None);

        let err = negotiate(
            &support(&[], &[PresentMode::Fifo]),
            Extent2::new(800, 600),
            &SwapchainPreferences::default(),
        )
        .unwrap_err();
        assert!(matches!(err, NegotiateError::NoSurfaceFormats));
    }

    #[test]
    fn present_mode_preference() {
        assert_eq!(
            choose_present_mode(&[PresentMode::Fifo], PresentMode::Mailbox),
            PresentMode::Fifo
        );
        assert_eq!(
            choose_present_mode(&[PresentMode::Fifo, PresentMode::Mailbox], PresentMode::Mailbox),
            PresentMode::Mailbox
        );
        assert_eq!(
            choose_present_mode(&[PresentMode::Immediate, PresentMode::Fifo], PresentMode::Mailbox),
            PresentMode::Fifo
        );
        assert_eq!(
            choose_present_mode(
                &[PresentMode::Immediate, PresentMode::Fifo],
                PresentMode::Immediate
            ),
            PresentMode::Immediate
        );
    }

    #[test]
    fn current_extent_is_used_verbatim() {
        let caps = capabilities();
        assert_eq!(choose_extent(&caps, Extent2::new(1920, 1080)), Extent2::new(800, 600));
    }

    #[test]
    fn undefined_extent_uses_clamped_framebuffer() {
        let caps = SurfaceCapabilities {
            current_extent: Extent2::UNDEFINED,
            min_image_extent: Extent2::new(64, 64),
            max_image_extent: Extent2::new(4096, 4096),
            ..capabilities()
        };

        assert_eq!(choose_extent(&caps, Extent2::new(1024, 768)), Extent2::new(1024, 768));
        assert_eq!(choose_extent(&caps, Extent2::new(5000, 768)), Extent2::new(4096, 768));
        assert_eq!(choose_extent(&caps, Extent2::new(8000, 9000)), Extent2::new(4096, 4096));
        assert_eq!(choose_extent(&caps, Extent2::new(1, 1)), Extent2::new(64, 64));
    }

    #[test]
    fn one_sentinel_component_is_enough() {
        let caps = SurfaceCapabilities {
            current_extent: Extent2::new(u32::MAX, 600),
            ..capabilities()
        };
        assert_eq!(choose_extent(&caps, Extent2::new(1024, 768)), Extent2::new(1024, 768));
    }

    #[test]
    fn image_count() {
        let bounded = |min, max| SurfaceCapabilities {
            min_image_count: min,
            max_image_count: max,
            ..capabilities()
        };

        assert_eq!(choose_image_count(&bounded(2, 2)), 2);
        assert_eq!(choose_image_count(&bounded(1, 0)), 2);
        assert_eq!(choose_image_count(&bounded(2, 8)), 3);
        assert_eq!(choose_image_count(&bounded(3, 0)), 4);
    }

    #[test]
    fn negotiate_combines_choices() {
        let negotiated = negotiate(
            &support(&[RGBA_SRGB, BGRA_SRGB], &[PresentMode::Fifo, PresentMode::Mailbox]),
            Extent2::new(1024, 768),
            &SwapchainPreferences::default(),
        )
        .unwrap();

        assert_eq!(
            negotiated,
            Negotiated {
                format: BGRA_SRGB,
                present_mode: PresentMode::Mailbox,
                extent: Extent2::new(800, 600),
                image_count: 3,
            }
        );
    }

    #[test]
    fn config_for_shared_family() {
        let families = QueueFamilyIndices {
            graphics: Some(0),
            present: Some(0),
        };
        let config = configure_swapchain(
            &support(&[BGRA_SRGB], &[PresentMode::Fifo]),
            &families,
            Extent2::new(1024, 768),
            &SwapchainPreferences::default(),
        )
        .unwrap();

        assert_eq!(config.sharing, SharingMode::Exclusive);
        assert_eq!(config.pre_transform, SurfaceTransforms::IDENTITY);
        assert_eq!(config.composite_alpha, CompositeAlpha::OPAQUE);
        assert_eq!(config.image_usage, ImageUsage::COLOR_ATTACHMENT);
        assert_eq!(config.present_mode, PresentMode::Fifo);
    }

    #[test]
    fn config_for_split_families() {
        let families = QueueFamilyIndices {
            graphics: Some(2),
            present: Some(0),
        };
        let mut support = support(&[BGRA_SRGB], &[PresentMode::Fifo]);
        support.capabilities.supported_composite_alpha =
            CompositeAlpha::POST_MULTIPLIED | CompositeAlpha::INHERIT;

        let config = configure_swapchain(
            &support,
            &families,
            Extent2::new(1024, 768),
            &SwapchainPreferences::default(),
        )
        .unwrap();

        assert_eq!(config.sharing, SharingMode::Concurrent([2, 0]));
        assert_eq!(config.composite_alpha, CompositeAlpha::POST_MULTIPLIED);
    }

    #[test]
    fn unsupported_usage_is_dropped() {
        let families = QueueFamilyIndices {
            graphics: Some(0),
            present: Some(0),
        };
        let mut support = support(&[BGRA_SRGB], &[PresentMode::Fifo]);
        support.capabilities.supported_usage = ImageUsage::TRANSFER_DST | ImageUsage::STORAGE;

        let preferences = SwapchainPreferences {
            image_usage: ImageUsage::COLOR_ATTACHMENT | ImageUsage::TRANSFER_DST,
            ..SwapchainPreferences::default()
        };
        let config =
            configure_swapchain(&support, &families, Extent2::new(1024, 768), &preferences)
                .unwrap();

        assert_eq!(config.image_usage, ImageUsage::TRANSFER_DST);
    }

    #[test]
    fn config_requires_complete_families() {
        let err = configure_swapchain(
            &support(&[BGRA_SRGB], &[PresentMode::Fifo]),
            &QueueFamilyIndices {
                graphics: Some(0),
                present: None,
            },
            Extent2::new(1024, 768),
            &SwapchainPreferences::default(),
        )
        .unwrap_err();

        assert!(matches!(err, NegotiateError::IncompleteQueueFamilies));
    }

    #[test]
    fn preferences_from_toml() {
        let preferences: SwapchainPreferences = toml::from_str(
            r#"
            present_mode = "Immediate"

            [surface_format]
            format = "Rgba16Float"
            color_space = "ExtendedSrgbLinear"
            "#,
        )
        .unwrap();

        assert_eq!(preferences.present_mode, PresentMode::Immediate);
        assert_eq!(
            preferences.surface_format,
            SurfaceFormat::new(PixelFormat::Rgba16Float, ColorSpace::ExtendedSrgbLinear)
        );
        assert_eq!(preferences.image_usage, ImageUsage::COLOR_ATTACHMENT);
    }
}
