use ash::vk;

use crate::generic::{
    ApiVersion, ColorSpace, CompositeAlpha, DeviceFeatures, DeviceProperties, DeviceType, Extent2,
    FamilyCapabilities, ImageUsage, PixelFormat, PresentMode, QueueFlags, SurfaceCapabilities,
    SurfaceFormat, SurfaceTransforms,
};

macro_rules! from_flags {
    ($from:ty => $to:ty, [$($from_flag:ident),* $(,)?], $flags:expr) => {
        from_flags!($from => $to, [$($from_flag => $from_flag,)*], $flags)
    };
    ($from:ty => $to:ty, [$($from_flag:ident => $to_flag:ident),* $(,)?], $flags:expr) => {{
        let mut dst = <$to>::empty();
        let src = $flags;
        $(
            if src.contains(<$from>::$from_flag) {
                dst |= <$to>::$to_flag;
            }
        )*
        dst
    }};
}

pub trait FromAsh<A> {
    fn from_ash(ash: A) -> Self;
}

pub trait AshInto<T> {
    fn ash_into(self) -> T;
}

impl<T, A> AshInto<T> for A
where
    T: FromAsh<A>,
{
    #[inline(always)]
    fn ash_into(self) -> T {
        T::from_ash(self)
    }
}

/// Conversion from values that may have no counterpart.
pub trait TryFromAsh<A>: Sized {
    fn try_from_ash(ash: A) -> Option<Self>;
}

pub trait TryAshInto<T> {
    fn try_ash_into(self) -> Option<T>;
}

impl<T, A> TryAshInto<T> for A
where
    T: TryFromAsh<A>,
{
    #[inline(always)]
    fn try_ash_into(self) -> Option<T> {
        T::try_from_ash(self)
    }
}

pub trait AshFrom<T> {
    fn ash_from(ash: T) -> Self;
}

pub trait IntoAsh<A> {
    fn into_ash(self) -> A;
}

impl<A, T> IntoAsh<A> for T
where
    A: AshFrom<T>,
{
    #[inline(always)]
    fn into_ash(self) -> A {
        A::ash_from(self)
    }
}

impl FromAsh<vk::QueueFamilyProperties> for FamilyCapabilities {
    #[inline(always)]
    fn from_ash(value: vk::QueueFamilyProperties) -> Self {
        FamilyCapabilities {
            queue_flags: value.queue_flags.ash_into(),
            queue_count: value.queue_count.try_into().unwrap_or(usize::MAX), // Saturate is OK.
        }
    }
}

impl FromAsh<vk::QueueFlags> for QueueFlags {
    #[inline(always)]
    fn from_ash(value: vk::QueueFlags) -> Self {
        from_flags!(
            vk::QueueFlags => QueueFlags,
            [GRAPHICS, COMPUTE, TRANSFER, SPARSE_BINDING],
            value
        )
    }
}

impl FromAsh<vk::PhysicalDeviceType> for DeviceType {
    fn from_ash(value: vk::PhysicalDeviceType) -> Self {
        match value {
            vk::PhysicalDeviceType::DISCRETE_GPU => DeviceType::DiscreteGpu,
            vk::PhysicalDeviceType::INTEGRATED_GPU => DeviceType::IntegratedGpu,
            vk::PhysicalDeviceType::VIRTUAL_GPU => DeviceType::VirtualGpu,
            vk::PhysicalDeviceType::CPU => DeviceType::Cpu,
            _ => DeviceType::Other,
        }
    }
}

impl FromAsh<u32> for ApiVersion {
    #[inline(always)]
    fn from_ash(value: u32) -> Self {
        ApiVersion {
            major: vk::api_version_major(value),
            minor: vk::api_version_minor(value),
            patch: vk::api_version_patch(value),
        }
    }
}

impl FromAsh<vk::PhysicalDeviceProperties> for DeviceProperties {
    fn from_ash(value: vk::PhysicalDeviceProperties) -> Self {
        let name = value
            .device_name_as_c_str()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        DeviceProperties {
            name,
            device_type: value.device_type.ash_into(),
            vendor_id: value.vendor_id,
            device_id: value.device_id,
            api_version: value.api_version.ash_into(),
            max_image_dimension_2d: value.limits.max_image_dimension2_d,
        }
    }
}

macro_rules! feature_fields {
    ($($flag:ident => $field:ident),* $(,)?) => {
        impl FromAsh<vk::PhysicalDeviceFeatures> for DeviceFeatures {
            fn from_ash(value: vk::PhysicalDeviceFeatures) -> Self {
                let mut features = DeviceFeatures::empty();
                $(
                    if value.$field != vk::FALSE {
                        features |= DeviceFeatures::$flag;
                    }
                )*
                features
            }
        }

        impl AshFrom<DeviceFeatures> for vk::PhysicalDeviceFeatures {
            fn ash_from(value: DeviceFeatures) -> Self {
                let mut features = vk::PhysicalDeviceFeatures::default();
                $(
                    features.$field = value.contains(DeviceFeatures::$flag).into();
                )*
                features
            }
        }
    };
}

feature_fields! {
    GEOMETRY_SHADER => geometry_shader,
    TESSELLATION_SHADER => tessellation_shader,
    SAMPLER_ANISOTROPY => sampler_anisotropy,
    FILL_MODE_NON_SOLID => fill_mode_non_solid,
    WIDE_LINES => wide_lines,
    MULTI_VIEWPORT => multi_viewport,
    SHADER_FLOAT64 => shader_float64,
}

impl FromAsh<vk::Extent2D> for Extent2 {
    #[inline(always)]
    fn from_ash(value: vk::Extent2D) -> Self {
        Extent2::new(value.width, value.height)
    }
}

impl AshFrom<Extent2> for vk::Extent2D {
    #[inline(always)]
    fn ash_from(value: Extent2) -> Self {
        vk::Extent2D {
            width: value.width,
            height: value.height,
        }
    }
}

impl FromAsh<vk::Format> for PixelFormat {
    fn from_ash(value: vk::Format) -> Self {
        match value {
            vk::Format::B8G8R8A8_UNORM => PixelFormat::Bgra8Unorm,
            vk::Format::B8G8R8A8_SRGB => PixelFormat::Bgra8Srgb,
            vk::Format::R8G8B8A8_UNORM => PixelFormat::Rgba8Unorm,
            vk::Format::R8G8B8A8_SRGB => PixelFormat::Rgba8Srgb,
            vk::Format::A2B10G10R10_UNORM_PACK32 => PixelFormat::Rgb10a2Unorm,
            vk::Format::A2R10G10B10_UNORM_PACK32 => PixelFormat::Bgr10a2Unorm,
            vk::Format::R16G16B16A16_SFLOAT => PixelFormat::Rgba16Float,
            other => PixelFormat::Other(other.as_raw()),
        }
    }
}

impl AshFrom<PixelFormat> for vk::Format {
    fn ash_from(value: PixelFormat) -> Self {
        match value {
            PixelFormat::Bgra8Unorm => vk::Format::B8G8R8A8_UNORM,
            PixelFormat::Bgra8Srgb => vk::Format::B8G8R8A8_SRGB,
            PixelFormat::Rgba8Unorm => vk::Format::R8G8B8A8_UNORM,
            PixelFormat::Rgba8Srgb => vk::Format::R8G8B8A8_SRGB,
            PixelFormat::Rgb10a2Unorm => vk::Format::A2B10G10R10_UNORM_PACK32,
            PixelFormat::Bgr10a2Unorm => vk::Format::A2R10G10B10_UNORM_PACK32,
            PixelFormat::Rgba16Float => vk::Format::R16G16B16A16_SFLOAT,
            PixelFormat::Other(raw) => vk::Format::from_raw(raw),
        }
    }
}

impl FromAsh<vk::ColorSpaceKHR> for ColorSpace {
    fn from_ash(value: vk::ColorSpaceKHR) -> Self {
        match value {
            vk::ColorSpaceKHR::SRGB_NONLINEAR => ColorSpace::SrgbNonlinear,
            vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT => ColorSpace::ExtendedSrgbLinear,
            vk::ColorSpaceKHR::DISPLAY_P3_NONLINEAR_EXT => ColorSpace::DisplayP3Nonlinear,
            vk::ColorSpaceKHR::BT709_LINEAR_EXT => ColorSpace::Bt709Linear,
            vk::ColorSpaceKHR::HDR10_ST2084_EXT => ColorSpace::Hdr10St2084,
            vk::ColorSpaceKHR::PASS_THROUGH_EXT => ColorSpace::PassThrough,
            other => ColorSpace::Other(other.as_raw()),
        }
    }
}

impl AshFrom<ColorSpace> for vk::ColorSpaceKHR {
    fn ash_from(value: ColorSpace) -> Self {
        match value {
            ColorSpace::SrgbNonlinear => vk::ColorSpaceKHR::SRGB_NONLINEAR,
            ColorSpace::ExtendedSrgbLinear => vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT,
            ColorSpace::DisplayP3Nonlinear => vk::ColorSpaceKHR::DISPLAY_P3_NONLINEAR_EXT,
            ColorSpace::Bt709Linear => vk::ColorSpaceKHR::BT709_LINEAR_EXT,
            ColorSpace::Hdr10St2084 => vk::ColorSpaceKHR::HDR10_ST2084_EXT,
            ColorSpace::PassThrough => vk::ColorSpaceKHR::PASS_THROUGH_EXT,
            ColorSpace::Other(raw) => vk::ColorSpaceKHR::from_raw(raw),
        }
    }
}

impl FromAsh<vk::SurfaceFormatKHR> for SurfaceFormat {
    #[inline(always)]
    fn from_ash(value: vk::SurfaceFormatKHR) -> Self {
        SurfaceFormat::new(value.format.ash_into(), value.color_space.ash_into())
    }
}

impl TryFromAsh<vk::PresentModeKHR> for PresentMode {
    fn try_from_ash(value: vk::PresentModeKHR) -> Option<Self> {
        match value {
            vk::PresentModeKHR::IMMEDIATE => Some(PresentMode::Immediate),
            vk::PresentModeKHR::MAILBOX => Some(PresentMode::Mailbox),
            vk::PresentModeKHR::FIFO => Some(PresentMode::Fifo),
            vk::PresentModeKHR::FIFO_RELAXED => Some(PresentMode::FifoRelaxed),
            _ => None,
        }
    }
}

impl AshFrom<PresentMode> for vk::PresentModeKHR {
    fn ash_from(value: PresentMode) -> Self {
        match value {
            PresentMode::Immediate => vk::PresentModeKHR::IMMEDIATE,
            PresentMode::Mailbox => vk::PresentModeKHR::MAILBOX,
            PresentMode::Fifo => vk::PresentModeKHR::FIFO,
            PresentMode::FifoRelaxed => vk::PresentModeKHR::FIFO_RELAXED,
        }
    }
}

// Transform and composite alpha bits mirror Vulkan's.

impl FromAsh<vk::SurfaceTransformFlagsKHR> for SurfaceTransforms {
    #[inline(always)]
    fn from_ash(value: vk::SurfaceTransformFlagsKHR) -> Self {
        SurfaceTransforms::from_bits_truncate(value.as_raw())
    }
}

impl AshFrom<SurfaceTransforms> for vk::SurfaceTransformFlagsKHR {
    #[inline(always)]
    fn ash_from(value: SurfaceTransforms) -> Self {
        vk::SurfaceTransformFlagsKHR::from_raw(value.bits())
    }
}

impl FromAsh<vk::CompositeAlphaFlagsKHR> for CompositeAlpha {
    #[inline(always)]
    fn from_ash(value: vk::CompositeAlphaFlagsKHR) -> Self {
        CompositeAlpha::from_bits_truncate(value.as_raw())
    }
}

impl AshFrom<CompositeAlpha> for vk::CompositeAlphaFlagsKHR {
    #[inline(always)]
    fn ash_from(value: CompositeAlpha) -> Self {
        vk::CompositeAlphaFlagsKHR::from_raw(value.bits())
    }
}

impl FromAsh<vk::ImageUsageFlags> for ImageUsage {
    #[inline(always)]
    fn from_ash(value: vk::ImageUsageFlags) -> Self {
        from_flags!(vk::ImageUsageFlags => ImageUsage, [
            TRANSFER_SRC,
            TRANSFER_DST,
            SAMPLED,
            STORAGE,
            COLOR_ATTACHMENT,
        ], value)
    }
}

impl AshFrom<ImageUsage> for vk::ImageUsageFlags {
    #[inline(always)]
    fn ash_from(value: ImageUsage) -> Self {
        from_flags!(ImageUsage => vk::ImageUsageFlags, [
            TRANSFER_SRC,
            TRANSFER_DST,
            SAMPLED,
            STORAGE,
            COLOR_ATTACHMENT,
        ], value)
    }
}

impl FromAsh<vk::SurfaceCapabilitiesKHR> for SurfaceCapabilities {
    fn from_ash(value: vk::SurfaceCapabilitiesKHR) -> Self {
        SurfaceCapabilities {
            min_image_count: value.min_image_count,
            max_image_count: value.max_image_count,
            current_extent: value.current_extent.ash_into(),
            min_image_extent: value.min_image_extent.ash_into(),
            max_image_extent: value.max_image_extent.ash_into(),
            current_transform: value.current_transform.ash_into(),
            supported_composite_alpha: value.supported_composite_alpha.ash_into(),
            supported_usage: value.supported_usage_flags.ash_into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_features() {
        let vk_features = vk::PhysicalDeviceFeatures {
            geometry_shader: vk::TRUE,
            wide_lines: vk::TRUE,
            robust_buffer_access: vk::TRUE,
            ..Default::default()
        };

        let features = DeviceFeatures::from_ash(vk_features);
        assert_eq!(features, DeviceFeatures::GEOMETRY_SHADER | DeviceFeatures::WIDE_LINES);

        let back: vk::PhysicalDeviceFeatures = features.into_ash();
        assert_eq!(back.geometry_shader, vk::TRUE);
        assert_eq!(back.wide_lines, vk::TRUE);
        assert_eq!(back.robust_buffer_access, vk::FALSE);
        assert_eq!(back.tessellation_shader, vk::FALSE);
    }

    #[test]
    fn unknown_format_is_preserved() {
        let format = PixelFormat::from_ash(vk::Format::R5G6B5_UNORM_PACK16);
        assert_eq!(format, PixelFormat::Other(vk::Format::R5G6B5_UNORM_PACK16.as_raw()));
        assert_eq!(vk::Format::ash_from(format), vk::Format::R5G6B5_UNORM_PACK16);
    }

    #[test]
    fn sentinel_extent_survives() {
        let caps = SurfaceCapabilities::from_ash(vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            current_transform: vk::SurfaceTransformFlagsKHR::ROTATE_90,
            supported_composite_alpha: vk::CompositeAlphaFlagsKHR::OPAQUE
                | vk::CompositeAlphaFlagsKHR::INHERIT,
            supported_usage_flags: vk::ImageUsageFlags::COLOR_ATTACHMENT
                | vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
            ..Default::default()
        });

        assert!(caps.current_extent.is_undefined());
        assert_eq!(caps.current_transform, SurfaceTransforms::ROTATE_90);
        assert_eq!(
            caps.supported_composite_alpha,
            CompositeAlpha::OPAQUE | CompositeAlpha::INHERIT
        );
        assert_eq!(caps.supported_usage, ImageUsage::COLOR_ATTACHMENT);
    }

    #[test]
    fn shared_present_modes_are_skipped() {
        assert_eq!(
            vk::PresentModeKHR::SHARED_DEMAND_REFRESH.try_ash_into(),
            None::<PresentMode>
        );
        assert_eq!(
            vk::PresentModeKHR::MAILBOX.try_ash_into(),
            Some(PresentMode::Mailbox)
        );
    }
}
