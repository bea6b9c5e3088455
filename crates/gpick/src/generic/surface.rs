use std::fmt;

/// Size of a two dimensional image in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Extent2 {
    pub width: u32,
    pub height: u32,
}

impl Extent2 {
    /// Value a surface reports as its current extent when
    /// the swapchain extent determines the surface size.
    pub const UNDEFINED: Self = Extent2 {
        width: u32::MAX,
        height: u32::MAX,
    };

    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Extent2 { width, height }
    }

    /// Returns `true` if this is the "derive from window" sentinel.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        self.width == u32::MAX || self.height == u32::MAX
    }

    /// Clamps each component independently into `[min, max]`.
    ///
    /// When a bound pair is inverted the upper bound wins.
    #[inline]
    pub fn clamp(self, min: Extent2, max: Extent2) -> Self {
        Extent2 {
            width: self.width.max(min.width).min(max.width),
            height: self.height.max(min.height).min(max.height),
        }
    }
}

impl fmt::Display for Extent2 {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel formats a presentation surface may expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    Bgra8Unorm,
    Bgra8Srgb,
    Rgba8Unorm,
    Rgba8Srgb,
    Rgb10a2Unorm,
    Bgr10a2Unorm,
    Rgba16Float,

    /// Format unknown to this crate, as a raw backend value.
    Other(i32),
}

/// Color spaces a presentation surface may expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorSpace {
    SrgbNonlinear,
    ExtendedSrgbLinear,
    DisplayP3Nonlinear,
    Bt709Linear,
    Hdr10St2084,
    PassThrough,

    /// Color space unknown to this crate, as a raw backend value.
    Other(i32),
}

/// Format and color space pair supported by a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceFormat {
    pub format: PixelFormat,
    pub color_space: ColorSpace,
}

impl SurfaceFormat {
    #[inline]
    pub const fn new(format: PixelFormat, color_space: ColorSpace) -> Self {
        SurfaceFormat {
            format,
            color_space,
        }
    }
}

/// Policy that governs when a presented image becomes visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PresentMode {
    /// Images are shown immediately, tearing is possible.
    Immediate,

    /// Single-entry queue where newer images replace pending ones.
    /// Low latency without tearing.
    Mailbox,

    /// Images are shown on vertical blank in submission order.
    /// Every conformant surface supports this mode.
    Fifo,

    /// Like `Fifo`, but late images are shown immediately.
    FifoRelaxed,
}

impl fmt::Display for PresentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentMode::Immediate => f.write_str("immediate"),
            PresentMode::Mailbox => f.write_str("mailbox"),
            PresentMode::Fifo => f.write_str("fifo"),
            PresentMode::FifoRelaxed => f.write_str("fifo-relaxed"),
        }
    }
}

bitflags::bitflags! {
    /// Transforms applied to images before presentation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SurfaceTransforms: u32 {
        const IDENTITY = 0x001;
        const ROTATE_90 = 0x002;
        const ROTATE_180 = 0x004;
        const ROTATE_270 = 0x008;
        const HORIZONTAL_MIRROR = 0x010;
        const HORIZONTAL_MIRROR_ROTATE_90 = 0x020;
        const HORIZONTAL_MIRROR_ROTATE_180 = 0x040;
        const HORIZONTAL_MIRROR_ROTATE_270 = 0x080;
        const INHERIT = 0x100;
    }
}

bitflags::bitflags! {
    /// How alpha of presented images is composited with other surfaces.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CompositeAlpha: u32 {
        const OPAQUE = 0x1;
        const PRE_MULTIPLIED = 0x2;
        const POST_MULTIPLIED = 0x4;
        const INHERIT = 0x8;
    }
}

bitflags::bitflags! {
    /// Ways swapchain images can be used.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct ImageUsage: u32 {
        const TRANSFER_SRC = 0x01;
        const TRANSFER_DST = 0x02;
        const SAMPLED = 0x04;
        const STORAGE = 0x08;
        const COLOR_ATTACHMENT = 0x10;
    }
}

/// Constraints a surface places on swapchains created for it by one device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    pub min_image_count: u32,

    /// Zero means there is no upper limit.
    pub max_image_count: u32,

    /// [`Extent2::UNDEFINED`] when the size comes from the window.
    pub current_extent: Extent2,

    pub min_image_extent: Extent2,
    pub max_image_extent: Extent2,

    /// Exactly one transform bit.
    pub current_transform: SurfaceTransforms,

    pub supported_composite_alpha: CompositeAlpha,
    pub supported_usage: ImageUsage,
}

/// Everything a device/surface pair reports about swapchain support.
///
/// Relative to one device and one surface.
/// Must be probed again after either of them changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapchainSupport {
    pub capabilities: SurfaceCapabilities,

    /// Supported formats, in the order the surface reports them.
    pub formats: Vec<SurfaceFormat>,

    pub present_modes: Vec<PresentMode>,
}

impl SwapchainSupport {
    /// A swapchain can be created only if the surface reports
    /// at least one format and at least one present mode.
    #[inline]
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}
