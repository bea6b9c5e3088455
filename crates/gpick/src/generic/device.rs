use std::fmt;

/// Classification a device reports about itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DeviceType {
    /// Dedicated processing unit.
    DiscreteGpu,
    /// Processing unit embedded in or tightly coupled with the host.
    IntegratedGpu,
    /// Virtual node in a virtualization environment.
    VirtualGpu,
    /// Device running on the host processors.
    Cpu,
    Other,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::DiscreteGpu => f.write_str("discrete"),
            DeviceType::IntegratedGpu => f.write_str("integrated"),
            DeviceType::VirtualGpu => f.write_str("virtual"),
            DeviceType::Cpu => f.write_str("cpu"),
            DeviceType::Other => f.write_str("other"),
        }
    }
}

/// Version of the API supported by a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for ApiVersion {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Properties of a device relevant to selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceProperties {
    /// Human readable device name.
    pub name: String,

    pub device_type: DeviceType,

    pub vendor_id: u32,
    pub device_id: u32,

    pub api_version: ApiVersion,

    /// Largest supported width and height of a 2D image.
    pub max_image_dimension_2d: u32,
}

bitflags::bitflags! {
    /// Optional device features that can be required from a device.
    ///
    /// Serialized as a `|`-separated list of flag names in human readable formats.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct DeviceFeatures: u32 {
        /// Geometry shader stage.
        const GEOMETRY_SHADER = 0x0001;

        /// Tessellation control and evaluation shader stages.
        const TESSELLATION_SHADER = 0x0002;

        /// Anisotropic filtering in samplers.
        const SAMPLER_ANISOTROPY = 0x0004;

        /// Point and wireframe fill modes.
        const FILL_MODE_NON_SOLID = 0x0008;

        /// Lines wider than 1.0.
        const WIDE_LINES = 0x0010;

        /// More than one viewport.
        const MULTI_VIEWPORT = 0x0020;

        /// 64-bit floats in shader code.
        const SHADER_FLOAT64 = 0x0040;
    }
}

/// Ordinal suitability of a device for one surface.
///
/// Zero or negative means the device is unsuitable.
/// Higher is better.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceScore(pub i64);

impl DeviceScore {
    /// Score of a device that failed a suitability gate.
    pub const UNSUITABLE: Self = DeviceScore(0);

    #[inline]
    pub fn get(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_suitable(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for DeviceScore {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
