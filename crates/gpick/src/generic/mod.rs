mod device;
mod error;
mod queue;
mod surface;

pub use self::{
    device::{ApiVersion, DeviceFeatures, DeviceProperties, DeviceScore, DeviceType},
    error::{NegotiateError, NoSuitableDeviceError, QueryError, QueryErrorKind, SelectError},
    queue::{FamilyCapabilities, QueueFamilyIndices, QueueFlags, SharingMode},
    surface::{
        ColorSpace, CompositeAlpha, Extent2, ImageUsage, PixelFormat, PresentMode,
        SurfaceCapabilities, SurfaceFormat, SurfaceTransforms, SwapchainSupport,
    },
};
