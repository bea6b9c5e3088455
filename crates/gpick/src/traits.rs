use std::fmt::Debug;

use crate::generic::{
    DeviceFeatures, DeviceProperties, FamilyCapabilities, PresentMode, QueryError,
    SurfaceCapabilities, SurfaceFormat,
};

/// Read-only capability queries against devices and presentation surfaces.
///
/// Implementations retrieve data and make no decisions.
/// Handles are borrowed: the implementation neither creates nor destroys
/// the devices and surfaces it is asked about.
pub trait CapabilityQuery {
    /// Handle to an enumerable device.
    type Device: Copy + Debug;

    /// Handle to a presentation surface.
    type Surface: Copy + Debug;

    /// Enumerate devices in the order the platform reports them.
    fn devices(&self) -> Result<Vec<Self::Device>, QueryError>;

    fn properties(&self, device: Self::Device) -> DeviceProperties;

    /// Optional features the device supports.
    fn features(&self, device: Self::Device) -> DeviceFeatures;

    /// Queue families of the device, indexed by family index.
    fn queue_families(&self, device: Self::Device) -> Vec<FamilyCapabilities>;

    /// Whether queues of `family` can present to `surface`.
    fn supports_present(
        &self,
        device: Self::Device,
        family: u32,
        surface: Self::Surface,
    ) -> Result<bool, QueryError>;

    /// Names of the extensions the device exposes.
    fn extensions(&self, device: Self::Device) -> Result<Vec<String>, QueryError>;

    fn surface_capabilities(
        &self,
        device: Self::Device,
        surface: Self::Surface,
    ) -> Result<SurfaceCapabilities, QueryError>;

    /// Supported surface formats, in the order the surface reports them.
    fn surface_formats(
        &self,
        device: Self::Device,
        surface: Self::Surface,
    ) -> Result<Vec<SurfaceFormat>, QueryError>;

    fn present_modes(
        &self,
        device: Self::Device,
        surface: Self::Surface,
    ) -> Result<Vec<PresentMode>, QueryError>;
}
