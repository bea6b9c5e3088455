//! In-memory capability query for tests.

use crate::{
    generic::{
        ApiVersion, ColorSpace, CompositeAlpha, DeviceFeatures, DeviceProperties, DeviceType,
        Extent2, FamilyCapabilities, ImageUsage, PixelFormat, PresentMode, QueryError,
        QueryErrorKind, QueueFlags, SurfaceCapabilities, SurfaceFormat, SurfaceTransforms,
    },
    CapabilityQuery,
};

use super::SWAPCHAIN_EXTENSION;

#[derive(Clone, Debug)]
pub(crate) struct MockFamily {
    pub flags: QueueFlags,
    pub present: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct MockDevice {
    pub properties: DeviceProperties,
    pub features: DeviceFeatures,
    pub families: Vec<MockFamily>,
    pub extensions: Vec<String>,
    pub capabilities: SurfaceCapabilities,
    pub formats: Vec<SurfaceFormat>,
    pub present_modes: Vec<PresentMode>,

    /// Makes the surface support query fail.
    pub lost_surface: bool,
}

pub(crate) fn capabilities() -> SurfaceCapabilities {
    SurfaceCapabilities {
        min_image_count: 2,
        max_image_count: 8,
        current_extent: Extent2::new(800, 600),
        min_image_extent: Extent2::new(1, 1),
        max_image_extent: Extent2::new(4096, 4096),
        current_transform: SurfaceTransforms::IDENTITY,
        supported_composite_alpha: CompositeAlpha::OPAQUE,
        supported_usage: ImageUsage::COLOR_ATTACHMENT | ImageUsage::TRANSFER_DST,
    }
}

impl MockDevice {
    /// Device that passes every suitability gate with default requirements.
    pub fn suitable(name: &str) -> Self {
        MockDevice {
            properties: DeviceProperties {
                name: name.to_owned(),
                device_type: DeviceType::IntegratedGpu,
                vendor_id: 0x1002,
                device_id: 0x1,
                api_version: ApiVersion {
                    major: 1,
                    minor: 3,
                    patch: 0,
                },
                max_image_dimension_2d: 8192,
            },
            features: DeviceFeatures::GEOMETRY_SHADER | DeviceFeatures::SAMPLER_ANISOTROPY,
            families: vec![MockFamily {
                flags: QueueFlags::GRAPHICS | QueueFlags::COMPUTE | QueueFlags::TRANSFER,
                present: true,
            }],
            extensions: vec![
                SWAPCHAIN_EXTENSION.to_owned(),
                "VK_KHR_maintenance1".to_owned(),
            ],
            capabilities: capabilities(),
            formats: vec![SurfaceFormat::new(
                PixelFormat::Bgra8Srgb,
                ColorSpace::SrgbNonlinear,
            )],
            present_modes: vec![PresentMode::Fifo],
            lost_surface: false,
        }
    }

    pub fn with_type(mut self, device_type: DeviceType) -> Self {
        self.properties.device_type = device_type;
        self
    }

    pub fn with_max_dimension(mut self, dimension: u32) -> Self {
        self.properties.max_image_dimension_2d = dimension;
        self
    }

    pub fn with_features(mut self, features: DeviceFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn with_families(mut self, families: &[(QueueFlags, bool)]) -> Self {
        self.families = families
            .iter()
            .map(|&(flags, present)| MockFamily { flags, present })
            .collect();
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|&name| name.to_owned()).collect();
        self
    }

    pub fn with_formats(mut self, formats: &[SurfaceFormat]) -> Self {
        self.formats = formats.to_vec();
        self
    }

    pub fn with_present_modes(mut self, modes: &[PresentMode]) -> Self {
        self.present_modes = modes.to_vec();
        self
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct MockQuery {
    pub devices: Vec<MockDevice>,
}

impl MockQuery {
    pub fn new(devices: impl IntoIterator<Item = MockDevice>) -> Self {
        MockQuery {
            devices: devices.into_iter().collect(),
        }
    }
}

impl CapabilityQuery for MockQuery {
    type Device = usize;
    type Surface = ();

    fn devices(&self) -> Result<Vec<usize>, QueryError> {
        Ok((0..self.devices.len()).collect())
    }

    fn properties(&self, device: usize) -> DeviceProperties {
        self.devices[device].properties.clone()
    }

    fn features(&self, device: usize) -> DeviceFeatures {
        self.devices[device].features
    }

    fn queue_families(&self, device: usize) -> Vec<FamilyCapabilities> {
        self.devices[device]
            .families
            .iter()
            .map(|family| FamilyCapabilities {
                queue_flags: family.flags,
                queue_count: 1,
            })
            .collect()
    }

    fn supports_present(&self, device: usize, family: u32, _: ()) -> Result<bool, QueryError> {
        let device = &self.devices[device];
        if device.lost_surface {
            return Err(QueryError {
                query: "supports_present",
                kind: QueryErrorKind::SurfaceLost,
            });
        }
        Ok(device.families[family as usize].present)
    }

    fn extensions(&self, device: usize) -> Result<Vec<String>, QueryError> {
        Ok(self.devices[device].extensions.clone())
    }

    fn surface_capabilities(
        &self,
        device: usize,
        _: (),
    ) -> Result<SurfaceCapabilities, QueryError> {
        Ok(self.devices[device].capabilities)
    }

    fn surface_formats(&self, device: usize, _: ()) -> Result<Vec<SurfaceFormat>, QueryError> {
        Ok(self.devices[device].formats.clone())
    }

    fn present_modes(&self, device: usize, _: ()) -> Result<Vec<PresentMode>, QueryError> {
        Ok(self.devices[device].present_modes.clone())
    }
}
