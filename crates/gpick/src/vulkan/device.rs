use ash::vk;

use crate::negotiate::SwapchainConfig;

use super::{create_error, surface::Surface, swapchain::Swapchain, CreateError};

/// Queue retrieved from a created device.
#[derive(Clone, Copy, Debug)]
pub struct DeviceQueue {
    pub family: u32,
    pub queue: vk::Queue,
}

/// Logical device with its graphics and present queues.
///
/// Must be dropped after every swapchain created from it
/// and before the instance.
pub struct Device {
    device: ash::Device,
    graphics: DeviceQueue,
    present: DeviceQueue,
    swapchain: ash::khr::swapchain::Device,
}

impl Drop for Device {
    fn drop(&mut self) {
        unsafe {
            if let Err(err) = self.device.device_wait_idle() {
                tracing::warn!(?err, "Failed to wait for device idle before destruction");
            }
            self.device.destroy_device(None);
        }
    }
}

impl Device {
    pub(super) fn new(
        instance: &ash::Instance,
        device: ash::Device,
        graphics_family: u32,
        present_family: u32,
    ) -> Self {
        // Queue index 0 of each family was requested.
        let graphics = DeviceQueue {
            family: graphics_family,
            queue: unsafe { device.get_device_queue(graphics_family, 0) },
        };
        let present = DeviceQueue {
            family: present_family,
            queue: unsafe { device.get_device_queue(present_family, 0) },
        };

        let swapchain = ash::khr::swapchain::Device::new(instance, &device);

        Device {
            device,
            graphics,
            present,
            swapchain,
        }
    }

    #[inline]
    pub fn graphics_queue(&self) -> DeviceQueue {
        self.graphics
    }

    #[inline]
    pub fn present_queue(&self) -> DeviceQueue {
        self.present
    }

    /// Blocks until the device has no pending work.
    pub fn wait_idle(&self) -> Result<(), CreateError> {
        unsafe { self.device.device_wait_idle() }.map_err(create_error)
    }

    /// Creates a swapchain for `surface`.
    ///
    /// When `old` is given it is retired in favor of the new swapchain,
    /// the caller destroys it by dropping after this call returns.
    pub fn create_swapchain(
        &self,
        surface: &Surface,
        config: &SwapchainConfig,
        old: Option<&Swapchain>,
    ) -> Result<Swapchain, CreateError> {
        Swapchain::new(&self.swapchain, surface, config, old)
    }
}
