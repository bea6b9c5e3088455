use ash::vk;

use crate::{
    generic::{Extent2, SharingMode},
    negotiate::SwapchainConfig,
};

use super::{create_error, from::IntoAsh, surface::Surface, CreateError};

/// Swapchain created from a negotiated configuration.
///
/// Must be dropped before the device and surface it was created for.
pub struct Swapchain {
    loader: ash::khr::swapchain::Device,
    handle: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    config: SwapchainConfig,
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_swapchain(self.handle, None);
        }
    }
}

impl Swapchain {
    pub(super) fn new(
        loader: &ash::khr::swapchain::Device,
        surface: &Surface,
        config: &SwapchainConfig,
        old: Option<&Swapchain>,
    ) -> Result<Self, CreateError> {
        let (sharing_mode, families): (_, &[u32]) = match &config.sharing {
            SharingMode::Exclusive => (vk::SharingMode::EXCLUSIVE, &[]),
            SharingMode::Concurrent(families) => (vk::SharingMode::CONCURRENT, families),
        };

        let info = vk::SwapchainCreateInfoKHR::default()
            .surface(surface.handle())
            .min_image_count(config.image_count)
            .image_format(config.format.format.into_ash())
            .image_color_space(config.format.color_space.into_ash())
            .image_extent(config.extent.into_ash())
            .image_array_layers(1)
            .image_usage(config.image_usage.into_ash())
            .image_sharing_mode(sharing_mode)
            .queue_family_indices(families)
            .pre_transform(config.pre_transform.into_ash())
            .composite_alpha(config.composite_alpha.into_ash())
            .present_mode(config.present_mode.into_ash())
            .clipped(true)
            .old_swapchain(old.map_or(vk::SwapchainKHR::null(), |old| old.handle));

        let handle = unsafe { loader.create_swapchain(&info, None) }.map_err(create_error)?;

        let images = match unsafe { loader.get_swapchain_images(handle) } {
            Ok(images) => images,
            Err(err) => {
                unsafe { loader.destroy_swapchain(handle, None) };
                return Err(create_error(err));
            }
        };

        tracing::info!(
            images = images.len(),
            extent = %config.extent,
            present_mode = %config.present_mode,
            recreated = old.is_some(),
            "Swapchain created"
        );

        Ok(Swapchain {
            loader: loader.clone(),
            handle,
            images,
            config: *config,
        })
    }

    /// Images owned by the swapchain.
    /// May be more than the requested image count.
    #[inline]
    pub fn images(&self) -> &[vk::Image] {
        &self.images
    }

    #[inline]
    pub fn config(&self) -> &SwapchainConfig {
        &self.config
    }

    #[inline]
    pub fn extent(&self) -> Extent2 {
        self.config.extent
    }
}
