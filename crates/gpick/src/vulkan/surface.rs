use ash::vk;

/// Presentation surface of a window.
///
/// Must be dropped before the instance it was created from.
pub struct Surface {
    loader: ash::khr::surface::Instance,
    handle: vk::SurfaceKHR,
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_surface(self.handle, None);
        }
    }
}

impl Surface {
    pub(super) fn new(loader: ash::khr::surface::Instance, handle: vk::SurfaceKHR) -> Self {
        Surface { loader, handle }
    }

    /// Raw handle for capability queries.
    #[inline]
    pub fn handle(&self) -> vk::SurfaceKHR {
        self.handle
    }
}
