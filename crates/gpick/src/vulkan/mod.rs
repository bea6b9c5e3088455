//! Vulkan backend built on `ash`.

use std::{alloc::Layout, ffi::CStr};

use ash::vk;

use crate::generic::{QueryError, QueryErrorKind};

mod device;
mod from;
mod instance;
mod surface;
mod swapchain;

pub use self::{
    device::{Device, DeviceQueue},
    instance::{CreateError, Instance, LoadError, Validation},
    surface::Surface,
    swapchain::Swapchain,
};

pub use ash::vk::{PhysicalDevice, SurfaceKHR};

/// Name of the Khronos validation layer.
pub const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

#[track_caller]
fn handle_host_oom() -> ! {
    std::alloc::handle_alloc_error(Layout::new::<()>())
}

#[track_caller]
fn query_error(query: &'static str, err: vk::Result) -> QueryError {
    let kind = match err {
        vk::Result::ERROR_OUT_OF_HOST_MEMORY => handle_host_oom(),
        vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => QueryErrorKind::OutOfDeviceMemory,
        vk::Result::ERROR_SURFACE_LOST_KHR => QueryErrorKind::SurfaceLost,
        vk::Result::ERROR_INITIALIZATION_FAILED => QueryErrorKind::InitializationFailed,
        err => QueryErrorKind::Unexpected(err.as_raw()),
    };
    QueryError { query, kind }
}

#[track_caller]
fn create_error(err: vk::Result) -> CreateError {
    match err {
        vk::Result::ERROR_OUT_OF_HOST_MEMORY => handle_host_oom(),
        vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => CreateError::OutOfMemory,
        vk::Result::ERROR_INITIALIZATION_FAILED => CreateError::InitializationFailed,
        vk::Result::ERROR_TOO_MANY_OBJECTS => CreateError::TooManyObjects,
        vk::Result::ERROR_DEVICE_LOST => CreateError::DeviceLost,
        vk::Result::ERROR_SURFACE_LOST_KHR => CreateError::SurfaceLost,
        vk::Result::ERROR_NATIVE_WINDOW_IN_USE_KHR => CreateError::NativeWindowInUse,
        vk::Result::ERROR_EXTENSION_NOT_PRESENT => CreateError::ExtensionNotPresent,
        vk::Result::ERROR_FEATURE_NOT_PRESENT => CreateError::FeatureNotPresent,
        err => CreateError::Unexpected(err.as_raw()),
    }
}
