use std::{
    borrow::Cow,
    ffi::{c_char, c_void, CStr, CString, NulError},
};

use ash::vk;
use miette::Diagnostic;
use raw_window_handle::{HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle};
use thiserror::Error;

use crate::{
    generic::{
        ApiVersion, DeviceFeatures, DeviceProperties, FamilyCapabilities, PresentMode,
        QueryError, SurfaceCapabilities, SurfaceFormat,
    },
    negotiate::{Requirements, Selection},
    CapabilityQuery,
};

use super::{
    create_error, device::Device, from::*, handle_host_oom, query_error, surface::Surface,
    VALIDATION_LAYER,
};

/// Portability implementations require this extension to be enabled
/// whenever the device exposes it.
const PORTABILITY_SUBSET: &CStr = c"VK_KHR_portability_subset";

/// Error type for instance loading.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Failed to load Vulkan entry points")]
    #[diagnostic(
        code(gpick::vulkan::loading),
        help("Make sure a Vulkan loader and driver are installed")
    )]
    Loading(#[from] ash::LoadingError),

    #[error("Validation layer was requested but is not available")]
    #[diagnostic(
        code(gpick::vulkan::missing_validation_layer),
        help("Install the Vulkan SDK or disable validation")
    )]
    MissingValidationLayer,

    #[error("Windowing system has no Vulkan surface support")]
    #[diagnostic(code(gpick::vulkan::unsupported_display))]
    UnsupportedDisplay,

    #[error("Instance extension `{0}` is not available")]
    #[diagnostic(
        code(gpick::vulkan::missing_instance_extension),
        help("The installed Vulkan driver cannot present to this windowing system")
    )]
    MissingExtension(String),

    #[error("Out of device memory")]
    #[diagnostic(code(gpick::vulkan::out_of_memory))]
    OutOfMemory,

    #[error("Vulkan instance initialization failed")]
    #[diagnostic(code(gpick::vulkan::initialization_failed))]
    InitializationFailed,

    #[error("Vulkan driver is incompatible")]
    #[diagnostic(code(gpick::vulkan::incompatible_driver))]
    IncompatibleDriver,

    #[error("Unexpected Vulkan result code {0}")]
    #[diagnostic(code(gpick::vulkan::unexpected))]
    Unexpected(i32),
}

/// Whether to enable the Khronos validation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validation {
    Disabled,

    /// Enabled when installed, otherwise a warning is logged.
    IfAvailable,

    /// Loading fails when the layer is not installed.
    Required,
}

/// Error type for creation of surfaces, devices and swapchains.
#[derive(Debug, Error, Diagnostic)]
pub enum CreateError {
    #[error("Out of device memory")]
    #[diagnostic(code(gpick::vulkan::out_of_memory))]
    OutOfMemory,

    #[error("Object initialization failed")]
    #[diagnostic(code(gpick::vulkan::initialization_failed))]
    InitializationFailed,

    #[error("Too many objects")]
    #[diagnostic(code(gpick::vulkan::too_many_objects))]
    TooManyObjects,

    #[error("Device lost")]
    #[diagnostic(code(gpick::vulkan::device_lost))]
    DeviceLost,

    #[error("Surface lost")]
    #[diagnostic(code(gpick::vulkan::surface_lost))]
    SurfaceLost,

    #[error("Native window is already in use")]
    #[diagnostic(code(gpick::vulkan::native_window_in_use))]
    NativeWindowInUse,

    #[error("Requested device extension is not present")]
    #[diagnostic(
        code(gpick::vulkan::extension_not_present),
        help("Create devices only from a selection made with the same requirements")
    )]
    ExtensionNotPresent,

    #[error("Requested device feature is not present")]
    #[diagnostic(
        code(gpick::vulkan::feature_not_present),
        help("Create devices only from a selection made with the same requirements")
    )]
    FeatureNotPresent,

    #[error("Selected device has incomplete queue families")]
    #[diagnostic(code(gpick::vulkan::incomplete_queue_families))]
    IncompleteQueueFamilies,

    #[error("Extension name contains a nul byte: {0}")]
    #[diagnostic(code(gpick::vulkan::invalid_extension_name))]
    InvalidExtensionName(#[from] NulError),

    #[error("Window handle is unavailable")]
    #[diagnostic(code(gpick::vulkan::window_handle))]
    WindowHandle(#[from] HandleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error("Unexpected Vulkan result code {0}")]
    #[diagnostic(code(gpick::vulkan::unexpected))]
    Unexpected(i32),
}

#[track_caller]
fn load_error(err: vk::Result) -> LoadError {
    match err {
        vk::Result::ERROR_OUT_OF_HOST_MEMORY => handle_host_oom(),
        vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => LoadError::OutOfMemory,
        vk::Result::ERROR_INITIALIZATION_FAILED => LoadError::InitializationFailed,
        vk::Result::ERROR_INCOMPATIBLE_DRIVER => LoadError::IncompatibleDriver,
        err => LoadError::Unexpected(err.as_raw()),
    }
}

fn has_layer(layers: &[vk::LayerProperties], name: &CStr) -> bool {
    layers
        .iter()
        .any(|layer| layer.layer_name_as_c_str().map_or(false, |n| n == name))
}

/// Decides whether the validation layer gets enabled.
fn enable_validation(
    layers: &[vk::LayerProperties],
    validation: Validation,
) -> Result<bool, LoadError> {
    match validation {
        Validation::Disabled => Ok(false),
        _ if has_layer(layers, VALIDATION_LAYER) => Ok(true),
        Validation::Required => Err(LoadError::MissingValidationLayer),
        Validation::IfAvailable => {
            tracing::warn!("Validation layer is not available");
            Ok(false)
        }
    }
}

fn has_extension(extensions: &[vk::ExtensionProperties], name: &CStr) -> bool {
    extensions
        .iter()
        .any(|extension| extension.extension_name_as_c_str().map_or(false, |n| n == name))
}

fn crate_version() -> u32 {
    let major = env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0);
    let minor = env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0);
    let patch = env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0);
    vk::make_api_version(0, major, minor, patch)
}

/// Loaded Vulkan instance.
///
/// Implements [`CapabilityQuery`] for its physical devices and for surfaces
/// created from it.
pub struct Instance {
    entry: ash::Entry,
    instance: ash::Instance,
    version: ApiVersion,
    surface: ash::khr::surface::Instance,
    debug_utils: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
}

impl Drop for Instance {
    fn drop(&mut self) {
        unsafe {
            if let Some((debug_utils, messenger)) = self.debug_utils.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}

impl Instance {
    /// Loads Vulkan and creates an instance able to present to `display`.
    ///
    /// Unless `validation` is disabled, the debug messenger is enabled when available.
    pub fn load(display: RawDisplayHandle, validation: Validation) -> Result<Self, LoadError> {
        // Load the Vulkan entry points.

        let entry = unsafe { ash::Entry::load() }?;

        // Collect instance layers and extensions.

        let layers = unsafe { entry.enumerate_instance_layer_properties() }.map_err(load_error)?;
        let extensions =
            unsafe { entry.enumerate_instance_extension_properties(None) }.map_err(load_error)?;

        // Enable layers and instance extensions.

        let mut enabled_layer_names: Vec<*const c_char> = Vec::new();

        let mut enabled_extension_names = ash_window::enumerate_required_extensions(display)
            .map_err(|err| match err {
                vk::Result::ERROR_EXTENSION_NOT_PRESENT => LoadError::UnsupportedDisplay,
                err => load_error(err),
            })?
            .to_vec();

        for &name in &enabled_extension_names {
            let name = unsafe { CStr::from_ptr(name) };
            if !has_extension(&extensions, name) {
                return Err(LoadError::MissingExtension(
                    name.to_string_lossy().into_owned(),
                ));
            }
        }

        let mut debug_utils = false;

        if enable_validation(&layers, validation)? {
            enabled_layer_names.push(VALIDATION_LAYER.as_ptr());
        }

        if validation != Validation::Disabled {
            if has_extension(&extensions, ash::ext::debug_utils::NAME) {
                enabled_extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
                debug_utils = true;
            } else {
                tracing::warn!("Debug utils extension is not available");
            }
        }

        let mut flags = vk::InstanceCreateFlags::empty();

        if has_extension(&extensions, ash::khr::portability_enumeration::NAME) {
            enabled_extension_names.push(ash::khr::portability_enumeration::NAME.as_ptr());
            flags |= vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR;
        }

        // Choose latest Vulkan version.

        let api_version = unsafe { entry.try_enumerate_instance_version() }
            .map_err(load_error)?
            .unwrap_or(vk::API_VERSION_1_0);

        let version = ApiVersion::from_ash(api_version);

        // Create the Vulkan instance.

        let application_info = vk::ApplicationInfo::default()
            .application_name(c"gpick")
            .application_version(crate_version())
            .engine_name(c"gpick")
            .engine_version(crate_version())
            .api_version(api_version);

        let mut debug_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                    | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                    | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(vulkan_debug_callback));

        let mut info = vk::InstanceCreateInfo::default()
            .flags(flags)
            .application_info(&application_info)
            .enabled_layer_names(&enabled_layer_names)
            .enabled_extension_names(&enabled_extension_names);

        // Also covers instance creation and destruction.
        if debug_utils {
            info = info.push_next(&mut debug_info);
        }

        let instance = unsafe { entry.create_instance(&info, None) }.map_err(load_error)?;

        tracing::info!(
            %version,
            validation = !enabled_layer_names.is_empty(),
            "Vulkan instance created"
        );

        // Init debug messenger.

        let debug_utils = if debug_utils {
            let debug_utils = ash::ext::debug_utils::Instance::new(&entry, &instance);
            match unsafe { debug_utils.create_debug_utils_messenger(&debug_info, None) } {
                Ok(messenger) => Some((debug_utils, messenger)),
                Err(err) => {
                    tracing::warn!(?err, "Failed to create debug messenger");
                    None
                }
            }
        } else {
            None
        };

        let surface = ash::khr::surface::Instance::new(&entry, &instance);

        Ok(Instance {
            entry,
            instance,
            version,
            surface,
            debug_utils,
        })
    }

    /// Version of the Vulkan API supported by the loader.
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// Creates a presentation surface for the window.
    ///
    /// # Safety
    ///
    /// The window must outlive the returned surface.
    pub unsafe fn create_surface(
        &self,
        window: &(impl HasDisplayHandle + HasWindowHandle + ?Sized),
    ) -> Result<Surface, CreateError> {
        let display = window.display_handle()?.as_raw();
        let window = window.window_handle()?.as_raw();

        let result = unsafe {
            ash_window::create_surface(&self.entry, &self.instance, display, window, None)
        };
        let handle = result.map_err(create_error)?;

        Ok(Surface::new(self.surface.clone(), handle))
    }

    /// Creates a logical device for the selected physical device.
    ///
    /// One queue is created per distinct family of the selection.
    /// Required extensions and features are enabled.
    pub fn create_device(
        &self,
        selection: &Selection<vk::PhysicalDevice>,
        requirements: &Requirements,
    ) -> Result<Device, CreateError> {
        let (graphics, present) = selection
            .queue_families
            .complete()
            .ok_or(CreateError::IncompleteQueueFamilies)?;

        let priorities = [1.0f32];
        let queue_create_infos = selection
            .queue_families
            .unique()
            .into_iter()
            .map(|family| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(family)
                    .queue_priorities(&priorities)
            })
            .collect::<Vec<_>>();

        let extension_names = requirements
            .extensions
            .iter()
            .map(|name| CString::new(name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut enabled_extension_names = extension_names
            .iter()
            .map(|name| name.as_ptr())
            .collect::<Vec<_>>();

        let available = self.extensions(selection.device)?;
        let portability_subset = PORTABILITY_SUBSET.to_string_lossy();
        if available.iter().any(|name| *name == portability_subset)
            && !requirements.extensions.iter().any(|name| *name == portability_subset)
        {
            enabled_extension_names.push(PORTABILITY_SUBSET.as_ptr());
        }

        let features: vk::PhysicalDeviceFeatures = requirements.features.into_ash();

        let info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&enabled_extension_names)
            .enabled_features(&features);

        let result = unsafe { self.instance.create_device(selection.device, &info, None) };
        let device = result.map_err(create_error)?;

        tracing::info!(
            device = %selection.properties.name,
            graphics,
            present,
            extensions = enabled_extension_names.len(),
            "Logical device created"
        );

        Ok(Device::new(&self.instance, device, graphics, present))
    }
}

impl CapabilityQuery for Instance {
    type Device = vk::PhysicalDevice;
    type Surface = vk::SurfaceKHR;

    fn devices(&self) -> Result<Vec<vk::PhysicalDevice>, QueryError> {
        unsafe { self.instance.enumerate_physical_devices() }
            .map_err(|err| query_error("enumerate_physical_devices", err))
    }

    fn properties(&self, device: vk::PhysicalDevice) -> DeviceProperties {
        unsafe { self.instance.get_physical_device_properties(device) }.ash_into()
    }

    fn features(&self, device: vk::PhysicalDevice) -> DeviceFeatures {
        unsafe { self.instance.get_physical_device_features(device) }.ash_into()
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<FamilyCapabilities> {
        unsafe { self.instance.get_physical_device_queue_family_properties(device) }
            .into_iter()
            .map(FamilyCapabilities::from_ash)
            .collect()
    }

    fn supports_present(
        &self,
        device: vk::PhysicalDevice,
        family: u32,
        surface: vk::SurfaceKHR,
    ) -> Result<bool, QueryError> {
        unsafe {
            self.surface
                .get_physical_device_surface_support(device, family, surface)
        }
        .map_err(|err| query_error("get_physical_device_surface_support", err))
    }

    fn extensions(&self, device: vk::PhysicalDevice) -> Result<Vec<String>, QueryError> {
        let extensions = unsafe { self.instance.enumerate_device_extension_properties(device) }
            .map_err(|err| query_error("enumerate_device_extension_properties", err))?;

        Ok(extensions
            .iter()
            .filter_map(|extension| extension.extension_name_as_c_str().ok())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn surface_capabilities(
        &self,
        device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<SurfaceCapabilities, QueryError> {
        let caps = unsafe {
            self.surface
                .get_physical_device_surface_capabilities(device, surface)
        }
        .map_err(|err| query_error("get_physical_device_surface_capabilities", err))?;

        Ok(caps.ash_into())
    }

    fn surface_formats(
        &self,
        device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<Vec<SurfaceFormat>, QueryError> {
        let formats = unsafe {
            self.surface
                .get_physical_device_surface_formats(device, surface)
        }
        .map_err(|err| query_error("get_physical_device_surface_formats", err))?;

        Ok(formats.into_iter().map(SurfaceFormat::from_ash).collect())
    }

    fn present_modes(
        &self,
        device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<Vec<PresentMode>, QueryError> {
        let modes = unsafe {
            self.surface
                .get_physical_device_surface_present_modes(device, surface)
        }
        .map_err(|err| query_error("get_physical_device_surface_present_modes", err))?;

        Ok(modes.into_iter().filter_map(TryAshInto::try_ash_into).collect())
    }
}

unsafe fn lossy<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        Cow::Borrowed("")
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
    }
}

unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_types: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _p_user_data: *mut c_void,
) -> vk::Bool32 {
    unsafe { vulkan_debug_callback_impl(message_severity, message_types, p_callback_data) }
    vk::FALSE
}

unsafe fn vulkan_debug_callback_impl(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_types: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
) {
    if p_callback_data.is_null() {
        return;
    }

    let callback_data = unsafe { &*p_callback_data };

    let message_id_name = unsafe { lossy(callback_data.p_message_id_name) };
    let message_id_number = callback_data.message_id_number;
    let message = unsafe { lossy(callback_data.p_message) };

    match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => tracing::error!(
            target: "vulkan",
            %message_id_name,
            message_id_number,
            kind = ?message_types,
            "{message}"
        ),
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => tracing::warn!(
            target: "vulkan",
            %message_id_name,
            message_id_number,
            kind = ?message_types,
            "{message}"
        ),
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => tracing::debug!(
            target: "vulkan",
            %message_id_name,
            message_id_number,
            kind = ?message_types,
            "{message}"
        ),
        _ => tracing::trace!(
            target: "vulkan",
            %message_id_name,
            message_id_number,
            kind = ?message_types,
            "{message}"
        ),
    }
}
