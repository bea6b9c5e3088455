//! Backend-agnostic device selection and swapchain negotiation.
//!
//! Everything here works through [`CapabilityQuery`](crate::CapabilityQuery)
//! and never touches the graphics API directly.

mod extension;
mod probe;
mod queue;
mod score;
mod select;
mod swapchain;

#[cfg(test)]
mod mock;

pub use self::{
    extension::{missing_extensions, supports_required, SWAPCHAIN_EXTENSION},
    probe::probe_swapchain_support,
    queue::resolve_queue_families,
    score::{evaluate, score, Evaluation, Rejection, Requirements, DISCRETE_BONUS},
    select::{rank_devices, select_device, Candidate, Selection},
    swapchain::{
        choose_extent, choose_image_count, choose_present_mode, choose_surface_format,
        configure_swapchain, negotiate, Negotiated, SwapchainConfig, SwapchainPreferences,
    },
};
