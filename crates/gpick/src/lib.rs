//! Graphics device selection and swapchain negotiation.
//!
//! Scores every enumerated device against a presentation surface,
//! picks the best one and negotiates swapchain parameters for it.
//! Decisions are made in [`negotiate`] against the [`CapabilityQuery`] trait,
//! [`vulkan`] implements it and creates the chosen objects.
#![deny(unsafe_op_in_unsafe_fn)]

pub mod generic;
pub mod negotiate;
mod traits;
pub mod vulkan;

pub use self::{generic::*, negotiate::*, traits::CapabilityQuery};
