//! Errors reported by capability negotiation.

use miette::Diagnostic;
use thiserror::Error;

/// Reason a capability query failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum QueryErrorKind {
    #[error("out of device memory")]
    OutOfDeviceMemory,

    #[error("surface lost")]
    SurfaceLost,

    #[error("initialization failed")]
    InitializationFailed,

    #[error("unexpected result code {0}")]
    Unexpected(i32),
}

/// Error type for failed read-only capability queries.
#[derive(Clone, Copy, Debug, Error, Diagnostic)]
#[error("Capability query `{query}` failed: {kind}")]
#[diagnostic(
    code(gpick::query::failed),
    help("The graphics driver rejected a capability query, startup cannot continue")
)]
pub struct QueryError {
    /// Name of the query that failed.
    pub query: &'static str,
    pub kind: QueryErrorKind,
}

/// Error type for device selection when every device is unsuitable.
#[derive(Clone, Copy, Debug, Error, Diagnostic)]
#[error("No suitable device found among {candidates} enumerated devices")]
#[diagnostic(
    code(gpick::select::no_suitable_device),
    help("A device needs graphics and present queues, the required extensions and features, and at least one surface format and present mode")
)]
pub struct NoSuitableDeviceError {
    /// Number of devices that were enumerated and scored.
    pub candidates: usize,
}

/// Error type for device selection.
#[derive(Clone, Copy, Debug, Error, Diagnostic)]
pub enum SelectError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    NoSuitableDevice(#[from] NoSuitableDeviceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),
}

/// Error type for swapchain negotiation.
#[derive(Clone, Copy, Debug, Error, Diagnostic)]
pub enum NegotiateError {
    #[error("Surface reports no supported formats")]
    #[diagnostic(code(gpick::negotiate::no_surface_formats))]
    NoSurfaceFormats,

    #[error("Queue family indices are incomplete")]
    #[diagnostic(
        code(gpick::negotiate::incomplete_queue_families),
        help("Negotiate only for a device returned by device selection")
    )]
    IncompleteQueueFamilies,
}
