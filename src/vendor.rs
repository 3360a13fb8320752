//! Vendor SDK Boundary
//!
//! [`VendorSdk`] is the seam between the session lifecycle and the
//! proprietary HMD SDK underneath. The runtime only ever performs bounded,
//! synchronous calls through this trait: clock reads, a tracking recenter
//! command, integer configuration reads, and compositor device
//! attach/release. None of these calls are cancellable and none are retried;
//! a failure propagates immediately to the caller as
//! [`MirageError::RuntimeFailure`](crate::MirageError::RuntimeFailure).

use thiserror::Error;

use crate::graphics::{GraphicsApi, NativeHandle};

/// A failed vendor SDK call, identified by the call name and the raw status
/// code the SDK returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{call} returned vendor status {status}")]
pub struct VendorError {
    /// Name of the vendor entry point that failed.
    pub call: &'static str,
    /// Raw status code returned by the SDK.
    pub status: i32,
}

/// The proprietary HMD SDK surface consumed by the session lifecycle.
///
/// Pose tracking and compositor internals stay behind this trait; the
/// lifecycle only needs the handful of calls below.
pub trait VendorSdk {
    /// Reads the monotonic device clock, in seconds.
    ///
    /// Successive reads never go backwards; session state-change timestamps
    /// are stamped from this clock.
    fn time_now(&self) -> f64;

    /// Nominal display frame duration, in milliseconds.
    fn frame_duration_ms(&self) -> f32;

    /// Recenters the tracking origin on the current head pose.
    fn recenter_tracking_origin(&mut self) -> Result<(), VendorError>;

    /// Reads an integer value from the vendor-side configuration, falling
    /// back to `default` when the key is absent.
    fn get_int_config(&self, key: &str, default: i32) -> i32;

    /// Attaches an application-supplied native graphics device to the
    /// vendor compositor.
    fn attach_compositor_device(
        &mut self,
        api: GraphicsApi,
        device: NativeHandle,
    ) -> Result<(), VendorError>;

    /// Releases the compositor device previously attached for `api`.
    ///
    /// Must be callable even when nothing is attached.
    fn release_compositor_device(&mut self, api: GraphicsApi);
}
