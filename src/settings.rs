//! Runtime Settings Derivation
//!
//! [`RuntimeSettings`] holds the tunable parameters derived from the
//! external configuration store once per session creation. Derivation never
//! fails: a missing or out-of-range value falls back to its documented
//! default.
//!
//! | Setting key                     | Meaning                                   | Default |
//! |---------------------------------|-------------------------------------------|---------|
//! | `joystick_deadzone`             | deadzone in hundredths of full deflection | 2       |
//! | `swap_grip_aim_poses`           | swap grip and aim controller poses        | 0       |
//! | `force_interaction_profile`     | 0 none, 1 Oculus Touch, 2 MS Motion       | 0       |
//! | `frame_time_override_offset`    | GPU frame-time offset, microseconds       | 0       |
//! | `frame_time_override_multiplier`| percentage of nominal frame duration      | 0       |
//! | `frame_time_filter_length`      | smoothing filter window, frames           | 5       |
//!
//! Parallel projection is derived from the vendor-side
//! `steamvr_use_native_fov` configuration (native FOV off means parallel
//! projection on).

use crate::config::ConfigStore;
use crate::vendor::VendorSdk;

/// An interaction profile the runtime can be forced to report regardless of
/// the physical controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedInteractionProfile {
    OculusTouch,
    MicrosoftMotion,
}

/// Tunable parameters in effect for the current session.
///
/// Recomputed by [`RuntimeSettings::refresh`] at each session creation and
/// fixed for the session's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    /// Joystick deadzone as a fraction of full deflection.
    pub joystick_deadzone: f32,
    /// Swap grip and aim poses on both controllers.
    pub swap_grip_aim_poses: bool,
    /// Interaction profile override, if any.
    pub forced_interaction_profile: Option<ForcedInteractionProfile>,
    /// Additive GPU frame-time override, microseconds, read verbatim.
    pub gpu_frame_time_override_offset_us: i64,
    /// Multiplicative GPU frame-time override magnitude, microseconds.
    pub gpu_frame_time_override_us: u64,
    /// Frame-time smoothing filter window length.
    pub gpu_frame_time_filter_length: u32,
    /// Render with parallel (non-canted) projection.
    pub use_parallel_projection: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            joystick_deadzone: 0.02,
            swap_grip_aim_poses: false,
            forced_interaction_profile: None,
            gpu_frame_time_override_offset_us: 0,
            gpu_frame_time_override_us: 0,
            gpu_frame_time_filter_length: 5,
            use_parallel_projection: false,
        }
    }
}

impl RuntimeSettings {
    /// Derives the settings in effect for a new session.
    ///
    /// Pure with respect to runtime state: reads the configuration store and
    /// the vendor SDK, produces a value, touches nothing else.
    #[must_use]
    pub fn refresh(config: &dyn ConfigStore, vendor: &dyn VendorSdk) -> Self {
        // Stored value is in hundredths.
        let joystick_deadzone = config.get_int("joystick_deadzone").unwrap_or(2) as f32 / 100.0;

        let swap_grip_aim_poses = config.get_int("swap_grip_aim_poses").unwrap_or(0) != 0;

        let forced_interaction_profile = match config.get_int("force_interaction_profile") {
            Some(1) => Some(ForcedInteractionProfile::OculusTouch),
            Some(2) => Some(ForcedInteractionProfile::MicrosoftMotion),
            _ => None,
        };

        // Already in microseconds.
        let gpu_frame_time_override_offset_us =
            i64::from(config.get_int("frame_time_override_offset").unwrap_or(0));

        // The multiplier is a percentage of the nominal frame duration:
        // *10 converts it to milliseconds, *1000 the whole product to
        // microseconds.
        let multiplier = config.get_int("frame_time_override_multiplier").unwrap_or(0);
        let gpu_frame_time_override_us = (f64::from(multiplier)
            * 10.0
            * f64::from(vendor.frame_duration_ms())
            * 1000.0)
            .max(0.0) as u64;

        let gpu_frame_time_filter_length =
            config.get_int("frame_time_filter_length").unwrap_or(5).max(0) as u32;

        let use_parallel_projection = vendor.get_int_config("steamvr_use_native_fov", 0) == 0;

        let settings = Self {
            joystick_deadzone,
            swap_grip_aim_poses,
            forced_interaction_profile,
            gpu_frame_time_override_offset_us,
            gpu_frame_time_override_us,
            gpu_frame_time_filter_length,
            use_parallel_projection,
        };
        log::debug!("refreshed settings: {settings:?}");
        settings
    }
}
