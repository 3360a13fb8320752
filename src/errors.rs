//! Error Types
//!
//! This module defines the error vocabulary used by the session lifecycle.
//!
//! # Overview
//!
//! Every boundary operation returns [`Result<T>`], an alias for
//! `std::result::Result<T, MirageError>`. The lifecycle contract requires
//! that each precondition violation maps to exactly one variant and that the
//! *most specific* applicable variant is returned first: a malformed request
//! is reported before a stale handle, a stale handle before a wrong-state
//! transition, and so on. Callers rely on these distinctions to drive their
//! own state machines, so variants are never collapsed or remapped.
//!
//! Vendor SDK failures are carried verbatim inside
//! [`MirageError::RuntimeFailure`]; they are never retried or suppressed.

use thiserror::Error;

use crate::vendor::VendorError;

/// The error type for all session lifecycle operations.
///
/// Each variant corresponds to one entry of the fixed error vocabulary of
/// the external session API. No failure here is process-fatal; all are
/// recoverable by a corrected retry from the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MirageError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// The request structure is malformed or carries the wrong structure tag.
    #[error("Malformed request: unexpected structure tag or invalid field")]
    ValidationFailure,

    // ========================================================================
    // Handle Errors
    // ========================================================================
    /// The instance or session handle is unknown or stale.
    #[error("Invalid or stale handle")]
    HandleInvalid,

    // ========================================================================
    // State-Precondition Errors
    // ========================================================================
    /// The system has not been acquired, or the system id is not the one
    /// valid system.
    #[error("System is uninitialized or the system id is invalid")]
    SystemInvalid,

    /// The graphics requirements query was never performed for this system.
    #[error("Graphics requirements were not queried before session creation")]
    GraphicsRequirementsCallMissing,

    /// The requested primary view configuration is not the supported stereo
    /// configuration.
    #[error("Unsupported primary view configuration type")]
    ViewConfigurationTypeUnsupported,

    /// `begin` was called while the session was not in `Idle` or `Ready`.
    #[error("Session is not ready to begin")]
    SessionNotReady,

    /// `end` was called while the session was not in `Stopping`.
    #[error("Session is not stopping")]
    SessionNotStopping,

    /// `request_exit` was called while the session was not running.
    #[error("Session is not running")]
    SessionNotRunning,

    // ========================================================================
    // Resource-Limit Errors
    // ========================================================================
    /// A second concurrent session was requested. Only one session may exist
    /// at any time.
    #[error("Session limit reached: only one concurrent session is supported")]
    LimitReached,

    // ========================================================================
    // Device Errors
    // ========================================================================
    /// The extension chain contained no eligible graphics binding, or the
    /// supplied native device is unusable.
    #[error("No eligible graphics device binding")]
    GraphicsDeviceInvalid,

    /// A vendor SDK call failed. The underlying status is propagated
    /// verbatim.
    #[error("Vendor SDK failure: {0}")]
    RuntimeFailure(#[from] VendorError),
}

/// Alias for `Result<T, MirageError>`.
pub type Result<T> = std::result::Result<T, MirageError>;
