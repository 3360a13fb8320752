//! # mirage-xr
//!
//! An adapter runtime exposing a standardized extended-reality session API
//! while driving a single proprietary head-mounted-display SDK underneath.
//!
//! The crate's core is the session lifecycle:
//!
//! - **[`runtime`]** — the [`Runtime`] singleton owner and instance-level
//!   oracles.
//! - **[`session`]** — the session state machine and the five lifecycle
//!   operations.
//! - **[`graphics`]** — graphics-binding resolution over the extensible
//!   creation chain, dispatching to one of four native backends.
//! - **[`settings`]** — per-session [`RuntimeSettings`] derivation from the
//!   external configuration store.
//!
//! The vendor SDK itself stays behind the [`VendorSdk`] trait; pose
//! tracking, compositor internals and swapchain image negotiation are not
//! this crate's concern.
//!
//! ```rust,ignore
//! use mirage_xr::{Runtime, SessionCreateInfo, StructureType};
//!
//! let mut runtime = Runtime::new(vendor, config, telemetry, extensions);
//! let system_id = runtime.register_system();
//! runtime.record_graphics_requirements_queried();
//!
//! let session = runtime.create_session(runtime.instance_handle(), &info)?;
//! runtime.begin_session(session, &begin_info)?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod errors;
pub mod graphics;
pub mod runtime;
pub mod session;
pub mod settings;
pub mod space;
pub mod swapchain;
pub mod telemetry;
pub mod vendor;

pub use config::{ConfigStore, MemoryConfigStore};
pub use errors::{MirageError, Result};
pub use graphics::{
    CreateInfoExt, D3d11Binding, D3d12Binding, GraphicsApi, InstanceExtensions, NativeHandle,
    OpenGlBinding, VulkanBinding,
};
pub use runtime::{InstanceHandle, Runtime, SessionHandle, StructureType, SystemId};
pub use session::{
    ActionSetHandle, Session, SessionBeginInfo, SessionCreateFlags, SessionCreateInfo,
    SessionState, SessionStateChanged, ViewConfigurationType,
};
pub use settings::{ForcedInteractionProfile, RuntimeSettings};
pub use space::{Pose, ReferenceSpaceCreateInfo, ReferenceSpaceType, SpaceHandle};
pub use swapchain::{SwapchainCreateInfo, SwapchainHandle};
pub use telemetry::{NullTelemetry, ScenarioRecord, TelemetrySink, UsageRecord};
pub use vendor::{VendorError, VendorSdk};
