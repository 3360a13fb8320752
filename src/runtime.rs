//! Runtime Core
//!
//! [`Runtime`] is the top-level object behind the external session API. It
//! owns the collaborators (vendor SDK, configuration store, telemetry sink),
//! the instance-level oracles the lifecycle preconditions check against, and
//! the single optional session slot together with the space and swapchain
//! tables.
//!
//! # Concurrency contract
//!
//! The runtime is single-threaded and cooperative. Every lifecycle
//! operation takes `&mut self` and runs to completion without suspension;
//! callers are contractually required to serialize calls against the same
//! runtime, and no internal locking is performed. The only blocking calls
//! are bounded, synchronous vendor SDK calls, which are never retried.

use slotmap::SlotMap;

use crate::config::ConfigStore;
use crate::graphics::{BackendSet, InstanceExtensions};
use crate::session::{Session, SessionStateChanged};
use crate::settings::RuntimeSettings;
use crate::space::{Space, SpaceHandle};
use crate::swapchain::{Swapchain, SwapchainHandle};
use crate::telemetry::TelemetrySink;
use crate::vendor::VendorSdk;

/// Handle to the runtime instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub u64);

/// Identifier of an acquired display system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(pub u64);

/// Handle to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub u64);

/// Structure tag carried by every versioned request payload.
///
/// Each boundary operation validates that its request carries the expected
/// tag before looking at anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureType {
    SessionCreateInfo,
    SessionBeginInfo,
    ReferenceSpaceCreateInfo,
    SwapchainCreateInfo,
}

/// The adapter runtime: one instance, one system, at most one session.
pub struct Runtime {
    pub(crate) vendor: Box<dyn VendorSdk>,
    pub(crate) config: Box<dyn ConfigStore>,
    pub(crate) telemetry: Box<dyn TelemetrySink>,

    pub(crate) enabled_extensions: InstanceExtensions,
    pub(crate) system_created: bool,
    pub(crate) graphics_requirements_queried: bool,

    pub(crate) backends: BackendSet,
    pub(crate) session: Option<Session>,
    pub(crate) spaces: SlotMap<SpaceHandle, Space>,
    pub(crate) swapchains: SlotMap<SwapchainHandle, Swapchain>,
    pub(crate) settings: RuntimeSettings,
}

impl Runtime {
    pub(crate) const LIVE_INSTANCE: InstanceHandle = InstanceHandle(1);
    pub(crate) const LIVE_SYSTEM: SystemId = SystemId(1);
    pub(crate) const LIVE_SESSION: SessionHandle = SessionHandle(1);

    /// Builds a runtime around its collaborators.
    ///
    /// `enabled_extensions` records which graphics capability extensions
    /// were requested at instance creation; only those make the matching
    /// binding kinds eligible during session creation.
    #[must_use]
    pub fn new(
        vendor: Box<dyn VendorSdk>,
        config: Box<dyn ConfigStore>,
        telemetry: Box<dyn TelemetrySink>,
        enabled_extensions: InstanceExtensions,
    ) -> Self {
        Self {
            vendor,
            config,
            telemetry,
            enabled_extensions,
            system_created: false,
            graphics_requirements_queried: false,
            backends: BackendSet::default(),
            session: None,
            spaces: SlotMap::with_key(),
            swapchains: SlotMap::with_key(),
            settings: RuntimeSettings::default(),
        }
    }

    /// The one valid instance handle.
    #[inline]
    #[must_use]
    pub fn instance_handle(&self) -> InstanceHandle {
        Self::LIVE_INSTANCE
    }

    /// Acquires the display system and returns its identifier.
    pub fn register_system(&mut self) -> SystemId {
        self.system_created = true;
        Self::LIVE_SYSTEM
    }

    /// Records that the graphics requirements query was performed.
    /// Session creation refuses to run before this.
    pub fn record_graphics_requirements_queried(&mut self) {
        self.graphics_requirements_queried = true;
    }

    /// The live session, if one exists.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Mutable access to the live session's bookkeeping collections.
    #[inline]
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Settings derived at the last session creation.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// `true` while a graphics backend holds compositor resources. Stays
    /// `true` after a failed creation rollback until the next successful
    /// session is destroyed.
    #[inline]
    #[must_use]
    pub fn has_bound_graphics_device(&self) -> bool {
        self.backends.any_active()
    }

    /// Delivers at most one pending state-change event, clearing the dirty
    /// flag: one event per transition, none while the state is clean.
    pub fn poll_session_state_event(&mut self) -> Option<SessionStateChanged> {
        self.session.as_mut()?.take_state_event()
    }

    pub(crate) fn validate_session_handle(&self, session: SessionHandle) -> crate::Result<()> {
        if self.session.is_none() || session != Self::LIVE_SESSION {
            return Err(crate::MirageError::HandleInvalid);
        }
        Ok(())
    }
}
