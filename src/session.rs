//! Session Lifecycle
//!
//! This module owns the session state machine and the five boundary
//! operations that drive it: create, begin, end, request-exit and destroy.
//!
//! # State machine
//!
//! ```text
//! Unknown -> Idle -> Ready -> Synchronized -> Visible -> Focused
//!    ^        ^                    |             |          |
//!    |        |                    +------v------+----------+
//!    |        +---- end ----- Stopping <- request_exit
//!    +------------ destroy
//! ```
//!
//! `Ready`, `Visible` and `Focused` are reached through frame and focus
//! signaling outside this crate; the operations here enforce the subset of
//! transitions reachable from the lifecycle entry points. Every precondition
//! violation returns the single most specific error from the fixed
//! vocabulary in [`MirageError`], checked strictly in order, with no side
//! effect before all of an operation's preconditions pass (the one
//! documented exception is the creation rollback, see
//! [`Runtime::create_session`]).
//!
//! Every successful transition stamps the state-change time from the vendor
//! monotonic clock and marks the state dirty; external event delivery drains
//! that flag through [`Runtime::poll_session_state_event`], producing
//! exactly one state-change event per transition.

use std::collections::VecDeque;

use bitflags::bitflags;
use rustc_hash::FxHashSet;

use crate::errors::{MirageError, Result};
use crate::graphics::{CreateInfoExt, GraphicsApi};
use crate::runtime::{InstanceHandle, Runtime, SessionHandle, StructureType, SystemId};
use crate::settings::RuntimeSettings;
use crate::space::{Pose, ReferenceSpaceCreateInfo, ReferenceSpaceType, SpaceHandle};
use crate::swapchain::SwapchainHandle;
use crate::telemetry::{ScenarioRecord, UsageRecord};

/// The session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No session exists.
    Unknown,
    /// Created but not begun, or returned to after `end`.
    Idle,
    /// The runtime signaled readiness to begin (external).
    Ready,
    /// Begun and synchronized with the frame loop.
    Synchronized,
    /// Content is visible to the user (external).
    Visible,
    /// Content is visible and receiving input (external).
    Focused,
    /// An exit was requested; the application must call `end`.
    Stopping,
}

bitflags! {
    /// Session creation flags. No flags are currently defined; the field is
    /// carried for request versioning.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct SessionCreateFlags: u64 {}
}

/// Primary view configuration requested at `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewConfigurationType {
    PrimaryMono,
    /// The one supported configuration: one view per eye.
    PrimaryStereo,
}

/// Handle to an application action set. Action binding itself lives outside
/// this crate; the session only caches which sets are attached and valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionSetHandle(pub u64);

/// Request payload for [`Runtime::create_session`].
///
/// `extensions` is the ordered, extensible chain the graphics binding is
/// selected from; see [`crate::graphics`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCreateInfo {
    pub ty: StructureType,
    pub create_flags: SessionCreateFlags,
    pub system_id: SystemId,
    pub extensions: Vec<CreateInfoExt>,
}

/// Request payload for [`Runtime::begin_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBeginInfo {
    pub ty: StructureType,
    pub primary_view_configuration_type: ViewConfigurationType,
}

/// A pending state-change notification, delivered once per transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStateChanged {
    pub state: SessionState,
    /// Monotonic device time at which the transition happened, in seconds.
    pub time: f64,
}

/// Per-session bookkeeping.
///
/// At most one `Session` exists at any time, held in the runtime's optional
/// session slot. The state-machine fields are private and only move through
/// the lifecycle operations; the collections below them are reset at
/// creation and mutated by external collaborators (input, frame loop).
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    state_dirty: bool,
    state_event_time: f64,
    exiting: bool,
    start_time: f64,
    binding: GraphicsApi,

    pub(crate) origin_space: Option<SpaceHandle>,
    pub(crate) view_space: Option<SpaceHandle>,
    pub(crate) swapchains: FxHashSet<SwapchainHandle>,

    /// Frames submitted over the session's lifetime.
    pub total_frame_count: u64,
    /// Per-controller activity, left and right.
    pub controller_active: [bool; 2],
    /// Action sets attached to the current sync call.
    pub active_action_sets: FxHashSet<ActionSetHandle>,
    /// Action sets validated against this session.
    pub valid_action_sets: FxHashSet<ActionSetHandle>,
    /// Recent GPU frame-time samples, cleared here and fed by the frame loop.
    pub frame_times: VecDeque<f64>,
}

impl Session {
    fn new(binding: GraphicsApi, now: f64) -> Self {
        Self {
            state: SessionState::Idle,
            state_dirty: true,
            state_event_time: now,
            exiting: false,
            start_time: now,
            binding,
            origin_space: None,
            view_space: None,
            swapchains: FxHashSet::default(),
            total_frame_count: 0,
            controller_active: [false; 2],
            active_action_sets: FxHashSet::default(),
            valid_action_sets: FxHashSet::default(),
            frame_times: VecDeque::new(),
        }
    }

    fn transition(&mut self, next: SessionState, now: f64) {
        log::debug!("session state {:?} -> {next:?}", self.state);
        self.state = next;
        self.state_dirty = true;
        self.state_event_time = now;
    }

    pub(crate) fn take_state_event(&mut self) -> Option<SessionStateChanged> {
        if !self.state_dirty {
            return None;
        }
        self.state_dirty = false;
        Some(SessionStateChanged {
            state: self.state,
            time: self.state_event_time,
        })
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// `true` after a user-initiated stop completed via `end`.
    #[inline]
    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    /// Time of the most recent state transition, monotonic seconds.
    #[inline]
    #[must_use]
    pub fn state_event_time(&self) -> f64 {
        self.state_event_time
    }

    /// Creation time, monotonic seconds.
    #[inline]
    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// The graphics backend chosen at creation. Never changes afterward.
    #[inline]
    #[must_use]
    pub fn binding(&self) -> GraphicsApi {
        self.binding
    }

    #[inline]
    #[must_use]
    pub fn origin_space(&self) -> Option<SpaceHandle> {
        self.origin_space
    }

    #[inline]
    #[must_use]
    pub fn view_space(&self) -> Option<SpaceHandle> {
        self.view_space
    }

    /// Number of swapchains currently owned by this session.
    #[inline]
    #[must_use]
    pub fn swapchain_count(&self) -> usize {
        self.swapchains.len()
    }
}

impl Runtime {
    /// Creates the session (`Unknown -> Idle`).
    ///
    /// Preconditions are checked strictly in order, each with its own error
    /// and none with side effects if an earlier check fails: structure tag,
    /// instance handle, system id, prior graphics-requirements query, and
    /// the single-session limit. Only then does graphics binding resolution
    /// run; see [`crate::graphics`] for the chain scan.
    ///
    /// On binding success the runtime recenters tracking when the
    /// `recenter_on_startup` setting asks for it (default on), derives
    /// [`RuntimeSettings`], emits the scenario telemetry record, resets all
    /// session bookkeeping and creates the two mandatory reference spaces.
    ///
    /// If reference-space creation fails partway, the session slot is
    /// cleared before the error is re-raised, but compositor resources the
    /// resolver already attached are *not* released on this path; they stay
    /// attached until the next successful session's destruction. This
    /// matches the long-standing external behavior and is deliberate.
    pub fn create_session(
        &mut self,
        instance: InstanceHandle,
        create_info: &SessionCreateInfo,
    ) -> Result<SessionHandle> {
        if create_info.ty != StructureType::SessionCreateInfo {
            return Err(MirageError::ValidationFailure);
        }
        log::debug!(
            "create_session: instance {instance:?}, system {:?}, flags {:?}",
            create_info.system_id,
            create_info.create_flags
        );
        if instance != Self::LIVE_INSTANCE {
            return Err(MirageError::HandleInvalid);
        }
        if !self.system_created || create_info.system_id != Self::LIVE_SYSTEM {
            return Err(MirageError::SystemInvalid);
        }
        if !self.graphics_requirements_queried {
            return Err(MirageError::GraphicsRequirementsCallMissing);
        }
        // Only one concurrent session is supported.
        if self.session.is_some() {
            return Err(MirageError::LimitReached);
        }

        let binding = self.backends.resolve(
            &create_info.extensions,
            self.enabled_extensions,
            self.vendor.as_mut(),
        )?;

        // Read configuration and set up the session accordingly.
        if self.config.get_int("recenter_on_startup").unwrap_or(1) != 0 {
            self.vendor.recenter_tracking_origin()?;
        }
        self.settings = RuntimeSettings::refresh(self.config.as_ref(), self.vendor.as_ref());
        if self.settings.use_parallel_projection {
            log::info!("Parallel projection is enabled");
        }

        let scenario = ScenarioRecord {
            backend: binding,
            lighthouse_tracking: self.vendor.get_int_config("enable_lighthouse_tracking", 0) != 0,
            fov_level: self.vendor.get_int_config("fov_level", 1),
            parallel_projection: self.settings.use_parallel_projection,
        };
        self.telemetry.log_scenario(&scenario);

        let now = self.vendor.time_now();
        self.session = Some(Session::new(binding, now));

        if let Err(err) = self.create_session_spaces() {
            // Compensating action for the partial construction: forget the
            // session before re-raising. Attached compositor resources are
            // left in place on this path.
            self.session = None;
            return Err(err);
        }

        log::debug!("session created with {binding} binding");
        Ok(Self::LIVE_SESSION)
    }

    /// Creates the origin (`Local`) and view (`View`) spaces at identity
    /// pose and records their handles on the session.
    fn create_session_spaces(&mut self) -> Result<()> {
        let origin = self.create_reference_space(
            Self::LIVE_SESSION,
            &ReferenceSpaceCreateInfo {
                ty: StructureType::ReferenceSpaceCreateInfo,
                reference_space_type: ReferenceSpaceType::Local,
                pose_in_reference_space: Pose::IDENTITY,
            },
        )?;
        let view = self.create_reference_space(
            Self::LIVE_SESSION,
            &ReferenceSpaceCreateInfo {
                ty: StructureType::ReferenceSpaceCreateInfo,
                reference_space_type: ReferenceSpaceType::View,
                pose_in_reference_space: Pose::IDENTITY,
            },
        )?;

        let Some(state) = self.session.as_mut() else {
            return Err(MirageError::HandleInvalid);
        };
        state.origin_space = Some(origin);
        state.view_space = Some(view);
        Ok(())
    }

    /// Begins the session (`Idle | Ready -> Synchronized`).
    ///
    /// Fails with [`MirageError::ViewConfigurationTypeUnsupported`] for any
    /// view configuration other than primary stereo, and with
    /// [`MirageError::SessionNotReady`] from any other state.
    pub fn begin_session(
        &mut self,
        session: SessionHandle,
        begin_info: &SessionBeginInfo,
    ) -> Result<()> {
        if begin_info.ty != StructureType::SessionBeginInfo {
            return Err(MirageError::ValidationFailure);
        }
        log::debug!(
            "begin_session: {session:?}, view configuration {:?}",
            begin_info.primary_view_configuration_type
        );
        self.validate_session_handle(session)?;
        if begin_info.primary_view_configuration_type != ViewConfigurationType::PrimaryStereo {
            return Err(MirageError::ViewConfigurationTypeUnsupported);
        }

        let Some(state) = self.session.as_mut() else {
            return Err(MirageError::HandleInvalid);
        };
        if !matches!(state.state, SessionState::Idle | SessionState::Ready) {
            return Err(MirageError::SessionNotReady);
        }
        let now = self.vendor.time_now();
        state.transition(SessionState::Synchronized, now);
        Ok(())
    }

    /// Ends the session (`Stopping -> Idle`) and marks it exiting.
    ///
    /// The exiting flag lets collaborators distinguish a user-initiated stop
    /// from a transient one.
    pub fn end_session(&mut self, session: SessionHandle) -> Result<()> {
        log::debug!("end_session: {session:?}");
        self.validate_session_handle(session)?;

        let Some(state) = self.session.as_mut() else {
            return Err(MirageError::HandleInvalid);
        };
        if state.state != SessionState::Stopping {
            return Err(MirageError::SessionNotStopping);
        }
        state.exiting = true;
        let now = self.vendor.time_now();
        state.transition(SessionState::Idle, now);
        Ok(())
    }

    /// Requests an exit (`Synchronized | Visible | Focused -> Stopping`).
    pub fn request_exit_session(&mut self, session: SessionHandle) -> Result<()> {
        log::debug!("request_exit_session: {session:?}");
        self.validate_session_handle(session)?;

        let Some(state) = self.session.as_mut() else {
            return Err(MirageError::HandleInvalid);
        };
        if !matches!(
            state.state,
            SessionState::Synchronized | SessionState::Visible | SessionState::Focused
        ) {
            return Err(MirageError::SessionNotRunning);
        }
        let now = self.vendor.time_now();
        state.transition(SessionState::Stopping, now);
        Ok(())
    }

    /// Destroys the session and tears down everything it owns.
    ///
    /// Teardown order: usage telemetry, then every outstanding swapchain one
    /// at a time, then both reference spaces, then all four graphics
    /// backends (no-ops for the inactive ones), and the session slot last so
    /// a reentrant destroy fails cleanly with
    /// [`MirageError::HandleInvalid`].
    ///
    /// A swapchain-destroy failure aborts the remaining teardown and leaves
    /// the session in place; the caller may retry.
    pub fn destroy_session(&mut self, session: SessionHandle) -> Result<()> {
        log::debug!("destroy_session: {session:?}");
        self.validate_session_handle(session)?;

        let now = self.vendor.time_now();
        let usage = self.session.as_ref().map(|state| UsageRecord {
            duration_seconds: now - state.start_time,
            total_frame_count: state.total_frame_count,
        });
        if let Some(usage) = usage {
            self.telemetry.log_usage(&usage);
        }

        // Drain the owned swapchain set before the session may disappear.
        loop {
            let next = self
                .session
                .as_ref()
                .and_then(|state| state.swapchains.iter().next().copied());
            let Some(handle) = next else { break };
            self.destroy_swapchain(handle)?;
        }

        let (origin, view) = match self.session.as_mut() {
            Some(state) => (state.origin_space.take(), state.view_space.take()),
            None => (None, None),
        };
        if let Some(handle) = origin {
            self.destroy_space(handle)?;
        }
        if let Some(handle) = view {
            self.destroy_space(handle)?;
        }

        self.backends.cleanup_all(self.vendor.as_mut());

        // Dropping the slot is the transition back to Unknown and clears the
        // dirty/exiting flags with it; it happens last so a reentrant
        // destroy sees no session.
        self.session = None;
        log::debug!("session destroyed");
        Ok(())
    }
}
