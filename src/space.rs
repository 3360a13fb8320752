//! Reference Spaces
//!
//! Coordinate frames other poses are expressed against. Every session owns
//! two mandatory spaces created at session creation: an origin space in the
//! gravity-aligned `Local` frame and a device-relative `View` space, both at
//! identity pose.

use glam::{Quat, Vec3};
use slotmap::new_key_type;

use crate::errors::{MirageError, Result};
use crate::runtime::{Runtime, SessionHandle, StructureType};

new_key_type! {
    /// Handle to a reference space owned by the runtime.
    pub struct SpaceHandle;
}

/// A rigid pose: position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The supported reference frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSpaceType {
    /// Head-relative at creation but gravity-aligned; the session origin.
    Local,
    /// Rigidly attached to the display device.
    View,
    /// Floor-level bounded play area.
    Stage,
}

/// Request payload for [`Runtime::create_reference_space`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceSpaceCreateInfo {
    pub ty: StructureType,
    pub reference_space_type: ReferenceSpaceType,
    pub pose_in_reference_space: Pose,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Space {
    pub(crate) reference_space_type: ReferenceSpaceType,
    pub(crate) pose_in_reference_space: Pose,
}

impl Runtime {
    /// Creates a reference space owned by the given session.
    pub fn create_reference_space(
        &mut self,
        session: SessionHandle,
        create_info: &ReferenceSpaceCreateInfo,
    ) -> Result<SpaceHandle> {
        if create_info.ty != StructureType::ReferenceSpaceCreateInfo {
            return Err(MirageError::ValidationFailure);
        }
        self.validate_session_handle(session)?;

        let handle = self.spaces.insert(Space {
            reference_space_type: create_info.reference_space_type,
            pose_in_reference_space: create_info.pose_in_reference_space,
        });
        log::debug!(
            "created {:?} reference space {handle:?}",
            create_info.reference_space_type
        );
        Ok(handle)
    }

    /// Destroys a reference space. Fails with
    /// [`MirageError::HandleInvalid`] for unknown or stale handles.
    pub fn destroy_space(&mut self, space: SpaceHandle) -> Result<()> {
        if self.spaces.remove(space).is_none() {
            return Err(MirageError::HandleInvalid);
        }
        Ok(())
    }

    /// Reference frame of an existing space.
    #[must_use]
    pub fn space_type(&self, space: SpaceHandle) -> Option<ReferenceSpaceType> {
        self.spaces.get(space).map(|s| s.reference_space_type)
    }

    /// Pose of an existing space within its reference frame.
    #[must_use]
    pub fn space_pose(&self, space: SpaceHandle) -> Option<Pose> {
        self.spaces.get(space).map(|s| s.pose_in_reference_space)
    }
}
