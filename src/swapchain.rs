//! Swapchain Bookkeeping
//!
//! Image negotiation and frame submission live outside this crate; what the
//! session lifecycle needs is ownership tracking. A session owns the set of
//! swapchains created against it and must drain that set during
//! destruction, so creation inserts into the owning set and
//! [`Runtime::destroy_swapchain`] removes — including when it is reentered
//! by [`Runtime::destroy_session`](crate::runtime::Runtime).

use slotmap::new_key_type;

use crate::errors::{MirageError, Result};
use crate::runtime::{Runtime, SessionHandle, StructureType};

new_key_type! {
    /// Handle to a swapchain owned by a session.
    pub struct SwapchainHandle;
}

/// Request payload for [`Runtime::create_swapchain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainCreateInfo {
    pub ty: StructureType,
    /// Native image format, passed through to the vendor compositor.
    pub format: i64,
    pub width: u32,
    pub height: u32,
    pub sample_count: u32,
    pub array_size: u32,
    pub mip_count: u32,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Swapchain {
    pub(crate) info: SwapchainCreateInfo,
}

impl Runtime {
    /// Creates a swapchain owned by the given session.
    ///
    /// Only the ownership bookkeeping happens here; image allocation is the
    /// compositor's business.
    pub fn create_swapchain(
        &mut self,
        session: SessionHandle,
        create_info: &SwapchainCreateInfo,
    ) -> Result<SwapchainHandle> {
        if create_info.ty != StructureType::SwapchainCreateInfo
            || create_info.width == 0
            || create_info.height == 0
        {
            return Err(MirageError::ValidationFailure);
        }
        self.validate_session_handle(session)?;

        let handle = self.swapchains.insert(Swapchain { info: *create_info });
        if let Some(state) = self.session.as_mut() {
            state.swapchains.insert(handle);
        }
        log::debug!(
            "created swapchain {handle:?} ({}x{}, format {})",
            create_info.width,
            create_info.height,
            create_info.format
        );
        Ok(handle)
    }

    /// Destroys a swapchain and removes it from its session's owned set.
    pub fn destroy_swapchain(&mut self, swapchain: SwapchainHandle) -> Result<()> {
        if self.swapchains.remove(swapchain).is_none() {
            return Err(MirageError::HandleInvalid);
        }
        if let Some(state) = self.session.as_mut() {
            state.swapchains.remove(&swapchain);
        }
        log::debug!("destroyed swapchain {swapchain:?}");
        Ok(())
    }

    /// Creation parameters of an existing swapchain.
    #[must_use]
    pub fn swapchain_info(&self, swapchain: SwapchainHandle) -> Option<SwapchainCreateInfo> {
        self.swapchains.get(swapchain).map(|s| s.info)
    }
}
