//! Graphics Binding Resolution
//!
//! A session renders through exactly one of four native graphics backends.
//! The application names its choice by appending a graphics-binding entry to
//! the extensible chain of [`SessionCreateInfo`](crate::SessionCreateInfo);
//! the resolver walks that chain in order and dispatches to the first entry
//! whose backend kind is recognized *and* whose capability extension was
//! enabled at instance creation. There is no multi-binding support: the
//! first eligible entry wins, and the chosen binding never changes for the
//! lifetime of the session.
//!
//! Backend initializers attach the application's native device to the vendor
//! compositor and keep the handles for frame submission (out of scope here).
//! Initializer failures propagate verbatim with no rollback of earlier
//! state and no further scanning.

use bitflags::bitflags;

use crate::errors::{MirageError, Result};
use crate::vendor::VendorSdk;

bitflags! {
    /// Capability extensions enabled at instance creation.
    ///
    /// A graphics-binding chain entry is only eligible when the matching
    /// extension bit is set. Vulkan has two vendor extensions; either one
    /// makes Vulkan bindings eligible.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct InstanceExtensions: u32 {
        const D3D11_ENABLE   = 1 << 0;
        const D3D12_ENABLE   = 1 << 1;
        const VULKAN_ENABLE  = 1 << 2;
        const VULKAN_ENABLE2 = 1 << 3;
        const OPENGL_ENABLE  = 1 << 4;
    }
}

/// An opaque pointer-sized native handle supplied by the application
/// (device, queue, GL context, ...). Never dereferenced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

impl NativeHandle {
    pub const NULL: Self = Self(0);

    #[inline]
    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// The graphics backend kind bound to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsApi {
    #[default]
    None,
    D3d11,
    D3d12,
    Vulkan,
    OpenGl,
}

impl std::fmt::Display for GraphicsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::D3d11 => "D3D11",
            Self::D3d12 => "D3D12",
            Self::Vulkan => "Vulkan",
            Self::OpenGl => "OpenGL",
        })
    }
}

/// D3D11 binding payload: the application's device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct D3d11Binding {
    pub device: NativeHandle,
}

/// D3D12 binding payload: the application's device and submission queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct D3d12Binding {
    pub device: NativeHandle,
    pub queue: NativeHandle,
}

/// Vulkan binding payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VulkanBinding {
    pub instance: NativeHandle,
    pub physical_device: NativeHandle,
    pub device: NativeHandle,
    pub queue_family_index: u32,
    pub queue_index: u32,
}

/// OpenGL binding payload: device context and GL rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenGlBinding {
    pub h_dc: NativeHandle,
    pub h_glrc: NativeHandle,
}

/// One entry of the extensible session-creation chain.
///
/// The chain is an ordered sequence of tagged entries; kinds this runtime
/// does not understand are carried as [`Unrecognized`](Self::Unrecognized)
/// and skipped by the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreateInfoExt {
    GraphicsBindingD3d11(D3d11Binding),
    GraphicsBindingD3d12(D3d12Binding),
    GraphicsBindingVulkan(VulkanBinding),
    GraphicsBindingOpenGl(OpenGlBinding),
    /// A chain entry with an unknown structure tag, preserved for
    /// forward compatibility.
    Unrecognized {
        raw_type: u32,
    },
}

/// Capability interface implemented once per backend variant.
pub(crate) trait GraphicsBackend {
    fn is_active(&self) -> bool;

    /// Releases this backend's compositor device. No-op when this backend
    /// was never the active one.
    fn cleanup(&mut self, vendor: &mut dyn VendorSdk);
}

macro_rules! backend {
    ($name:ident, $api:expr) => {
        #[derive(Debug, Default)]
        pub(crate) struct $name {
            device: Option<NativeHandle>,
        }

        impl GraphicsBackend for $name {
            fn is_active(&self) -> bool {
                self.device.is_some()
            }

            fn cleanup(&mut self, vendor: &mut dyn VendorSdk) {
                if self.device.take().is_some() {
                    vendor.release_compositor_device($api);
                    log::debug!("{} backend released", $api);
                }
            }
        }
    };
}

backend!(D3d11Backend, GraphicsApi::D3d11);
backend!(D3d12Backend, GraphicsApi::D3d12);
backend!(VulkanBackend, GraphicsApi::Vulkan);
backend!(OpenGlBackend, GraphicsApi::OpenGl);

impl D3d11Backend {
    fn initialize(&mut self, binding: &D3d11Binding, vendor: &mut dyn VendorSdk) -> Result<()> {
        if binding.device.is_null() {
            return Err(MirageError::GraphicsDeviceInvalid);
        }
        vendor.attach_compositor_device(GraphicsApi::D3d11, binding.device)?;
        self.device = Some(binding.device);
        log::debug!("D3D11 backend initialized");
        Ok(())
    }
}

impl D3d12Backend {
    fn initialize(&mut self, binding: &D3d12Binding, vendor: &mut dyn VendorSdk) -> Result<()> {
        if binding.device.is_null() || binding.queue.is_null() {
            return Err(MirageError::GraphicsDeviceInvalid);
        }
        vendor.attach_compositor_device(GraphicsApi::D3d12, binding.device)?;
        self.device = Some(binding.device);
        log::debug!("D3D12 backend initialized");
        Ok(())
    }
}

impl VulkanBackend {
    fn initialize(&mut self, binding: &VulkanBinding, vendor: &mut dyn VendorSdk) -> Result<()> {
        if binding.instance.is_null() || binding.physical_device.is_null() || binding.device.is_null()
        {
            return Err(MirageError::GraphicsDeviceInvalid);
        }
        vendor.attach_compositor_device(GraphicsApi::Vulkan, binding.device)?;
        self.device = Some(binding.device);
        log::debug!(
            "Vulkan backend initialized (queue family {}, queue {})",
            binding.queue_family_index,
            binding.queue_index
        );
        Ok(())
    }
}

impl OpenGlBackend {
    fn initialize(&mut self, binding: &OpenGlBinding, vendor: &mut dyn VendorSdk) -> Result<()> {
        if binding.h_dc.is_null() || binding.h_glrc.is_null() {
            return Err(MirageError::GraphicsDeviceInvalid);
        }
        vendor.attach_compositor_device(GraphicsApi::OpenGl, binding.h_glrc)?;
        self.device = Some(binding.h_glrc);
        log::debug!("OpenGL backend initialized");
        Ok(())
    }
}

/// The four mutually exclusive backends. At most one is active at a time;
/// all four are torn down unconditionally on session destruction (cleanup of
/// an inactive backend is a no-op).
#[derive(Debug, Default)]
pub(crate) struct BackendSet {
    d3d11: D3d11Backend,
    d3d12: D3d12Backend,
    vulkan: VulkanBackend,
    opengl: OpenGlBackend,
}

impl BackendSet {
    /// Scans the creation chain in order and initializes the first eligible
    /// binding. Returns the chosen backend kind.
    ///
    /// Initializer failures propagate immediately; an exhausted chain fails
    /// with [`MirageError::GraphicsDeviceInvalid`].
    pub(crate) fn resolve(
        &mut self,
        chain: &[CreateInfoExt],
        enabled: InstanceExtensions,
        vendor: &mut dyn VendorSdk,
    ) -> Result<GraphicsApi> {
        for entry in chain {
            match entry {
                CreateInfoExt::GraphicsBindingD3d11(binding)
                    if enabled.contains(InstanceExtensions::D3D11_ENABLE) =>
                {
                    self.d3d11.initialize(binding, vendor)?;
                    return Ok(GraphicsApi::D3d11);
                }
                CreateInfoExt::GraphicsBindingD3d12(binding)
                    if enabled.contains(InstanceExtensions::D3D12_ENABLE) =>
                {
                    self.d3d12.initialize(binding, vendor)?;
                    return Ok(GraphicsApi::D3d12);
                }
                CreateInfoExt::GraphicsBindingVulkan(binding)
                    if enabled.intersects(
                        InstanceExtensions::VULKAN_ENABLE | InstanceExtensions::VULKAN_ENABLE2,
                    ) =>
                {
                    self.vulkan.initialize(binding, vendor)?;
                    return Ok(GraphicsApi::Vulkan);
                }
                CreateInfoExt::GraphicsBindingOpenGl(binding)
                    if enabled.contains(InstanceExtensions::OPENGL_ENABLE) =>
                {
                    self.opengl.initialize(binding, vendor)?;
                    return Ok(GraphicsApi::OpenGl);
                }
                CreateInfoExt::Unrecognized { raw_type } => {
                    log::debug!("skipping unrecognized chain entry (type {raw_type})");
                }
                _ => {}
            }
        }
        Err(MirageError::GraphicsDeviceInvalid)
    }

    /// Tears down all four backends. Safe to call with none active.
    pub(crate) fn cleanup_all(&mut self, vendor: &mut dyn VendorSdk) {
        let backends: [&mut dyn GraphicsBackend; 4] = [
            &mut self.opengl,
            &mut self.vulkan,
            &mut self.d3d12,
            &mut self.d3d11,
        ];
        for backend in backends {
            backend.cleanup(vendor);
        }
    }

    /// `true` when some backend currently holds compositor resources.
    pub(crate) fn any_active(&self) -> bool {
        self.d3d11.is_active()
            || self.d3d12.is_active()
            || self.vulkan.is_active()
            || self.opengl.is_active()
    }
}
