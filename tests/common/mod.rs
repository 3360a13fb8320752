//! Shared test fixtures: a scripted vendor SDK, a recording telemetry sink,
//! and helpers that assemble a runtime ready for session creation.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use mirage_xr::{
    ConfigStore, CreateInfoExt, D3d11Binding, GraphicsApi, InstanceExtensions, InstanceHandle,
    MemoryConfigStore, NativeHandle, Runtime, ScenarioRecord, SessionBeginInfo, SessionCreateFlags,
    SessionCreateInfo, SessionHandle, StructureType, SystemId, TelemetrySink, UsageRecord,
    VendorError, VendorSdk, ViewConfigurationType, VulkanBinding,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Scripted vendor SDK
// ============================================================================

#[derive(Debug)]
pub struct VendorState {
    pub now: f64,
    pub frame_duration_ms: f32,
    pub int_configs: HashMap<String, i32>,
    pub recenter_calls: u32,
    pub fail_recenter: bool,
    pub fail_attach: bool,
    pub attached: Vec<GraphicsApi>,
    pub released: Vec<GraphicsApi>,
}

impl Default for VendorState {
    fn default() -> Self {
        Self {
            now: 100.0,
            frame_duration_ms: 11.11,
            int_configs: HashMap::new(),
            recenter_calls: 0,
            fail_recenter: false,
            fail_attach: false,
            attached: Vec::new(),
            released: Vec::new(),
        }
    }
}

/// A [`VendorSdk`] whose state is shared with the test through an
/// `Rc<RefCell<..>>`, so assertions can inspect it after the runtime takes
/// ownership of the boxed vendor.
pub struct FakeVendor {
    pub state: Rc<RefCell<VendorState>>,
}

impl FakeVendor {
    pub fn new() -> (Self, Rc<RefCell<VendorState>>) {
        let state = Rc::new(RefCell::new(VendorState::default()));
        (
            Self {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl VendorSdk for FakeVendor {
    fn time_now(&self) -> f64 {
        let mut state = self.state.borrow_mut();
        state.now += 0.25;
        state.now
    }

    fn frame_duration_ms(&self) -> f32 {
        self.state.borrow().frame_duration_ms
    }

    fn recenter_tracking_origin(&mut self) -> Result<(), VendorError> {
        let mut state = self.state.borrow_mut();
        state.recenter_calls += 1;
        if state.fail_recenter {
            return Err(VendorError {
                call: "recenter_tracking_origin",
                status: -7,
            });
        }
        Ok(())
    }

    fn get_int_config(&self, key: &str, default: i32) -> i32 {
        self.state
            .borrow()
            .int_configs
            .get(key)
            .copied()
            .unwrap_or(default)
    }

    fn attach_compositor_device(
        &mut self,
        api: GraphicsApi,
        _device: NativeHandle,
    ) -> Result<(), VendorError> {
        let mut state = self.state.borrow_mut();
        if state.fail_attach {
            return Err(VendorError {
                call: "attach_compositor_device",
                status: -2,
            });
        }
        state.attached.push(api);
        Ok(())
    }

    fn release_compositor_device(&mut self, api: GraphicsApi) {
        self.state.borrow_mut().released.push(api);
    }
}

// ============================================================================
// Recording telemetry sink
// ============================================================================

#[derive(Debug, Default)]
pub struct TelemetryLog {
    pub scenarios: Vec<ScenarioRecord>,
    pub usages: Vec<UsageRecord>,
}

pub struct RecordingTelemetry {
    pub log: Rc<RefCell<TelemetryLog>>,
}

impl RecordingTelemetry {
    pub fn new() -> (Self, Rc<RefCell<TelemetryLog>>) {
        let log = Rc::new(RefCell::new(TelemetryLog::default()));
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn log_scenario(&mut self, record: &ScenarioRecord) {
        self.log.borrow_mut().scenarios.push(*record);
    }

    fn log_usage(&mut self, record: &UsageRecord) {
        self.log.borrow_mut().usages.push(*record);
    }
}

// ============================================================================
// Runtime fixture
// ============================================================================

pub struct Fixture {
    pub runtime: Runtime,
    pub vendor: Rc<RefCell<VendorState>>,
    pub telemetry: Rc<RefCell<TelemetryLog>>,
    pub instance: InstanceHandle,
    pub system_id: SystemId,
}

/// A runtime with every graphics extension enabled, the system acquired and
/// the graphics requirements query recorded: ready for `create_session`.
pub fn fixture() -> Fixture {
    fixture_with(MemoryConfigStore::new(), InstanceExtensions::all())
}

pub fn fixture_with(config: impl ConfigStore + 'static, extensions: InstanceExtensions) -> Fixture {
    let mut fx = raw_fixture_with(config, extensions);
    fx.system_id = fx.runtime.register_system();
    fx.runtime.record_graphics_requirements_queried();
    fx
}

/// Like [`fixture_with`], but with neither the system acquired nor the
/// graphics requirements recorded.
pub fn raw_fixture_with(
    config: impl ConfigStore + 'static,
    extensions: InstanceExtensions,
) -> Fixture {
    init_logging();
    let (vendor, vendor_state) = FakeVendor::new();
    let (telemetry, telemetry_log) = RecordingTelemetry::new();
    let runtime = Runtime::new(
        Box::new(vendor),
        Box::new(config),
        Box::new(telemetry),
        extensions,
    );
    let instance = runtime.instance_handle();
    Fixture {
        runtime,
        vendor: vendor_state,
        telemetry: telemetry_log,
        instance,
        // Placeholder until `register_system` runs.
        system_id: SystemId(0),
    }
}

// ============================================================================
// Request builders
// ============================================================================

pub fn d3d11_entry() -> CreateInfoExt {
    CreateInfoExt::GraphicsBindingD3d11(D3d11Binding {
        device: NativeHandle(0x11_11),
    })
}

pub fn vulkan_entry() -> CreateInfoExt {
    CreateInfoExt::GraphicsBindingVulkan(VulkanBinding {
        instance: NativeHandle(0xAA_10),
        physical_device: NativeHandle(0xAA_11),
        device: NativeHandle(0xAA_12),
        queue_family_index: 0,
        queue_index: 0,
    })
}

pub fn create_info(system_id: SystemId, extensions: Vec<CreateInfoExt>) -> SessionCreateInfo {
    SessionCreateInfo {
        ty: StructureType::SessionCreateInfo,
        create_flags: SessionCreateFlags::empty(),
        system_id,
        extensions,
    }
}

pub fn stereo_begin() -> SessionBeginInfo {
    SessionBeginInfo {
        ty: StructureType::SessionBeginInfo,
        primary_view_configuration_type: ViewConfigurationType::PrimaryStereo,
    }
}

/// Creates a session bound to D3D11.
pub fn create_default_session(fx: &mut Fixture) -> SessionHandle {
    let info = create_info(fx.system_id, vec![d3d11_entry()]);
    fx.runtime
        .create_session(fx.instance, &info)
        .expect("session creation")
}
