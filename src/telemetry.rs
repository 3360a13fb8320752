//! Telemetry Records
//!
//! Two operational records leave the runtime: a scenario classification when
//! a session is created, and a usage summary when it is destroyed. Where
//! they go (a metrics pipeline, a log file, nowhere) is the embedder's
//! choice via [`TelemetrySink`].

use crate::graphics::GraphicsApi;

/// Session configuration classification, emitted once per session creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioRecord {
    /// The graphics backend chosen for the session.
    pub backend: GraphicsApi,
    /// Whether vendor-side lighthouse tracking is enabled.
    pub lighthouse_tracking: bool,
    /// Vendor field-of-view level.
    pub fov_level: i32,
    /// Whether parallel projection is in use.
    pub parallel_projection: bool,
}

/// Session usage summary, emitted once per session destruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageRecord {
    /// Elapsed time between session creation and destruction, in seconds.
    pub duration_seconds: f64,
    /// Total number of frames submitted over the session's lifetime.
    pub total_frame_count: u64,
}

/// Destination for telemetry records.
pub trait TelemetrySink {
    fn log_scenario(&mut self, record: &ScenarioRecord);
    fn log_usage(&mut self, record: &UsageRecord);
}

/// A [`TelemetrySink`] that forwards records to the diagnostic log and
/// otherwise drops them.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn log_scenario(&mut self, record: &ScenarioRecord) {
        log::debug!("scenario: {record:?}");
    }

    fn log_usage(&mut self, record: &UsageRecord) {
        log::debug!("usage: {record:?}");
    }
}
