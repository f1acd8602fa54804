//! Logging facilities for the operator panel.
//!
//! The panel uses the `tracing` crate for instrumentation. To see logs, the
//! embedding application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("hardpy_panel=debug")
//!     .init();
//! ```
//!
//! Every crate in the workspace logs under one of the [`targets`] below, so
//! a single directive can enable or silence a subsystem.

/// Target names for log filtering.
pub mod targets {
    /// Signal/slot primitive.
    pub const SIGNAL: &str = "hardpy_panel_core::signal";
    /// Dialog lifecycle and input handling.
    pub const DIALOG: &str = "hardpy_panel::dialog";
    /// Off-screen content measurement.
    pub const MEASURE: &str = "hardpy_panel::measure";
    /// Dialog size computation.
    pub const SIZING: &str = "hardpy_panel::sizing";
    /// Backend HTTP traffic.
    pub const NET: &str = "hardpy_panel::net";
}

/// A guard that records the duration of an operation in a tracing span.
///
/// ```
/// use hardpy_panel_core::logging::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("measure_steps");
///     // ... work ...
/// } // span closes here
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "hardpy_panel::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::DIALOG, targets::MEASURE, targets::SIZING, targets::NET] {
            assert!(target.starts_with("hardpy_panel::"));
        }
    }
}
