//! Core primitives for the HardPy operator panel.
//!
//! This crate provides the foundational pieces shared by the panel crates:
//!
//! - **Signal/Slot**: [`Signal`] for observer-style notifications
//! - **Geometry**: [`Size`] and [`Viewport`] in layout units
//! - **Logging**: `tracing` targets and the [`PerfSpan`] timing guard
//!
//! # Signal Example
//!
//! ```
//! use hardpy_panel_core::Signal;
//!
//! let confirmed = Signal::<String>::new();
//! let conn_id = confirmed.connect(|answer| {
//!     println!("operator answered: {}", answer);
//! });
//!
//! confirmed.emit("ok".to_string());
//! confirmed.disconnect(conn_id);
//! ```

pub mod geometry;
pub mod logging;
pub mod signal;

pub use geometry::{Size, Viewport};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
