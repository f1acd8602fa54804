//! Operator dialog engine for the HardPy test-execution panel.
//!
//! A running test can ask the operator a question: confirm a step, type a
//! value, pick one or several options, or follow a paced sequence of
//! illustrated instructions. This crate models that dialog without any UI
//! toolkit:
//!
//! - [`dialog_box::DialogBox`] is the state machine: open and close, the
//!   operator's response, keyboard routing and sizing inputs
//! - [`dialog_box::DialogController`] runs it on tokio, measuring content,
//!   scheduling resizes and calling the backend
//! - [`config::DialogConfig`] holds the layout tunables and backend address
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hardpy_panel::prelude::*;
//!
//! let controller = DialogController::builder(surface, Arc::new(Viewport::new(1280.0, 800.0)))
//!     .build()?;
//!
//! controller.set_request(DialogRequest::from_json(json)?);
//! controller.key_press(KeyPress::character('b'));
//! controller.confirm();
//! ```
//!
//! # Feature Flags
//!
//! - `notifications`: show the "tests stopped" notice as a desktop
//!   notification (enabled by default)

pub mod backend;
pub mod config;
pub mod dialog_box;
pub mod error;
pub mod feedback;
pub mod prelude;

pub use hardpy_panel_core::{Signal, Size, Viewport};
pub use hardpy_panel_net::{PanelApiClient, PanelApiConfig, RunStatus};

pub use backend::PanelBackend;
pub use config::DialogConfig;
pub use error::{DialogError, Result};
pub use feedback::{LogFeedback, Notice, NoticeLevel, OperatorFeedback};

#[cfg(feature = "notifications")]
pub use feedback::DesktopFeedback;
