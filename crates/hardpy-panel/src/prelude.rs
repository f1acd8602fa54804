//! Prelude module for the operator dialog.
//!
//! ```ignore
//! use hardpy_panel::prelude::*;
//! ```

// ============================================================================
// Dialog
// ============================================================================

pub use crate::dialog_box::{
    CloseReason, DialogController, DialogDimensions, DialogRequest, HtmlSpec, ImageSpec, Key,
    KeyPress, KeyboardModifiers, ResponseState, Step, ValidationError, VisibilitySignal,
    WidgetVariant,
};

// ============================================================================
// Capabilities
// ============================================================================

pub use crate::backend::PanelBackend;
pub use crate::dialog_box::{MeasurementSurface, MediaKind, StepPanel, ViewportProvider};
pub use crate::feedback::{LogFeedback, Notice, OperatorFeedback};

// ============================================================================
// Configuration and errors
// ============================================================================

pub use crate::config::DialogConfig;
pub use crate::error::DialogError;

pub use hardpy_panel_core::{Signal, Size, Viewport};
