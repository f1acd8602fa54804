//! The operator confirmation dialog.
//!
//! Leaf-first:
//!
//! - [`variant`]: the six interaction variants and their affordances
//! - [`request`]: the immutable request describing one dialog
//! - [`measure`]: off-screen measurement of Multistep content
//! - [`sizing`]: dialog dimensions from content and viewport
//! - [`response`]: response state, validation and encoding
//! - [`keyboard`]: key press routing
//! - [`lifecycle`]: the [`DialogBox`] state machine
//! - [`controller`]: [`DialogController`], which runs the state machine
//!
//! Layout queries go through the [`MeasurementSurface`] and
//! [`ViewportProvider`] traits in [`surface`].

pub mod controller;
pub mod keyboard;
pub mod lifecycle;
pub mod measure;
pub mod request;
pub mod response;
pub mod sizing;
pub mod surface;
pub mod variant;

pub use controller::{DialogController, DialogControllerBuilder};
pub use keyboard::{Key, KeyAction, KeyPress, KeyboardModifiers, KeyboardRouter};
pub use lifecycle::{CloseReason, DialogBox, DialogEffect, DialogEvent, LifecycleState};
pub use measure::{ContentMeasurer, MeasurementHandle};
pub use request::{
    DialogRequest, HtmlSpec, ImageSpec, Step, VariantData, VisibilitySignal, VisibilityToken,
};
pub use response::{PLAIN_CONFIRMATION, ResponseState, ValidationError, encode_component};
pub use sizing::{DialogDimensions, DialogSizer, LayoutSnapshot, SizingSource};
pub use surface::{ContainerId, MeasurementSurface, MediaKind, PanelId, StepPanel, ViewportProvider};
pub use variant::{InitialFocus, InputAffordance, WidgetVariant};
