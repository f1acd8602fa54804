//! Capabilities the dialog engine needs from the rendering host.
//!
//! The engine never touches a real widget tree. Layout queries go through
//! [`MeasurementSurface`] and [`ViewportProvider`], which the embedder
//! implements on top of its toolkit and tests implement with fixed sizes.

use futures_util::future::BoxFuture;
use hardpy_panel_core::{Size, Viewport};

use super::request::Step;

/// Handle to an off-screen measurement container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u64);

/// Handle to one step panel inside a measurement container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelId(pub u64);

/// The kind of asynchronously loaded content in a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// An inline image; loaded once decoded.
    Image,
    /// A document fetched from a URL; loaded when its `load` event fires.
    Document,
}

/// A step panel to lay out in a measurement container.
#[derive(Debug, Clone, Copy)]
pub struct StepPanel<'a> {
    /// Position of the step in tab order.
    pub index: usize,
    pub step: &'a Step,
    /// Padding on every side of the panel.
    pub padding: f32,
}

/// Off-screen layout and live body queries.
pub trait MeasurementSurface: Send + Sync {
    /// Create a detached, invisible container `width` units wide.
    fn create_container(&self, width: f32) -> ContainerId;

    /// Build a panel for a step and append it to `container`.
    fn append_panel(&self, container: ContainerId, panel: &StepPanel<'_>) -> PanelId;

    /// Current bounding size of a panel.
    fn panel_size(&self, panel: PanelId) -> Size;

    /// Resolves when the panel's media of `kind` has loaded.
    fn media_loaded(&self, panel: PanelId, kind: MediaKind) -> BoxFuture<'static, ()>;

    /// Detach and drop a container and its panels.
    fn remove_container(&self, container: ContainerId);

    /// Scroll size of the mounted dialog body, or `None` if the dialog is
    /// not mounted.
    fn body_scroll_size(&self) -> Option<Size>;
}

/// Source of the current viewport size.
pub trait ViewportProvider: Send + Sync {
    fn viewport(&self) -> Viewport;
}

/// A viewport that never changes.
impl ViewportProvider for Viewport {
    fn viewport(&self) -> Viewport {
        *self
    }
}
