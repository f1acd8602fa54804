//! Dialog size computation.
//!
//! The dialog may take at most [`DialogConfig::viewport_fraction`] of the
//! viewport in each direction. Inside that bound the size follows either
//! the pre-measured Multistep content or the live scroll size of the
//! mounted body, plus the chrome around it. The minimum size always wins,
//! even over a viewport too small to hold it.

use hardpy_panel_core::logging::{PerfSpan, targets};
use hardpy_panel_core::{Size, Viewport};

use crate::config::DialogConfig;

/// Where the content size comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingSource {
    /// The off-screen measurement of all steps.
    Measured,
    /// The scroll size of the mounted dialog body.
    #[default]
    LiveBody,
}

/// Final dialog dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogDimensions {
    pub width: f32,
    pub height: f32,
    /// Height cap applied to the dialog and its scrolling body.
    pub max_height: f32,
}

impl DialogDimensions {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Layout state sampled when a recomputation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSnapshot {
    pub viewport: Viewport,
    /// Body scroll size, or `None` when the dialog is not mounted.
    pub body: Option<Size>,
}

/// Converts content sizes into dialog dimensions.
#[derive(Debug, Clone, Copy)]
pub struct DialogSizer {
    viewport_fraction: f32,
    chrome: Size,
    min: Size,
}

impl DialogSizer {
    pub fn new(config: &DialogConfig) -> Self {
        Self {
            viewport_fraction: config.viewport_fraction,
            chrome: config.chrome(),
            min: config.min_size(),
        }
    }

    /// Compute dimensions for the current layout.
    ///
    /// Returns `None` when the dialog is not mounted.
    pub fn compute(
        &self,
        source: SizingSource,
        measured: Size,
        layout: &LayoutSnapshot,
    ) -> Option<DialogDimensions> {
        let body = layout.body?;
        let _span = PerfSpan::new("compute_dialog_size");
        let max = layout.viewport.bounds(self.viewport_fraction);

        let (width, height) = match source {
            SizingSource::Measured => (
                (measured.width + self.chrome.width).max(self.min.width).min(max.width),
                (measured.height + self.chrome.height).max(self.min.height).min(max.height),
            ),
            SizingSource::LiveBody => (
                (body.width + self.chrome.width).min(max.width),
                (body.height + self.chrome.height).min(max.height),
            ),
        };

        let dimensions = DialogDimensions {
            width: width.max(self.min.width),
            height: height.max(self.min.height),
            max_height: max.height,
        };
        tracing::debug!(
            target: targets::SIZING,
            ?source,
            width = dimensions.width,
            height = dimensions.height,
            max_height = dimensions.max_height,
            "dialog size computed"
        );
        Some(dimensions)
    }
}
