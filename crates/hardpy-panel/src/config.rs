//! Tunables for measurement, sizing and the backend connection.
//!
//! Every field has a default matching the panel's stock behavior, so an
//! empty TOML document is a valid configuration:
//!
//! ```toml
//! # panel.toml
//! tab_settle_ms = 150
//! media_load_timeout_ms = 10000
//!
//! [backend]
//! base_url = "http://192.168.0.5:8000"
//! ```
//!
//! ```ignore
//! let config = DialogConfig::load("panel.toml")?;
//! ```

use std::path::Path;
use std::time::Duration;

use hardpy_panel_core::Size;
use hardpy_panel_net::PanelApiConfig;
use serde::{Deserialize, Serialize};

use crate::error::{DialogError, Result};

/// Configuration for a dialog instance and its controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Width of the off-screen measurement container, so wrapped text
    /// measures realistically.
    pub reference_width: f32,
    /// Padding around each step panel in the measurement container.
    pub step_padding: f32,
    /// Fraction of the viewport the dialog may occupy.
    pub viewport_fraction: f32,
    /// Horizontal space taken by dialog chrome around the content.
    pub chrome_width: f32,
    /// Vertical space taken by the title bar, footer and body padding.
    pub chrome_height: f32,
    /// Minimum dialog width.
    pub min_width: f32,
    /// Minimum dialog height.
    pub min_height: f32,
    /// Delay before the first size computation after the dialog opens.
    pub open_settle_ms: u64,
    /// Delay before recomputing the size after a step tab switch.
    pub tab_settle_ms: u64,
    /// Delay after an embedded document fires `load` before it is measured.
    pub document_settle_ms: u64,
    /// Upper bound on a single media load during measurement.
    ///
    /// `None` waits forever, so a load event that never fires stalls the
    /// measurement pass.
    pub media_load_timeout_ms: Option<u64>,
    /// Backend connection.
    pub backend: PanelApiConfig,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            reference_width: 400.0,
            step_padding: 10.0,
            viewport_fraction: 0.9,
            chrome_width: 40.0,
            chrome_height: 100.0,
            min_width: 400.0,
            min_height: 300.0,
            open_settle_ms: 50,
            tab_settle_ms: 100,
            document_settle_ms: 300,
            media_load_timeout_ms: None,
            backend: PanelApiConfig::default(),
        }
    }
}

impl DialogConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DialogError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check that every value is usable for layout.
    pub fn validate(&self) -> Result<()> {
        if !(self.viewport_fraction > 0.0 && self.viewport_fraction <= 1.0) {
            return Err(DialogError::OutOfRange {
                field: "viewport_fraction",
                reason: "must be in (0, 1]",
            });
        }
        if self.reference_width <= 0.0 {
            return Err(DialogError::OutOfRange {
                field: "reference_width",
                reason: "must be positive",
            });
        }
        if self.min_width < 0.0 || self.min_height < 0.0 {
            return Err(DialogError::OutOfRange {
                field: "min_width/min_height",
                reason: "must not be negative",
            });
        }
        Ok(())
    }

    /// The dialog's minimum size constraint.
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    /// The chrome added around measured content.
    pub fn chrome(&self) -> Size {
        Size::new(self.chrome_width, self.chrome_height)
    }

    pub fn open_settle(&self) -> Duration {
        Duration::from_millis(self.open_settle_ms)
    }

    pub fn tab_settle(&self) -> Duration {
        Duration::from_millis(self.tab_settle_ms)
    }

    pub fn document_settle(&self) -> Duration {
        Duration::from_millis(self.document_settle_ms)
    }

    pub fn media_load_timeout(&self) -> Option<Duration> {
        self.media_load_timeout_ms.map(Duration::from_millis)
    }
}
