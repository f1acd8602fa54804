//! The dialog request: everything the panel needs to render one dialog.
//!
//! A [`DialogRequest`] is immutable for the lifetime of a dialog instance.
//! It is usually parsed from the JSON document the test runner publishes
//! with [`DialogRequest::from_json`], or assembled with the `with_*`
//! builders in tests and embedders.
//!
//! # Example
//!
//! ```
//! use hardpy_panel::dialog_box::{DialogRequest, WidgetVariant};
//!
//! let request = DialogRequest::new("Fruit", "Pick one")
//!     .with_variant(WidgetVariant::RadioButton)
//!     .with_fields(["Apple", "Banana"])
//!     .with_visibility(true, "dialog-1");
//!
//! assert_eq!(request.fields(), ["Apple", "Banana"]);
//! ```

use serde::Deserialize;

use super::variant::WidgetVariant;
use crate::error::Result;

/// Font size used when the request does not carry one.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

// ============================================================================
// Visibility
// ============================================================================

/// Opaque identity of one "show this dialog" request.
///
/// The test runner issues a new token each time the dialog should
/// (re)open, even if the rest of the request is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VisibilityToken(String);

impl VisibilityToken {
    /// Create a token from any string-like identity.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VisibilityToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for VisibilityToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// The externally driven open trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VisibilitySignal {
    /// Whether the runner wants the dialog shown.
    pub is_visible: bool,
    /// Identity of this request.
    pub token: VisibilityToken,
}

impl VisibilitySignal {
    pub fn new(is_visible: bool, token: impl Into<VisibilityToken>) -> Self {
        Self {
            is_visible,
            token: token.into(),
        }
    }
}

// ============================================================================
// Embedded media
// ============================================================================

/// An inline base64 image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpec {
    /// Base64-encoded image bytes.
    pub base64_data: String,
    /// Width as a percentage of the available width.
    pub width_percent: f32,
    /// Border thickness in pixels.
    pub border_px: f32,
}

impl ImageSpec {
    pub fn new(base64_data: impl Into<String>) -> Self {
        Self {
            base64_data: base64_data.into(),
            width_percent: 100.0,
            border_px: 0.0,
        }
    }

    pub fn with_width_percent(mut self, width_percent: f32) -> Self {
        self.width_percent = width_percent;
        self
    }

    pub fn with_border(mut self, border_px: f32) -> Self {
        self.border_px = border_px;
        self
    }
}

/// An embedded document, given either as markup or as a URL to load.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlSpec {
    /// The markup itself, or the URL of the document.
    pub content: String,
    /// `true` when `content` is markup rather than a URL.
    pub is_raw_markup: bool,
    /// Width as a percentage of the available width.
    pub width_percent: f32,
    /// Border thickness in pixels.
    pub border_px: f32,
}

impl HtmlSpec {
    /// An embedded document given as markup.
    pub fn markup(code: impl Into<String>) -> Self {
        Self {
            content: code.into(),
            is_raw_markup: true,
            width_percent: 100.0,
            border_px: 0.0,
        }
    }

    /// An embedded document loaded from a URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            is_raw_markup: false,
            ..Self::markup(url)
        }
    }

    pub fn with_width_percent(mut self, width_percent: f32) -> Self {
        self.width_percent = width_percent;
        self
    }

    pub fn with_border(mut self, border_px: f32) -> Self {
        self.border_px = border_px;
        self
    }

    /// Whether the document finishes loading asynchronously.
    pub fn loads_asynchronously(&self) -> bool {
        !self.is_raw_markup
    }
}

// ============================================================================
// Steps and variant data
// ============================================================================

/// One tab of a Multistep dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub title: String,
    pub text: Option<String>,
    pub image: Option<ImageSpec>,
    pub html: Option<HtmlSpec>,
}

impl Step {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: None,
            image: None,
            html: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_image(mut self, image: ImageSpec) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_html(mut self, html: HtmlSpec) -> Self {
        self.html = Some(html);
        self
    }

    /// Text lines of the step, split on newlines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.as_deref().unwrap_or_default().split('\n')
    }

    /// Whether the step's size is known as soon as it is laid out.
    ///
    /// Images and URL documents finish loading later; markup documents
    /// are ignored here since they lay out synchronously.
    pub fn is_synchronous(&self) -> bool {
        self.image.is_none()
            && self
                .html
                .as_ref()
                .is_none_or(|html| !html.loads_asynchronously())
    }
}

/// Variant-specific payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VariantData {
    #[default]
    None,
    /// Option labels for RadioButton and Checkbox.
    Fields(Vec<String>),
    /// Ordered steps for Multistep.
    Steps(Vec<Step>),
}

// ============================================================================
// DialogRequest
// ============================================================================

/// A request to show a confirmation dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogRequest {
    pub title_bar: String,
    /// Body text; each newline starts a new paragraph.
    pub dialog_text: String,
    pub variant: WidgetVariant,
    pub variant_data: VariantData,
    /// Standalone image shown below the input.
    pub image: Option<ImageSpec>,
    /// Standalone document shown below the input.
    pub html: Option<HtmlSpec>,
    pub font_size: f32,
    pub visibility: VisibilitySignal,
}

impl Default for DialogRequest {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl DialogRequest {
    /// Create a Base dialog that is not yet visible.
    pub fn new(title_bar: impl Into<String>, dialog_text: impl Into<String>) -> Self {
        Self {
            title_bar: title_bar.into(),
            dialog_text: dialog_text.into(),
            variant: WidgetVariant::Base,
            variant_data: VariantData::None,
            image: None,
            html: None,
            font_size: DEFAULT_FONT_SIZE,
            visibility: VisibilitySignal::default(),
        }
    }

    /// Parse the JSON document published by the test runner.
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: WireRequest = serde_json::from_str(json)?;
        Ok(wire.into())
    }

    pub fn with_variant(mut self, variant: WidgetVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the option labels.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variant_data = VariantData::Fields(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.variant_data = VariantData::Steps(steps.into_iter().collect());
        self
    }

    pub fn with_image(mut self, image: ImageSpec) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_html(mut self, html: HtmlSpec) -> Self {
        self.html = Some(html);
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_visibility(mut self, is_visible: bool, token: impl Into<VisibilityToken>) -> Self {
        self.visibility = VisibilitySignal::new(is_visible, token);
        self
    }

    /// Option labels, empty unless the request carries fields.
    pub fn fields(&self) -> &[String] {
        match &self.variant_data {
            VariantData::Fields(fields) => fields,
            _ => &[],
        }
    }

    /// Steps, empty unless the request carries steps.
    pub fn steps(&self) -> &[Step] {
        match &self.variant_data {
            VariantData::Steps(steps) => steps,
            _ => &[],
        }
    }

    /// Body paragraphs, one per line of `dialog_text`.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.dialog_text.split('\n')
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct WireRequest {
    #[serde(default)]
    title_bar: String,
    #[serde(default)]
    dialog_text: String,
    #[serde(default)]
    widget_type: Option<WidgetVariant>,
    #[serde(default)]
    widget_info: Option<WireWidgetInfo>,
    #[serde(default)]
    image_base64: Option<String>,
    #[serde(default)]
    image_width: Option<f32>,
    #[serde(default)]
    image_border: Option<f32>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    html_code: Option<String>,
    #[serde(default)]
    html_width: Option<f32>,
    #[serde(default)]
    html_border: Option<f32>,
    #[serde(default)]
    font_size: Option<f32>,
    #[serde(default)]
    is_visible: Option<bool>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireWidgetInfo {
    #[serde(default)]
    fields: Option<Vec<String>>,
    #[serde(default)]
    steps: Option<Vec<WireStep>>,
}

#[derive(Deserialize)]
struct WireStep {
    info: WireStepInfo,
}

#[derive(Deserialize)]
struct WireStepInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image: Option<WireImage>,
    #[serde(default)]
    html: Option<WireHtml>,
}

#[derive(Deserialize)]
struct WireImage {
    #[serde(default)]
    base64: Option<String>,
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    border: Option<f32>,
}

#[derive(Deserialize)]
struct WireHtml {
    #[serde(default)]
    code_or_url: Option<String>,
    #[serde(default)]
    is_raw_html: Option<bool>,
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    border: Option<f32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<WireImage> for ImageSpec {
    fn from(wire: WireImage) -> Self {
        Self {
            base64_data: wire.base64.unwrap_or_default(),
            width_percent: wire.width.unwrap_or(100.0),
            border_px: wire.border.unwrap_or(0.0),
        }
    }
}

impl WireHtml {
    fn into_spec(self) -> Option<HtmlSpec> {
        let content = non_empty(self.code_or_url)?;
        Some(HtmlSpec {
            content,
            is_raw_markup: self.is_raw_html.unwrap_or(false),
            width_percent: self.width.unwrap_or(100.0),
            border_px: self.border.unwrap_or(0.0),
        })
    }
}

impl From<WireStep> for Step {
    fn from(wire: WireStep) -> Self {
        let info = wire.info;
        Self {
            title: info.title,
            text: info.text,
            image: info.image.map(ImageSpec::from),
            html: info.html.and_then(WireHtml::into_spec),
        }
    }
}

impl From<WireRequest> for DialogRequest {
    fn from(wire: WireRequest) -> Self {
        let variant = wire.widget_type.unwrap_or_default();
        let info = wire.widget_info.unwrap_or_default();
        let variant_data = match variant {
            WidgetVariant::RadioButton | WidgetVariant::Checkbox => {
                VariantData::Fields(info.fields.unwrap_or_default())
            }
            WidgetVariant::Multistep => VariantData::Steps(
                info.steps
                    .unwrap_or_default()
                    .into_iter()
                    .map(Step::from)
                    .collect(),
            ),
            _ => VariantData::None,
        };

        let image = non_empty(wire.image_base64).map(|data| ImageSpec {
            base64_data: data,
            width_percent: wire.image_width.unwrap_or(100.0),
            border_px: wire.image_border.unwrap_or(0.0),
        });

        // Markup wins when both a document and a URL are given.
        let html = non_empty(wire.html_code)
            .map(HtmlSpec::markup)
            .or_else(|| non_empty(wire.html_url).map(HtmlSpec::url))
            .map(|spec| HtmlSpec {
                width_percent: wire.html_width.unwrap_or(100.0),
                border_px: wire.html_border.unwrap_or(0.0),
                ..spec
            });

        Self {
            title_bar: wire.title_bar,
            dialog_text: wire.dialog_text,
            variant,
            variant_data,
            image,
            html,
            font_size: wire.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            visibility: VisibilitySignal::new(
                wire.is_visible.unwrap_or(false),
                wire.id.unwrap_or_default(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DialogError;

    #[test]
    fn test_parse_checkbox_request() {
        let request = DialogRequest::from_json(
            r#"{
                "title_bar": "Parts",
                "dialog_text": "Which parts are installed?\nCheck all that apply.",
                "widget_type": "checkbox",
                "widget_info": {"fields": ["Fan", "Heater"]},
                "is_visible": true,
                "id": "7f3a"
            }"#,
        )
        .unwrap();

        assert_eq!(request.variant, WidgetVariant::Checkbox);
        assert_eq!(request.fields(), ["Fan", "Heater"]);
        assert_eq!(request.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(request.visibility, VisibilitySignal::new(true, "7f3a"));
        assert_eq!(request.paragraphs().count(), 2);
    }

    #[test]
    fn test_parse_multistep_request() {
        let request = DialogRequest::from_json(
            r#"{
                "title_bar": "Wiring",
                "dialog_text": "Follow the steps",
                "widget_type": "multistep",
                "widget_info": {"steps": [
                    {"type": "step", "info": {"title": "One", "text": "Plug in\nPower on"}},
                    {"type": "step", "info": {"title": "Two", "image": {"base64": "AAAA", "width": 50}}},
                    {"type": "step", "info": {"title": "Three", "html": {"code_or_url": "http://docs/x", "is_raw_html": false}}}
                ]},
                "font_size": 16
            }"#,
        )
        .unwrap();

        let steps = request.steps();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].lines().collect::<Vec<_>>(), ["Plug in", "Power on"]);
        assert!(steps[0].is_synchronous());
        assert_eq!(steps[1].image.as_ref().unwrap().width_percent, 50.0);
        assert!(!steps[1].is_synchronous());
        assert!(!steps[2].is_synchronous());
        assert_eq!(request.font_size, 16.0);
        assert!(!request.visibility.is_visible);
    }

    #[test]
    fn test_standalone_media() {
        let request = DialogRequest::from_json(
            r#"{
                "title_bar": "t",
                "dialog_text": "d",
                "image_base64": "iVBOR",
                "image_border": 2,
                "html_url": "http://example.com",
                "html_width": 80
            }"#,
        )
        .unwrap();

        let image = request.image.unwrap();
        assert_eq!(image.border_px, 2.0);
        assert_eq!(image.width_percent, 100.0);
        let html = request.html.unwrap();
        assert!(!html.is_raw_markup);
        assert_eq!(html.width_percent, 80.0);
    }

    #[test]
    fn test_raw_markup_step_is_synchronous() {
        let step = Step::new("s").with_html(HtmlSpec::markup("<b>hi</b>"));
        assert!(step.is_synchronous());
    }

    #[test]
    fn test_unknown_widget_type_is_rejected() {
        let err = DialogRequest::from_json(r#"{"title_bar": "t", "widget_type": "slider"}"#)
            .unwrap_err();
        assert!(matches!(err, DialogError::InvalidRequest(_)));
    }

    #[test]
    fn test_fields_ignored_for_text_variants() {
        let request = DialogRequest::from_json(
            r#"{"title_bar": "t", "widget_type": "textinput", "widget_info": {"fields": ["a"]}}"#,
        )
        .unwrap();
        assert!(request.fields().is_empty());
        assert_eq!(request.variant_data, VariantData::None);
    }
}
