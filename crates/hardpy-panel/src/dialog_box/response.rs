//! Operator response state, validation and wire encoding.
//!
//! | Variant          | Valid when                               | Sent as                               |
//! |------------------|------------------------------------------|---------------------------------------|
//! | TextInput        | non-blank, not `.` or `..`               | [`encode_component`] of the text      |
//! | NumericInput     | same                                     | the raw text                          |
//! | RadioButton      | an option is selected                    | [`encode_component`] of the label     |
//! | Checkbox         | at least one option is selected          | JSON array of encoded labels          |
//! | Base / Multistep | always                                   | `ok`                                  |

use std::borrow::Cow;

use thiserror::Error;

use super::variant::WidgetVariant;

/// Answer sent for variants without operator input.
pub const PLAIN_CONFIRMATION: &str = "ok";

/// Operator input that cannot be submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing usable was entered or selected.
    #[error("The field must not be empty")]
    Empty,
}

/// Percent-encode a value for use as a single URL path segment.
///
/// Only ASCII alphanumerics and `-`, `_`, `.`, `~` stay literal; every
/// other byte of the UTF-8 encoding becomes `%XX` with uppercase hex.
///
/// The panel backend percent-decodes the path segment, so hex case and a
/// literal `~` decode to the same answer as `%2a` and `%7E` would.
pub fn encode_component(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// The answer being collected, shaped by the dialog's variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseState {
    /// Base and Multistep collect nothing.
    #[default]
    None,
    Text(String),
    Numeric(String),
    /// The selected radio label.
    Single(Option<String>),
    /// Checked labels in the order they were checked.
    Multi(Vec<String>),
}

impl ResponseState {
    /// The empty state for `variant`.
    pub fn empty_for(variant: WidgetVariant) -> Self {
        match variant {
            WidgetVariant::Base | WidgetVariant::Multistep => Self::None,
            WidgetVariant::TextInput => Self::Text(String::new()),
            WidgetVariant::NumericInput => Self::Numeric(String::new()),
            WidgetVariant::RadioButton => Self::Single(None),
            WidgetVariant::Checkbox => Self::Multi(Vec::new()),
        }
    }

    /// Replace the entered text. Returns `false` if this state has no text.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match self {
            Self::Text(current) | Self::Numeric(current) => {
                *current = text.into();
                true
            }
            _ => false,
        }
    }

    /// Select a radio option. Returns `true` if the selection changed.
    pub fn select(&mut self, label: &str) -> bool {
        match self {
            Self::Single(current) if current.as_deref() != Some(label) => {
                *current = Some(label.to_string());
                true
            }
            _ => false,
        }
    }

    /// Clear a radio selection. Returns `true` if something was selected.
    pub fn clear_selection(&mut self) -> bool {
        match self {
            Self::Single(current) => current.take().is_some(),
            _ => false,
        }
    }

    /// Check or uncheck a checkbox option. Returns `false` if this state
    /// has no check boxes.
    pub fn toggle(&mut self, label: &str) -> bool {
        match self {
            Self::Multi(selected) => {
                if let Some(pos) = selected.iter().position(|s| s == label) {
                    selected.remove(pos);
                } else {
                    selected.push(label.to_string());
                }
                true
            }
            _ => false,
        }
    }

    /// Whether `label` is currently selected or checked.
    pub fn is_selected(&self, label: &str) -> bool {
        match self {
            Self::Single(current) => current.as_deref() == Some(label),
            Self::Multi(selected) => selected.iter().any(|s| s == label),
            _ => false,
        }
    }

    /// Check that the state may be submitted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let ok = match self {
            Self::None => true,
            Self::Text(text) | Self::Numeric(text) => {
                !text.trim().is_empty() && text != "." && text != ".."
            }
            Self::Single(current) => current.is_some(),
            Self::Multi(selected) => !selected.is_empty(),
        };
        if ok { Ok(()) } else { Err(ValidationError::Empty) }
    }

    /// Validate and encode the state for the confirm endpoint.
    pub fn encode(&self) -> Result<String, ValidationError> {
        self.validate()?;
        let encoded = match self {
            Self::None => PLAIN_CONFIRMATION.to_string(),
            Self::Text(text) => encode_component(text).into_owned(),
            Self::Numeric(text) => text.clone(),
            Self::Single(label) => encode_component(label.as_deref().unwrap_or_default()).into_owned(),
            Self::Multi(selected) => {
                let labels: Vec<String> = selected
                    .iter()
                    .map(|label| encode_component(label).into_owned())
                    .collect();
                serde_json::Value::from(labels).to_string()
            }
        };
        Ok(encoded)
    }
}
