//! Widget variant classification.
//!
//! A dialog carries exactly one [`WidgetVariant`]. The variant decides which
//! input affordance the embedder renders, which element receives focus on
//! mount, and which validation and encoding rule applies on confirm.

use serde::{Deserialize, Serialize};

/// Placeholder shown in empty text and numeric fields.
pub const INPUT_PLACEHOLDER: &str = "enter answer";

/// The interaction mode of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetVariant {
    /// No input; confirm always succeeds.
    #[default]
    Base,
    /// Free text input.
    TextInput,
    /// Numeric input; the raw text is sent unencoded.
    NumericInput,
    /// Exactly one option out of a list.
    RadioButton,
    /// Any non-empty subset of a list.
    Checkbox,
    /// A tabbed sequence of instruction steps.
    Multistep,
}

/// What the embedder renders between the body text and the confirm button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAffordance {
    /// Nothing to fill in.
    None,
    /// A single-line field.
    TextField {
        /// Render as a number input.
        numeric: bool,
        /// Placeholder text.
        placeholder: &'static str,
    },
    /// A group of mutually exclusive options.
    RadioGroup,
    /// A group of independent check boxes.
    CheckGroup,
    /// A tab bar with one panel per step.
    StepTabs,
}

/// The element that receives keyboard focus when the dialog mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialFocus {
    /// The text or numeric field.
    InputField,
    /// The first option of a radio or check group.
    FirstOption,
    /// The confirm button.
    ConfirmButton,
}

impl WidgetVariant {
    /// All variants, in declaration order.
    pub const ALL: [WidgetVariant; 6] = [
        WidgetVariant::Base,
        WidgetVariant::TextInput,
        WidgetVariant::NumericInput,
        WidgetVariant::RadioButton,
        WidgetVariant::Checkbox,
        WidgetVariant::Multistep,
    ];

    /// The input affordance for this variant.
    pub fn affordance(self) -> InputAffordance {
        match self {
            Self::Base => InputAffordance::None,
            Self::TextInput => InputAffordance::TextField {
                numeric: false,
                placeholder: INPUT_PLACEHOLDER,
            },
            Self::NumericInput => InputAffordance::TextField {
                numeric: true,
                placeholder: INPUT_PLACEHOLDER,
            },
            Self::RadioButton => InputAffordance::RadioGroup,
            Self::Checkbox => InputAffordance::CheckGroup,
            Self::Multistep => InputAffordance::StepTabs,
        }
    }

    /// The element focused on mount.
    pub fn initial_focus(self) -> InitialFocus {
        match self {
            Self::TextInput | Self::NumericInput => InitialFocus::InputField,
            Self::RadioButton | Self::Checkbox => InitialFocus::FirstOption,
            Self::Base | Self::Multistep => InitialFocus::ConfirmButton,
        }
    }

    /// Whether the variant presents a list of labelled options.
    pub fn has_options(self) -> bool {
        matches!(self, Self::RadioButton | Self::Checkbox)
    }

    /// Whether the dialog size comes from off-screen measurement.
    pub fn is_premeasured(self) -> bool {
        matches!(self, Self::Multistep)
    }

    /// Whether confirming requires operator input.
    pub fn requires_input(self) -> bool {
        !matches!(self, Self::Base | Self::Multistep)
    }
}

impl std::fmt::Display for WidgetVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Base => "base",
            Self::TextInput => "textinput",
            Self::NumericInput => "numericinput",
            Self::RadioButton => "radiobutton",
            Self::Checkbox => "checkbox",
            Self::Multistep => "multistep",
        };
        f.write_str(name)
    }
}
