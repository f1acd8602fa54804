//! Keyboard dispatch for the dialog.
//!
//! `Enter` confirms in every variant and `Escape` dismisses. In RadioButton
//! and Checkbox dialogs a character key acts as a mnemonic: the first option
//! whose label starts with the typed text is selected (radio) or toggled
//! (checkbox). Labels are matched case-sensitively first; when none match,
//! a case-insensitive match is used, so `b` reaches `Banana`.

use super::variant::WidgetVariant;

/// A key, reduced to what the dialog reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// A printable character, as produced by the keyboard layout.
    Character(char),
    /// Any other key.
    Other,
}

/// Keyboard modifiers that may be held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Whether a command chord modifier (Ctrl, Alt or Meta) is held.
    ///
    /// Shift is not a chord modifier; it only changes the typed character.
    pub fn has_chord(&self) -> bool {
        self.control || self.alt || self.meta
    }
}

/// A key press delivered to the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: KeyboardModifiers,
    /// Whether this is an auto-repeat from a held key.
    pub is_repeat: bool,
}

impl KeyPress {
    /// A plain, non-repeating press of `key`.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyboardModifiers::NONE,
            is_repeat: false,
        }
    }

    /// A plain press of a character key.
    pub fn character(c: char) -> Self {
        Self::new(Key::Character(c))
    }

    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.is_repeat = true;
        self
    }
}

/// What a key press asks the dialog to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Attempt to confirm.
    Confirm,
    /// Close without confirming.
    Dismiss,
    /// Select the radio option at this index.
    Select(usize),
    /// Toggle the check box at this index.
    Toggle(usize),
    /// The key has no meaning for the dialog.
    Ignored,
}

/// Maps key presses to [`KeyAction`]s for one variant and option list.
#[derive(Debug, Clone, Copy)]
pub struct KeyboardRouter<'a> {
    variant: WidgetVariant,
    fields: &'a [String],
}

impl<'a> KeyboardRouter<'a> {
    pub fn new(variant: WidgetVariant, fields: &'a [String]) -> Self {
        Self { variant, fields }
    }

    /// Decide what `press` does.
    pub fn route(&self, press: &KeyPress) -> KeyAction {
        match press.key {
            Key::Enter if !press.is_repeat => KeyAction::Confirm,
            Key::Escape if !press.is_repeat => KeyAction::Dismiss,
            Key::Character(c) if self.variant.has_options() => {
                if press.is_repeat || press.modifiers.has_chord() {
                    return KeyAction::Ignored;
                }
                match self.mnemonic_match(c) {
                    Some(index) if self.variant == WidgetVariant::RadioButton => {
                        KeyAction::Select(index)
                    }
                    Some(index) => KeyAction::Toggle(index),
                    None => KeyAction::Ignored,
                }
            }
            _ => KeyAction::Ignored,
        }
    }

    /// Index of the first option whose label starts with `c`.
    pub fn mnemonic_match(&self, c: char) -> Option<usize> {
        let mut buf = [0u8; 4];
        let typed: &str = c.encode_utf8(&mut buf);

        self.fields
            .iter()
            .position(|label| label.starts_with(typed))
            .or_else(|| {
                let typed = typed.to_lowercase();
                self.fields
                    .iter()
                    .position(|label| label.to_lowercase().starts_with(&typed))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_enter_confirms_in_every_variant() {
        for variant in WidgetVariant::ALL {
            let router = KeyboardRouter::new(variant, &[]);
            assert_eq!(router.route(&KeyPress::new(Key::Enter)), KeyAction::Confirm);
        }
    }

    #[test]
    fn test_escape_dismisses() {
        let router = KeyboardRouter::new(WidgetVariant::TextInput, &[]);
        assert_eq!(router.route(&KeyPress::new(Key::Escape)), KeyAction::Dismiss);
    }

    #[test]
    fn test_mnemonic_lowercase_reaches_capitalized_label() {
        let labels = fields(&["Apple", "Banana"]);
        let radio = KeyboardRouter::new(WidgetVariant::RadioButton, &labels);
        assert_eq!(radio.route(&KeyPress::character('b')), KeyAction::Select(1));

        let check = KeyboardRouter::new(WidgetVariant::Checkbox, &labels);
        assert_eq!(check.route(&KeyPress::character('b')), KeyAction::Toggle(1));
    }

    #[test]
    fn test_case_sensitive_match_preferred() {
        let labels = fields(&["apple", "Avocado"]);
        let router = KeyboardRouter::new(WidgetVariant::RadioButton, &labels);
        assert_eq!(router.route(&KeyPress::character('A')), KeyAction::Select(1));
        assert_eq!(router.route(&KeyPress::character('a')), KeyAction::Select(0));
    }

    #[test]
    fn test_first_match_wins() {
        let labels = fields(&["Cable A", "Cable B"]);
        let router = KeyboardRouter::new(WidgetVariant::Checkbox, &labels);
        assert_eq!(router.route(&KeyPress::character('C')), KeyAction::Toggle(0));
    }

    #[test]
    fn test_no_match_is_ignored() {
        let labels = fields(&["Apple", "Banana"]);
        let router = KeyboardRouter::new(WidgetVariant::RadioButton, &labels);
        assert_eq!(router.route(&KeyPress::character('z')), KeyAction::Ignored);
    }

    #[test]
    fn test_repeat_and_chords_are_ignored() {
        let labels = fields(&["Apple"]);
        let router = KeyboardRouter::new(WidgetVariant::Checkbox, &labels);
        assert_eq!(
            router.route(&KeyPress::character('a').repeated()),
            KeyAction::Ignored
        );
        assert_eq!(
            router.route(&KeyPress::character('a').with_modifiers(KeyboardModifiers::CTRL)),
            KeyAction::Ignored
        );
        let shifted = KeyboardModifiers {
            shift: true,
            ..KeyboardModifiers::NONE
        };
        assert_eq!(
            router.route(&KeyPress::character('A').with_modifiers(shifted)),
            KeyAction::Toggle(0)
        );
    }

    #[test]
    fn test_characters_ignored_without_options() {
        let router = KeyboardRouter::new(WidgetVariant::TextInput, &[]);
        assert_eq!(router.route(&KeyPress::character('a')), KeyAction::Ignored);
    }
}
