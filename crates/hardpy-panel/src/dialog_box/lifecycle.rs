//! The dialog state machine.
//!
//! [`DialogBox`] holds everything that survives between events: the current
//! request, the open/closed state, the operator's response and the sizing
//! inputs. [`DialogBox::update`] applies one [`DialogEvent`] and returns the
//! [`DialogEffect`]s the driver has to carry out. It never sleeps, performs
//! I/O or calls back into the embedder, so every transition can be tested
//! without a runtime.
//!
//! # Lifecycle
//!
//! ```text
//!   Closed ──visibility (is_visible, new token)──▶ Open
//!   Open ──confirm (valid)──▶ Closed     [Submit]
//!   Open ──close──────────▶ Closed       [StopTests, Notify]
//!   Open ──visibility (new token)──▶ Open (reset)
//! ```

use std::sync::Arc;
use std::time::Duration;

use hardpy_panel_core::Size;
use hardpy_panel_core::logging::targets;

use super::keyboard::{KeyAction, KeyPress, KeyboardRouter};
use super::request::{DialogRequest, Step, VisibilitySignal};
use super::response::{ResponseState, ValidationError};
use super::sizing::{DialogDimensions, DialogSizer, LayoutSnapshot, SizingSource};
use super::variant::WidgetVariant;
use crate::config::DialogConfig;
use crate::feedback::Notice;

// ============================================================================
// States, events and effects
// ============================================================================

/// Whether the dialog is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Closed,
    Open,
}

/// Why the dialog closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// A valid response was confirmed.
    Confirmed,
    /// The operator closed the dialog without confirming.
    Dismissed,
}

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    /// A new request replaces the current one.
    RequestChanged(DialogRequest),
    /// The runner's visibility signal was observed.
    Visibility(VisibilitySignal),
    /// The text or numeric field was edited.
    TextEdited(String),
    /// The radio option at this index was clicked.
    OptionSelected(usize),
    /// The radio selection was cleared.
    SelectionCleared,
    /// The check box at this index was clicked.
    OptionToggled(usize),
    KeyPressed(KeyPress),
    /// A Multistep tab was activated.
    TabSwitched(usize),
    /// The host viewport changed size.
    ViewportResized,
    /// A scheduled size recomputation sampled the layout.
    Layout(LayoutSnapshot),
    /// A measurement pass finished.
    MeasurementFinished { generation: u64, size: Size },
    /// The confirm button was pressed.
    ConfirmRequested,
    /// The close affordance was used.
    CloseRequested,
}

/// Work for the driver, in the order it must happen.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEffect {
    /// Sample the layout after `delay` and feed it back as [`DialogEvent::Layout`].
    ScheduleSizing { delay: Duration },
    /// Measure `steps` off-screen, cancelling any older pass.
    StartMeasurement { generation: u64, steps: Arc<[Step]> },
    /// Cancel the running measurement pass, if any.
    CancelMeasurement,
    /// Show a blocking alert.
    Alert(ValidationError),
    /// Send the encoded answer to the backend.
    Submit(String),
    /// Ask the backend to stop the running tests.
    StopTests,
    /// Show a notification to the operator.
    Notify(Notice),
    Opened,
    /// A valid answer was confirmed; observers see it before the backend does.
    Confirmed(String),
    Closed(CloseReason),
    DimensionsChanged(DialogDimensions),
    ResponseChanged(ResponseState),
}

// ============================================================================
// DialogBox
// ============================================================================

/// The confirmation dialog as a pure state machine.
#[derive(Debug, Clone)]
pub struct DialogBox {
    request: DialogRequest,
    state: LifecycleState,
    last_visibility: Option<VisibilitySignal>,
    response: ResponseState,
    current_step: usize,
    source: SizingSource,
    measured: Size,
    generation: u64,
    dimensions: Option<DialogDimensions>,
    sizer: DialogSizer,
    open_settle: Duration,
    tab_settle: Duration,
}

impl DialogBox {
    /// Create a closed Base dialog with an empty request.
    pub fn new(config: &DialogConfig) -> Self {
        Self {
            request: DialogRequest::default(),
            state: LifecycleState::Closed,
            last_visibility: None,
            response: ResponseState::None,
            current_step: 0,
            source: SizingSource::LiveBody,
            measured: Size::ZERO,
            generation: 0,
            dimensions: None,
            sizer: DialogSizer::new(config),
            open_settle: config.open_settle(),
            tab_settle: config.tab_settle(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn request(&self) -> &DialogRequest {
        &self.request
    }

    pub fn variant(&self) -> WidgetVariant {
        self.request.variant
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == LifecycleState::Open
    }

    pub fn response(&self) -> &ResponseState {
        &self.response
    }

    /// Index of the visible Multistep tab.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn sizing_source(&self) -> SizingSource {
        self.source
    }

    /// Result of the last completed measurement pass.
    pub fn measured_size(&self) -> Size {
        self.measured
    }

    /// Generation of the current request; bumped on every request change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The last computed dimensions, if any.
    pub fn dimensions(&self) -> Option<DialogDimensions> {
        self.dimensions
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Apply one event.
    pub fn update(&mut self, event: DialogEvent) -> Vec<DialogEffect> {
        let mut effects = Vec::new();
        match event {
            DialogEvent::RequestChanged(request) => self.load_request(request, &mut effects),
            DialogEvent::Visibility(signal) => self.observe_visibility(signal, &mut effects),
            DialogEvent::TextEdited(text) => {
                if self.response.set_text(text) {
                    effects.push(DialogEffect::ResponseChanged(self.response.clone()));
                }
            }
            DialogEvent::OptionSelected(index) => self.select_option(index, &mut effects),
            DialogEvent::SelectionCleared => {
                if self.response.clear_selection() {
                    effects.push(DialogEffect::ResponseChanged(self.response.clone()));
                }
            }
            DialogEvent::OptionToggled(index) => self.toggle_option(index, &mut effects),
            DialogEvent::KeyPressed(press) => self.handle_key(&press, &mut effects),
            DialogEvent::TabSwitched(index) => self.switch_tab(index, &mut effects),
            DialogEvent::ViewportResized => {
                if self.is_open() {
                    effects.push(DialogEffect::ScheduleSizing {
                        delay: Duration::ZERO,
                    });
                }
            }
            DialogEvent::Layout(snapshot) => self.apply_layout(&snapshot, &mut effects),
            DialogEvent::MeasurementFinished { generation, size } => {
                self.finish_measurement(generation, size, &mut effects)
            }
            DialogEvent::ConfirmRequested => self.confirm(&mut effects),
            DialogEvent::CloseRequested => self.close(&mut effects),
        }
        effects
    }

    fn load_request(&mut self, request: DialogRequest, effects: &mut Vec<DialogEffect>) {
        // The runner republishes unchanged state; only visibility can differ then.
        if request == self.request {
            tracing::trace!(target: targets::DIALOG, "dialog request unchanged");
            self.observe_visibility(request.visibility, effects);
            return;
        }

        self.generation += 1;
        self.measured = Size::ZERO;
        self.response = ResponseState::empty_for(request.variant);
        self.current_step = 0;
        self.source = initial_source(request.variant);
        let visibility = request.visibility.clone();

        tracing::debug!(
            target: targets::DIALOG,
            variant = %request.variant,
            generation = self.generation,
            "dialog request loaded"
        );

        if request.variant == WidgetVariant::Multistep {
            effects.push(DialogEffect::StartMeasurement {
                generation: self.generation,
                steps: request.steps().into(),
            });
        } else {
            effects.push(DialogEffect::CancelMeasurement);
        }
        self.request = request;
        self.observe_visibility(visibility, effects);
        if self.is_open() && !effects.contains(&DialogEffect::Opened) {
            effects.push(DialogEffect::ResponseChanged(self.response.clone()));
        }
    }

    fn observe_visibility(&mut self, signal: VisibilitySignal, effects: &mut Vec<DialogEffect>) {
        if self.last_visibility.as_ref() == Some(&signal) {
            return;
        }
        let is_visible = signal.is_visible;
        self.last_visibility = Some(signal);
        if is_visible {
            self.open(effects);
        }
    }

    fn open(&mut self, effects: &mut Vec<DialogEffect>) {
        let reopened = self.is_open();
        self.state = LifecycleState::Open;
        self.response = ResponseState::empty_for(self.variant());
        self.current_step = 0;
        self.source = initial_source(self.variant());

        tracing::info!(
            target: targets::DIALOG,
            title = %self.request.title_bar,
            variant = %self.variant(),
            reopened,
            "dialog opened"
        );

        effects.push(DialogEffect::ResponseChanged(self.response.clone()));
        effects.push(DialogEffect::Opened);
        effects.push(DialogEffect::ScheduleSizing {
            delay: self.open_settle,
        });
    }

    fn select_option(&mut self, index: usize, effects: &mut Vec<DialogEffect>) {
        let Some(label) = self.request.fields().get(index) else {
            return;
        };
        if self.response.select(label) {
            effects.push(DialogEffect::ResponseChanged(self.response.clone()));
        }
    }

    fn toggle_option(&mut self, index: usize, effects: &mut Vec<DialogEffect>) {
        let Some(label) = self.request.fields().get(index) else {
            return;
        };
        if self.response.toggle(label) {
            effects.push(DialogEffect::ResponseChanged(self.response.clone()));
        }
    }

    fn handle_key(&mut self, press: &KeyPress, effects: &mut Vec<DialogEffect>) {
        if !self.is_open() {
            return;
        }
        let action = KeyboardRouter::new(self.variant(), self.request.fields()).route(press);
        tracing::trace!(target: targets::DIALOG, ?press, ?action, "key routed");
        match action {
            KeyAction::Confirm => self.confirm(effects),
            KeyAction::Dismiss => self.close(effects),
            KeyAction::Select(index) => self.select_option(index, effects),
            KeyAction::Toggle(index) => self.toggle_option(index, effects),
            KeyAction::Ignored => {}
        }
    }

    fn switch_tab(&mut self, index: usize, effects: &mut Vec<DialogEffect>) {
        if self.variant() != WidgetVariant::Multistep || !self.is_open() {
            return;
        }
        if index >= self.request.steps().len() {
            return;
        }
        self.current_step = index;
        self.source = SizingSource::LiveBody;
        effects.push(DialogEffect::ScheduleSizing {
            delay: self.tab_settle,
        });
    }

    fn apply_layout(&mut self, snapshot: &LayoutSnapshot, effects: &mut Vec<DialogEffect>) {
        if !self.is_open() {
            return;
        }
        let Some(dimensions) = self.sizer.compute(self.source, self.measured, snapshot) else {
            tracing::trace!(target: targets::SIZING, "dialog not mounted, skipping resize");
            return;
        };
        if self.dimensions != Some(dimensions) {
            self.dimensions = Some(dimensions);
            effects.push(DialogEffect::DimensionsChanged(dimensions));
        }
    }

    fn finish_measurement(&mut self, generation: u64, size: Size, effects: &mut Vec<DialogEffect>) {
        if generation != self.generation {
            tracing::debug!(
                target: targets::MEASURE,
                generation,
                current = self.generation,
                "discarding stale measurement"
            );
            return;
        }
        self.measured = size;
        if self.is_open() && self.source == SizingSource::Measured {
            effects.push(DialogEffect::ScheduleSizing {
                delay: Duration::ZERO,
            });
        }
    }

    fn confirm(&mut self, effects: &mut Vec<DialogEffect>) {
        if !self.is_open() {
            return;
        }
        match self.response.encode() {
            Ok(encoded) => {
                self.state = LifecycleState::Closed;
                tracing::info!(target: targets::DIALOG, answer = %encoded, "dialog confirmed");
                effects.push(DialogEffect::Confirmed(encoded.clone()));
                effects.push(DialogEffect::Closed(CloseReason::Confirmed));
                effects.push(DialogEffect::Submit(encoded));
            }
            Err(err) => {
                tracing::debug!(target: targets::DIALOG, variant = %self.variant(), "confirm blocked: {err}");
                effects.push(DialogEffect::Alert(err));
            }
        }
    }

    fn close(&mut self, effects: &mut Vec<DialogEffect>) {
        if !self.is_open() {
            return;
        }
        self.state = LifecycleState::Closed;
        tracing::info!(target: targets::DIALOG, "dialog closed without confirmation");
        effects.push(DialogEffect::Closed(CloseReason::Dismissed));
        effects.push(DialogEffect::StopTests);
        effects.push(DialogEffect::Notify(Notice::tests_stopped()));
    }
}

fn initial_source(variant: WidgetVariant) -> SizingSource {
    if variant.is_premeasured() {
        SizingSource::Measured
    } else {
        SizingSource::LiveBody
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog_box::keyboard::Key;
    use crate::dialog_box::request::ImageSpec;
    use hardpy_panel_core::Viewport;

    fn setup(request: DialogRequest) -> (DialogBox, Vec<DialogEffect>) {
        let mut dialog = DialogBox::new(&DialogConfig::default());
        let effects = dialog.update(DialogEvent::RequestChanged(request));
        (dialog, effects)
    }

    fn radio() -> DialogRequest {
        DialogRequest::new("Fruit", "Pick one")
            .with_variant(WidgetVariant::RadioButton)
            .with_fields(["Apple", "Banana"])
            .with_visibility(true, "1")
    }

    fn layout(body: (f32, f32)) -> DialogEvent {
        DialogEvent::Layout(LayoutSnapshot {
            viewport: Viewport::new(1000.0, 1000.0),
            body: Some(body.into()),
        })
    }

    #[test]
    fn test_visible_request_opens_and_schedules_sizing() {
        let (dialog, effects) = setup(radio());
        assert!(dialog.is_open());
        assert!(effects.contains(&DialogEffect::Opened));
        assert!(effects.contains(&DialogEffect::ScheduleSizing {
            delay: Duration::from_millis(50)
        }));
        assert_eq!(dialog.response(), &ResponseState::Single(None));
    }

    #[test]
    fn test_hidden_request_stays_closed() {
        let (dialog, effects) = setup(radio().with_visibility(false, "1"));
        assert!(!dialog.is_open());
        assert!(!effects.contains(&DialogEffect::Opened));
    }

    #[test]
    fn test_same_signal_does_not_reopen() {
        let (mut dialog, _) = setup(radio());
        dialog.update(DialogEvent::CloseRequested);

        let effects = dialog.update(DialogEvent::Visibility(VisibilitySignal::new(true, "1")));
        assert!(effects.is_empty());
        assert!(!dialog.is_open());

        let effects = dialog.update(DialogEvent::Visibility(VisibilitySignal::new(true, "2")));
        assert!(effects.contains(&DialogEffect::Opened));
        assert!(dialog.is_open());
    }

    #[test]
    fn test_new_token_while_open_resets_response() {
        let (mut dialog, _) = setup(radio());
        dialog.update(DialogEvent::OptionSelected(1));
        assert!(dialog.response().is_selected("Banana"));

        let effects = dialog.update(DialogEvent::Visibility(VisibilitySignal::new(true, "2")));
        assert_eq!(dialog.response(), &ResponseState::Single(None));
        assert_eq!(
            effects.first(),
            Some(&DialogEffect::ResponseChanged(ResponseState::Single(None)))
        );
    }

    #[test]
    fn test_mnemonic_key_selects_option() {
        let (mut dialog, _) = setup(radio());
        dialog.update(DialogEvent::KeyPressed(KeyPress::character('b')));
        assert!(dialog.response().is_selected("Banana"));

        let effects = dialog.update(DialogEvent::KeyPressed(KeyPress::character('q')));
        assert!(effects.is_empty());
        assert!(dialog.response().is_selected("Banana"));
    }

    #[test]
    fn test_invalid_confirm_alerts_and_stays_open() {
        let (mut dialog, _) = setup(radio());
        let effects = dialog.update(DialogEvent::KeyPressed(KeyPress::new(Key::Enter)));
        assert_eq!(effects, vec![DialogEffect::Alert(ValidationError::Empty)]);
        assert!(dialog.is_open());
    }

    #[test]
    fn test_confirm_submits_without_stop() {
        let (mut dialog, _) = setup(radio());
        dialog.update(DialogEvent::OptionSelected(0));
        let effects = dialog.update(DialogEvent::ConfirmRequested);

        assert_eq!(
            effects,
            vec![
                DialogEffect::Confirmed("Apple".into()),
                DialogEffect::Closed(CloseReason::Confirmed),
                DialogEffect::Submit("Apple".into()),
            ]
        );
        assert!(!dialog.is_open());
        assert!(dialog.update(DialogEvent::CloseRequested).is_empty());
    }

    #[test]
    fn test_close_stops_tests_once() {
        let (mut dialog, _) = setup(radio());
        let effects = dialog.update(DialogEvent::CloseRequested);
        assert_eq!(
            effects,
            vec![
                DialogEffect::Closed(CloseReason::Dismissed),
                DialogEffect::StopTests,
                DialogEffect::Notify(Notice::tests_stopped()),
            ]
        );
        assert!(dialog.update(DialogEvent::CloseRequested).is_empty());
    }

    #[test]
    fn test_escape_dismisses() {
        let (mut dialog, _) = setup(radio());
        let effects = dialog.update(DialogEvent::KeyPressed(KeyPress::new(Key::Escape)));
        assert!(effects.contains(&DialogEffect::StopTests));
    }

    #[test]
    fn test_layout_when_closed_is_noop() {
        let (mut dialog, _) = setup(radio().with_visibility(false, "1"));
        assert!(dialog.update(layout((100.0, 100.0))).is_empty());
        assert_eq!(dialog.dimensions(), None);
    }

    #[test]
    fn test_layout_emits_only_on_change() {
        let (mut dialog, _) = setup(radio());
        let effects = dialog.update(layout((500.0, 400.0)));
        assert_eq!(effects.len(), 1);
        assert!(dialog.update(layout((500.0, 400.0))).is_empty());
    }

    fn multistep() -> DialogRequest {
        DialogRequest::new("Steps", "Follow")
            .with_variant(WidgetVariant::Multistep)
            .with_steps([
                Step::new("one").with_text("a"),
                Step::new("two").with_image(ImageSpec::new("AAAA")),
            ])
            .with_visibility(true, "1")
    }

    #[test]
    fn test_multistep_starts_measurement() {
        let (dialog, effects) = setup(multistep());
        let Some(DialogEffect::StartMeasurement { generation, steps }) = effects.first() else {
            panic!("expected a measurement, got {effects:?}");
        };
        assert_eq!(*generation, dialog.generation());
        assert_eq!(steps.len(), 2);
        assert_eq!(dialog.sizing_source(), SizingSource::Measured);
    }

    #[test]
    fn test_stale_measurement_is_discarded() {
        let (mut dialog, _) = setup(multistep());
        let stale = dialog.generation();
        dialog.update(DialogEvent::RequestChanged(multistep().with_visibility(true, "2")));

        let effects = dialog.update(DialogEvent::MeasurementFinished {
            generation: stale,
            size: Size::new(800.0, 800.0),
        });
        assert!(effects.is_empty());
        assert_eq!(dialog.measured_size(), Size::ZERO);
    }

    #[test]
    fn test_redelivered_request_keeps_typed_text() {
        let request = DialogRequest::new("Serial", "Enter the serial number")
            .with_variant(WidgetVariant::TextInput)
            .with_visibility(true, "1");
        let (mut dialog, _) = setup(request.clone());
        dialog.update(DialogEvent::TextEdited("SN-42".to_string()));
        let generation = dialog.generation();

        let effects = dialog.update(DialogEvent::RequestChanged(request));
        assert!(effects.is_empty());
        assert!(dialog.is_open());
        assert_eq!(dialog.generation(), generation);
        assert_eq!(dialog.response(), &ResponseState::Text("SN-42".to_string()));
    }

    #[test]
    fn test_redelivered_multistep_keeps_measurement() {
        let (mut dialog, _) = setup(multistep());
        dialog.update(DialogEvent::MeasurementFinished {
            generation: dialog.generation(),
            size: Size::new(800.0, 600.0),
        });

        let effects = dialog.update(DialogEvent::RequestChanged(multistep()));
        assert!(effects.is_empty());
        assert_eq!(dialog.measured_size(), Size::new(800.0, 600.0));
    }

    #[test]
    fn test_same_content_with_new_token_resets() {
        let request = DialogRequest::new("Serial", "Enter the serial number")
            .with_variant(WidgetVariant::TextInput)
            .with_visibility(true, "1");
        let (mut dialog, _) = setup(request.clone());
        dialog.update(DialogEvent::TextEdited("SN-42".to_string()));

        let effects = dialog.update(DialogEvent::RequestChanged(request.with_visibility(true, "2")));
        assert!(effects.contains(&DialogEffect::Opened));
        assert_eq!(dialog.response(), &ResponseState::Text(String::new()));
    }

    #[test]
    fn test_measurement_while_open_resizes_immediately() {
        let (mut dialog, _) = setup(multistep());
        let effects = dialog.update(DialogEvent::MeasurementFinished {
            generation: dialog.generation(),
            size: Size::new(600.0, 500.0),
        });
        assert_eq!(
            effects,
            vec![DialogEffect::ScheduleSizing {
                delay: Duration::ZERO
            }]
        );

        dialog.update(layout((10.0, 10.0)));
        let dims = dialog.dimensions().unwrap();
        assert_eq!((dims.width, dims.height), (640.0, 600.0));
    }

    #[test]
    fn test_tab_switch_uses_live_body() {
        let (mut dialog, _) = setup(multistep());
        let effects = dialog.update(DialogEvent::TabSwitched(1));
        assert_eq!(
            effects,
            vec![DialogEffect::ScheduleSizing {
                delay: Duration::from_millis(100)
            }]
        );
        assert_eq!(dialog.current_step(), 1);
        assert_eq!(dialog.sizing_source(), SizingSource::LiveBody);

        dialog.update(DialogEvent::Visibility(VisibilitySignal::new(true, "2")));
        assert_eq!(dialog.current_step(), 0);
        assert_eq!(dialog.sizing_source(), SizingSource::Measured);
    }

    #[test]
    fn test_tab_switch_ignored_for_other_variants() {
        let (mut dialog, _) = setup(radio());
        assert!(dialog.update(DialogEvent::TabSwitched(1)).is_empty());
    }

    #[test]
    fn test_resize_only_while_open() {
        let (mut dialog, _) = setup(radio());
        assert_eq!(
            dialog.update(DialogEvent::ViewportResized),
            vec![DialogEffect::ScheduleSizing {
                delay: Duration::ZERO
            }]
        );
        dialog.update(DialogEvent::CloseRequested);
        assert!(dialog.update(DialogEvent::ViewportResized).is_empty());
    }
}
