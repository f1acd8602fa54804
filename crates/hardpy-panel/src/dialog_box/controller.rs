//! Runs a [`DialogBox`] against real capabilities.
//!
//! [`DialogController`] feeds embedder input into the state machine and
//! carries out the resulting effects: settle timers and measurement passes
//! run on the tokio runtime the controller was built in, backend calls are
//! spawned and only logged, and observers are notified through signals.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hardpy_panel::prelude::*;
//!
//! let controller = DialogController::builder(surface, Arc::new(Viewport::new(1280.0, 800.0)))
//!     .config(DialogConfig::load("panel.toml")?)
//!     .build()?;
//!
//! controller.confirmed().connect(|answer| println!("operator answered {answer}"));
//! controller.set_request(DialogRequest::from_json(&json)?);
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use hardpy_panel_core::Signal;
use hardpy_panel_core::logging::targets;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::Instrument;

use super::keyboard::KeyPress;
use super::lifecycle::{CloseReason, DialogBox, DialogEffect, DialogEvent};
use super::measure::{ContentMeasurer, MeasurementHandle};
use super::request::{DialogRequest, Step, VisibilitySignal};
use super::response::ResponseState;
use super::sizing::{DialogDimensions, LayoutSnapshot};
use super::surface::{MeasurementSurface, ViewportProvider};
use super::variant::WidgetVariant;
use crate::backend::PanelBackend;
use crate::config::DialogConfig;
use crate::error::Result;
use crate::feedback::OperatorFeedback;

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`DialogController`].
pub struct DialogControllerBuilder {
    config: DialogConfig,
    surface: Arc<dyn MeasurementSurface>,
    viewport: Arc<dyn ViewportProvider>,
    backend: Option<Arc<dyn PanelBackend>>,
    feedback: Option<Arc<dyn OperatorFeedback>>,
}

impl DialogControllerBuilder {
    /// Use `config` instead of the defaults.
    pub fn config(mut self, config: DialogConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom backend instead of the HTTP client built from the config.
    pub fn backend(mut self, backend: Arc<dyn PanelBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Route alerts and notifications to `feedback`.
    pub fn feedback(mut self, feedback: Arc<dyn OperatorFeedback>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// Build the controller.
    ///
    /// Must be called from within a tokio runtime; timers and backend calls
    /// are spawned onto it.
    pub fn build(self) -> Result<DialogController> {
        self.config.validate()?;
        let runtime = Handle::try_current()?;

        let backend = match self.backend {
            Some(backend) => backend,
            None => Arc::new(hardpy_panel_net::PanelApiClient::new(self.config.backend.clone())?),
        };
        let feedback = self.feedback.unwrap_or_else(default_feedback);

        let inner = Arc::new(Inner {
            dialog: Mutex::new(DialogBox::new(&self.config)),
            measurer: ContentMeasurer::new(&self.config),
            surface: self.surface,
            viewport: self.viewport,
            backend,
            feedback,
            measurement: Mutex::new(None),
            runtime,
            opened: Signal::new(),
            confirmed: Signal::new(),
            closed: Signal::new(),
            dimensions_changed: Signal::new(),
            response_changed: Signal::new(),
        });
        Ok(DialogController { inner })
    }
}

#[cfg(feature = "notifications")]
fn default_feedback() -> Arc<dyn OperatorFeedback> {
    Arc::new(crate::feedback::DesktopFeedback::new())
}

#[cfg(not(feature = "notifications"))]
fn default_feedback() -> Arc<dyn OperatorFeedback> {
    Arc::new(crate::feedback::LogFeedback)
}

// ============================================================================
// DialogController
// ============================================================================

/// Drives one confirmation dialog.
///
/// Cloning yields another handle to the same dialog.
#[derive(Clone)]
pub struct DialogController {
    inner: Arc<Inner>,
}

struct Inner {
    dialog: Mutex<DialogBox>,
    measurer: ContentMeasurer,
    surface: Arc<dyn MeasurementSurface>,
    viewport: Arc<dyn ViewportProvider>,
    backend: Arc<dyn PanelBackend>,
    feedback: Arc<dyn OperatorFeedback>,
    measurement: Mutex<Option<MeasurementHandle>>,
    runtime: Handle,

    opened: Signal<()>,
    confirmed: Signal<String>,
    closed: Signal<CloseReason>,
    dimensions_changed: Signal<DialogDimensions>,
    response_changed: Signal<ResponseState>,
}

impl DialogController {
    /// Start building a controller for the given layout capabilities.
    pub fn builder(
        surface: Arc<dyn MeasurementSurface>,
        viewport: Arc<dyn ViewportProvider>,
    ) -> DialogControllerBuilder {
        DialogControllerBuilder {
            config: DialogConfig::default(),
            surface,
            viewport,
            backend: None,
            feedback: None,
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Apply an event and carry out its effects.
    pub fn dispatch(&self, event: DialogEvent) {
        self.inner.dispatch(event);
    }

    /// Replace the dialog request. Opens the dialog if it asks to be visible.
    pub fn set_request(&self, request: DialogRequest) {
        self.dispatch(DialogEvent::RequestChanged(request));
    }

    /// Observe the runner's visibility signal.
    pub fn set_visibility(&self, signal: VisibilitySignal) {
        self.dispatch(DialogEvent::Visibility(signal));
    }

    pub fn edit_text(&self, text: impl Into<String>) {
        self.dispatch(DialogEvent::TextEdited(text.into()));
    }

    pub fn select_option(&self, index: usize) {
        self.dispatch(DialogEvent::OptionSelected(index));
    }

    pub fn clear_selection(&self) {
        self.dispatch(DialogEvent::SelectionCleared);
    }

    pub fn toggle_option(&self, index: usize) {
        self.dispatch(DialogEvent::OptionToggled(index));
    }

    pub fn key_press(&self, press: KeyPress) {
        self.dispatch(DialogEvent::KeyPressed(press));
    }

    pub fn switch_tab(&self, index: usize) {
        self.dispatch(DialogEvent::TabSwitched(index));
    }

    /// Tell the dialog the host viewport changed size.
    pub fn viewport_resized(&self) {
        self.dispatch(DialogEvent::ViewportResized);
    }

    /// Press the confirm button.
    pub fn confirm(&self) {
        self.dispatch(DialogEvent::ConfirmRequested);
    }

    /// Use the close affordance.
    pub fn close(&self) {
        self.dispatch(DialogEvent::CloseRequested);
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.inner.dialog.lock().is_open()
    }

    pub fn variant(&self) -> WidgetVariant {
        self.inner.dialog.lock().variant()
    }

    pub fn response(&self) -> ResponseState {
        self.inner.dialog.lock().response().clone()
    }

    pub fn dimensions(&self) -> Option<DialogDimensions> {
        self.inner.dialog.lock().dimensions()
    }

    pub fn current_step(&self) -> usize {
        self.inner.dialog.lock().current_step()
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Emitted when the dialog opens or reopens.
    pub fn opened(&self) -> &Signal<()> {
        &self.inner.opened
    }

    /// Emitted with the encoded answer before it is sent to the backend.
    pub fn confirmed(&self) -> &Signal<String> {
        &self.inner.confirmed
    }

    pub fn closed(&self) -> &Signal<CloseReason> {
        &self.inner.closed
    }

    pub fn dimensions_changed(&self) -> &Signal<DialogDimensions> {
        &self.inner.dimensions_changed
    }

    pub fn response_changed(&self) -> &Signal<ResponseState> {
        &self.inner.response_changed
    }
}

impl std::fmt::Debug for DialogController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogController")
            .field("dialog", &*self.inner.dialog.lock())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Effect execution
// ============================================================================

impl Inner {
    fn dispatch(self: &Arc<Self>, event: DialogEvent) {
        // The lock is released before effects run, so slots may dispatch.
        let effects = self.dialog.lock().update(event);
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(self: &Arc<Self>, effect: DialogEffect) {
        match effect {
            DialogEffect::ScheduleSizing { delay } => self.schedule_sizing(delay),
            DialogEffect::StartMeasurement { generation, steps } => {
                self.start_measurement(generation, steps)
            }
            DialogEffect::CancelMeasurement => {
                if let Some(handle) = self.measurement.lock().take() {
                    tracing::debug!(target: targets::MEASURE, generation = handle.generation(), "measurement cancelled");
                    handle.cancel();
                }
            }
            DialogEffect::Alert(err) => self.feedback.alert(&err.to_string()),
            DialogEffect::Submit(encoded) => self.submit(encoded),
            DialogEffect::StopTests => self.stop_tests(),
            DialogEffect::Notify(notice) => self.feedback.notify(&notice),
            DialogEffect::Opened => self.opened.emit(()),
            DialogEffect::Confirmed(encoded) => self.confirmed.emit(encoded),
            DialogEffect::Closed(reason) => self.closed.emit(reason),
            DialogEffect::DimensionsChanged(dimensions) => self.dimensions_changed.emit(dimensions),
            DialogEffect::ResponseChanged(response) => self.response_changed.emit(response),
        }
    }

    fn sample_layout(self: &Arc<Self>) {
        let snapshot = LayoutSnapshot {
            viewport: self.viewport.viewport(),
            body: self.surface.body_scroll_size(),
        };
        self.dispatch(DialogEvent::Layout(snapshot));
    }

    fn schedule_sizing(self: &Arc<Self>, delay: Duration) {
        if delay.is_zero() {
            self.sample_layout();
            return;
        }
        let weak = Arc::downgrade(self);
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.sample_layout();
            }
        });
    }

    fn start_measurement(self: &Arc<Self>, generation: u64, steps: Arc<[Step]>) {
        let (handle, cancel_rx) = MeasurementHandle::new(generation);
        if let Some(previous) = self.measurement.lock().replace(handle) {
            tracing::debug!(target: targets::MEASURE, generation = previous.generation(), "superseded measurement cancelled");
            previous.cancel();
        }

        let measurer = self.measurer.clone();
        let surface = Arc::clone(&self.surface);
        let weak: Weak<Self> = Arc::downgrade(self);
        let span = tracing::info_span!(target: targets::MEASURE, "measure_steps", generation, steps = steps.len());

        self.runtime.spawn(
            async move {
                tokio::select! {
                    _ = cancel_rx => {}
                    size = measurer.measure(surface, steps) => {
                        if let Some(inner) = weak.upgrade() {
                            inner.finish_measurement(generation, size);
                        }
                    }
                }
            }
            .instrument(span),
        );
    }

    fn finish_measurement(self: &Arc<Self>, generation: u64, size: hardpy_panel_core::Size) {
        {
            let mut slot = self.measurement.lock();
            if slot.as_ref().is_some_and(|handle| handle.generation() == generation) {
                slot.take();
            }
        }
        self.dispatch(DialogEvent::MeasurementFinished { generation, size });
    }

    fn submit(&self, encoded: String) {
        let call = self.backend.confirm_dialog_box(&encoded);
        self.runtime.spawn(async move {
            match call.await {
                Ok(status) => {
                    tracing::info!(target: targets::NET, answer = %encoded, ?status, "dialog answer delivered")
                }
                Err(err) => {
                    tracing::error!(target: targets::NET, answer = %encoded, error = %err, "failed to confirm dialog box")
                }
            }
        });
    }

    fn stop_tests(&self) {
        let call = self.backend.stop();
        self.runtime.spawn(async move {
            match call.await {
                Ok(status) => tracing::info!(target: targets::NET, ?status, "tests stopped"),
                Err(err) => tracing::warn!(target: targets::NET, error = %err, "stop request failed"),
            }
        });
    }
}
