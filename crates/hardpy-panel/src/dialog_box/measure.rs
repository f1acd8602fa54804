//! Off-screen measurement of Multistep content.
//!
//! Every step is laid out in one hidden container at a fixed reference
//! width. Steps that lay out synchronously are measured as soon as they are
//! attached. Steps with an image or a URL document are measured again each
//! time one of their loads completes, and URL documents get an extra settle
//! delay after `load` so their content can finish layout. The pass resolves
//! with the largest width and height seen once every load has completed.
//!
//! A pass is an ordinary future: dropping it tears the container down. The
//! controller wraps it with a [`MeasurementHandle`] so a newer pass can
//! cancel an older one.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use hardpy_panel_core::Size;
use hardpy_panel_core::logging::targets;
use tokio::sync::oneshot;

use super::request::Step;
use super::surface::{ContainerId, MeasurementSurface, MediaKind, PanelId, StepPanel};
use crate::config::DialogConfig;

/// Removes a measurement container when dropped.
struct ContainerGuard {
    surface: Arc<dyn MeasurementSurface>,
    id: ContainerId,
}

impl ContainerGuard {
    fn create(surface: Arc<dyn MeasurementSurface>, width: f32) -> Self {
        let id = surface.create_container(width);
        Self { surface, id }
    }
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        self.surface.remove_container(self.id);
    }
}

/// Measures Multistep content before the dialog is shown.
#[derive(Debug, Clone)]
pub struct ContentMeasurer {
    reference_width: f32,
    padding: f32,
    document_settle: Duration,
    load_timeout: Option<Duration>,
}

impl ContentMeasurer {
    pub fn new(config: &DialogConfig) -> Self {
        Self {
            reference_width: config.reference_width,
            padding: config.step_padding,
            document_settle: config.document_settle(),
            load_timeout: config.media_load_timeout(),
        }
    }

    /// Measure all `steps` and return the largest panel size.
    ///
    /// Without a load timeout this waits for every load, however long.
    pub async fn measure(&self, surface: Arc<dyn MeasurementSurface>, steps: Arc<[Step]>) -> Size {
        let container = ContainerGuard::create(surface.clone(), self.reference_width);
        let mut max = Size::ZERO;
        let mut pending = FuturesUnordered::new();

        for (index, step) in steps.iter().enumerate() {
            let panel = surface.append_panel(
                container.id,
                &StepPanel {
                    index,
                    step,
                    padding: self.padding,
                },
            );

            if step.image.is_some() {
                pending.push(wait_for_media(
                    surface.media_loaded(panel, MediaKind::Image),
                    panel,
                    MediaKind::Image,
                    Duration::ZERO,
                    self.load_timeout,
                ));
            }
            if step.html.as_ref().is_some_and(|html| html.loads_asynchronously()) {
                pending.push(wait_for_media(
                    surface.media_loaded(panel, MediaKind::Document),
                    panel,
                    MediaKind::Document,
                    self.document_settle,
                    self.load_timeout,
                ));
            }

            if step.is_synchronous() {
                max = max.max(surface.panel_size(panel));
            }
        }

        tracing::debug!(
            target: targets::MEASURE,
            steps = steps.len(),
            pending = pending.len(),
            "step panels attached"
        );

        while let Some(panel) = pending.next().await {
            let size = surface.panel_size(panel);
            tracing::trace!(target: targets::MEASURE, ?panel, ?size, "panel re-measured");
            max = max.max(size);
        }

        drop(container);
        tracing::debug!(target: targets::MEASURE, width = max.width, height = max.height, "measurement complete");
        max
    }
}

async fn wait_for_media(
    load: BoxFuture<'static, ()>,
    panel: PanelId,
    kind: MediaKind,
    settle: Duration,
    timeout: Option<Duration>,
) -> PanelId {
    match timeout {
        Some(limit) => {
            if tokio::time::timeout(limit, load).await.is_err() {
                tracing::warn!(
                    target: targets::MEASURE,
                    ?panel,
                    ?kind,
                    timeout_ms = limit.as_millis() as u64,
                    "media did not load in time, measuring as is"
                );
                return panel;
            }
        }
        None => load.await,
    }
    if !settle.is_zero() {
        tokio::time::sleep(settle).await;
    }
    panel
}

// ============================================================================
// MeasurementHandle
// ============================================================================

/// Tracks a measurement pass running on the runtime.
///
/// Dropping the handle or calling [`cancel`](Self::cancel) stops the pass
/// and tears down its container.
#[derive(Debug)]
pub struct MeasurementHandle {
    generation: u64,
    cancel_tx: Option<oneshot::Sender<()>>,
}

impl MeasurementHandle {
    /// Create a handle and the receiver the pass listens on.
    pub fn new(generation: u64) -> (Self, oneshot::Receiver<()>) {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        (
            Self {
                generation,
                cancel_tx: Some(cancel_tx),
            },
            cancel_rx,
        )
    }

    /// The request generation this pass measures.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop the pass.
    pub fn cancel(mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MeasurementHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog_box::request::{HtmlSpec, ImageSpec};
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Panels report the size registered for their step index. Loads
    /// resolve when the test fires them.
    #[derive(Default)]
    struct FakeSurface {
        sizes: Mutex<HashMap<usize, Size>>,
        loads: Mutex<HashMap<(u64, MediaKind), oneshot::Sender<()>>>,
        removed: Mutex<Vec<ContainerId>>,
        next_panel: Mutex<u64>,
    }

    impl FakeSurface {
        fn with_sizes(sizes: &[(usize, Size)]) -> Arc<Self> {
            let surface = Self::default();
            surface.sizes.lock().extend(sizes.iter().copied());
            Arc::new(surface)
        }

        fn fire(&self, panel: u64, kind: MediaKind) {
            if let Some(tx) = self.loads.lock().remove(&(panel, kind)) {
                let _ = tx.send(());
            }
        }
    }

    impl MeasurementSurface for FakeSurface {
        fn create_container(&self, _width: f32) -> ContainerId {
            ContainerId(1)
        }

        fn append_panel(&self, _container: ContainerId, panel: &StepPanel<'_>) -> PanelId {
            let mut next = self.next_panel.lock();
            *next += 1;
            assert_eq!(*next as usize - 1, panel.index);
            PanelId(panel.index as u64)
        }

        fn panel_size(&self, panel: PanelId) -> Size {
            self.sizes
                .lock()
                .get(&(panel.0 as usize))
                .copied()
                .unwrap_or_default()
        }

        fn media_loaded(&self, panel: PanelId, kind: MediaKind) -> BoxFuture<'static, ()> {
            let (tx, rx) = oneshot::channel();
            self.loads.lock().insert((panel.0, kind), tx);
            Box::pin(async move {
                // A dropped sender means the test never fires this load.
                if rx.await.is_err() {
                    futures_util::future::pending::<()>().await;
                }
            })
        }

        fn remove_container(&self, container: ContainerId) {
            self.removed.lock().push(container);
        }

        fn body_scroll_size(&self) -> Option<Size> {
            None
        }
    }

    fn measurer() -> ContentMeasurer {
        ContentMeasurer::new(&DialogConfig::default())
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_text_steps_measure_immediately() {
        let surface = FakeSurface::with_sizes(&[
            (0, Size::new(300.0, 80.0)),
            (1, Size::new(250.0, 120.0)),
        ]);
        let steps: Arc<[Step]> = vec![Step::new("a").with_text("x"), Step::new("b").with_text("y")].into();

        let size = measurer().measure(surface.clone(), steps).await;

        assert_eq!(size, Size::new(300.0, 120.0));
        assert_eq!(*surface.removed.lock(), vec![ContainerId(1)]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_image_step_waits_for_load() {
        let surface = FakeSurface::with_sizes(&[
            (0, Size::new(100.0, 50.0)),
            (1, Size::new(700.0, 600.0)),
        ]);
        let steps: Arc<[Step]> = vec![
            Step::new("text").with_text("hello"),
            Step::new("image").with_image(ImageSpec::new("AAAA")),
        ]
        .into();

        let pass = tokio::spawn({
            let surface: Arc<dyn MeasurementSurface> = surface.clone();
            async move { measurer().measure(surface, steps).await }
        });

        tokio::task::yield_now().await;
        assert!(!pass.is_finished());
        assert!(surface.removed.lock().is_empty());

        surface.fire(1, MediaKind::Image);
        let size = pass.await.unwrap();
        assert_eq!(size, Size::new(700.0, 600.0));
        assert_eq!(surface.removed.lock().len(), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_document_settles_after_load() {
        let surface = FakeSurface::with_sizes(&[(0, Size::new(500.0, 400.0))]);
        let steps: Arc<[Step]> = vec![Step::new("doc").with_html(HtmlSpec::url("http://docs/a"))].into();

        let pass = tokio::spawn({
            let surface: Arc<dyn MeasurementSurface> = surface.clone();
            async move { measurer().measure(surface, steps).await }
        });
        tokio::task::yield_now().await;
        surface.fire(0, MediaKind::Document);

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(!pass.is_finished());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(pass.await.unwrap(), Size::new(500.0, 400.0));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_load_timeout_measures_panel_as_is() {
        let surface = FakeSurface::with_sizes(&[(0, Size::new(420.0, 310.0))]);
        let steps: Arc<[Step]> = vec![Step::new("img").with_image(ImageSpec::new("AAAA"))].into();
        let config = DialogConfig {
            media_load_timeout_ms: Some(1_000),
            ..DialogConfig::default()
        };

        let size = ContentMeasurer::new(&config).measure(surface, steps).await;
        assert_eq!(size, Size::new(420.0, 310.0));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_dropped_pass_removes_container() {
        let surface = FakeSurface::with_sizes(&[]);
        let steps: Arc<[Step]> = vec![Step::new("img").with_image(ImageSpec::new("AAAA"))].into();

        let pass = tokio::spawn({
            let surface: Arc<dyn MeasurementSurface> = surface.clone();
            async move { measurer().measure(surface, steps).await }
        });
        tokio::task::yield_now().await;
        assert!(surface.removed.lock().is_empty());

        pass.abort();
        let _ = pass.await;
        assert_eq!(surface.removed.lock().len(), 1);
    }

    #[test]
    fn test_handle_cancel_signals_receiver() {
        let (handle, mut rx) = MeasurementHandle::new(3);
        assert_eq!(handle.generation(), 3);
        handle.cancel();
        assert!(rx.try_recv().is_ok());
    }
}
