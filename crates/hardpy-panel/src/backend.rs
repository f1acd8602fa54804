//! The test-runner backend as seen by the dialog.

use futures_util::future::BoxFuture;
use hardpy_panel_net::{PanelApiClient, RunStatus};

/// Backend calls made by the dialog.
///
/// Both calls are fire-and-forget from the dialog's point of view: the
/// controller logs the outcome and never retries.
pub trait PanelBackend: Send + Sync {
    /// Deliver the encoded answer.
    fn confirm_dialog_box(&self, encoded: &str) -> BoxFuture<'static, hardpy_panel_net::Result<RunStatus>>;

    /// Stop the running tests.
    fn stop(&self) -> BoxFuture<'static, hardpy_panel_net::Result<RunStatus>>;
}

impl PanelBackend for PanelApiClient {
    fn confirm_dialog_box(&self, encoded: &str) -> BoxFuture<'static, hardpy_panel_net::Result<RunStatus>> {
        let client = self.clone();
        let encoded = encoded.to_string();
        Box::pin(async move { PanelApiClient::confirm_dialog_box(&client, &encoded).await })
    }

    fn stop(&self) -> BoxFuture<'static, hardpy_panel_net::Result<RunStatus>> {
        let client = self.clone();
        Box::pin(async move { PanelApiClient::stop(&client).await })
    }
}
