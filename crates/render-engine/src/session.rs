//! Interactive session: controller, exporters, delivery, and notices.
//!
//! This is the boundary where failures stop. Validation and export errors
//! are logged, turned into a single [`Notice`] each, and never change the
//! presented view.

use heartify_common::clock::{Clock, ClockString};
use heartify_display_model::{DisplayController, Notice, Notifier};

use crate::bundle::build_project_archive;
use crate::error::ExportResult;
use crate::export::{DeliveryReceipt, DownloadSink, ImageExporter};
use crate::raster::Rasterizer;
use crate::surface::{DocumentHost, SurfaceSource};

/// Everything needed to drive the name display end to end.
pub struct HeartifySession<R, H, S, N>
where
    R: Rasterizer,
    H: DocumentHost,
    S: DownloadSink,
    N: Notifier,
{
    controller: DisplayController,
    exporter: ImageExporter<R>,
    host: H,
    sink: S,
    notifier: N,
}

impl<R, H, S, N> HeartifySession<R, H, S, N>
where
    R: Rasterizer + 'static,
    H: DocumentHost,
    S: DownloadSink,
    N: Notifier,
{
    pub fn new(exporter: ImageExporter<R>, host: H, sink: S, notifier: N) -> Self {
        Self {
            controller: DisplayController::new(),
            exporter,
            host,
            sink,
            notifier,
        }
    }

    /// Submit both names. Returns whether the result view is now shown.
    pub fn submit(&mut self, first_name: &str, second_name: &str) -> bool {
        match self.controller.submit(first_name, second_name) {
            Ok(_) => true,
            Err(e) => {
                tracing::info!(error = %e, "Name submission rejected");
                self.notifier.notify(Notice::missing_information());
                false
            }
        }
    }

    /// "Create New": back to the input view.
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Recompute the header clock.
    pub fn tick(&mut self, clock: &dyn Clock) -> &ClockString {
        self.controller.tick(clock)
    }

    /// Export the shown names as a PNG and deliver it.
    ///
    /// Does nothing while the input view is presented.
    pub async fn download_image(&mut self) -> Option<DeliveryReceipt> {
        let Some(surface) = self.controller.surface() else {
            tracing::debug!("Image download requested without a result view");
            return None;
        };

        let outcome = match self.exporter.export(surface, &mut self.host).await {
            Ok(artifact) => self.sink.deliver(artifact),
            Err(e) => Err(e),
        };

        self.report(outcome, Notice::image_downloaded(), Notice::image_failed(), "image")
    }

    /// Package the static project bundle and deliver it.
    ///
    /// Uses the current form input; blank names fall back to placeholders.
    pub fn download_project(&mut self) -> Option<DeliveryReceipt> {
        let input = self.controller.input();
        let outcome = build_project_archive(&input.first_name, &input.second_name)
            .and_then(|artifact| self.sink.deliver(artifact));

        self.report(
            outcome,
            Notice::project_downloaded(),
            Notice::project_failed(),
            "project",
        )
    }

    fn report(
        &mut self,
        outcome: ExportResult<DeliveryReceipt>,
        success: Notice,
        failure: Notice,
        what: &str,
    ) -> Option<DeliveryReceipt> {
        match outcome {
            Ok(receipt) => {
                tracing::info!(
                    file = %receipt.file_name,
                    bytes = receipt.bytes,
                    "Delivered {what}"
                );
                self.notifier.notify(success);
                Some(receipt)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error generating {what}");
                self.notifier.notify(failure);
                None
            }
        }
    }

    pub fn controller(&self) -> &DisplayController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut DisplayController {
        &mut self.controller
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
