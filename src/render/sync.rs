use std::{sync::Arc, time::Duration};

use crate::{
    assets::image::AssetLoadState,
    foundation::{
        core::CardImage,
        error::{CardforgeError, CardforgeResult},
    },
    frames::catalog::{CatalogReady, FrameCatalog},
    render::{context::RenderContext, renderer::CardRenderer},
};

/// Gate between asset loading and capture.
///
/// Waits once per batch for fonts and the frame catalog, then for each row makes every referenced
/// image drawable before the renderer is asked to paint.
#[derive(Debug)]
pub struct RenderSynchronizer {
    catalog_timeout: Duration,
    first_card_settle: Duration,
    first_pending: bool,
}

impl Default for RenderSynchronizer {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_secs(1))
    }
}

impl RenderSynchronizer {
    /// Synchronizer with explicit catalog timeout and first-card settle delay.
    pub fn new(catalog_timeout: Duration, first_card_settle: Duration) -> Self {
        Self {
            catalog_timeout,
            first_card_settle,
            first_pending: true,
        }
    }

    /// Await font readiness, then the catalog signal. A timeout here is fatal to the batch.
    pub async fn await_batch_ready<R: CardRenderer>(
        &mut self,
        renderer: &mut R,
        catalog: &mut CatalogReady,
    ) -> CardforgeResult<Arc<FrameCatalog>> {
        renderer.fonts_ready().await?;
        let catalog = catalog.wait(self.catalog_timeout).await?;
        tracing::debug!(frames = catalog.len(), "batch ready");
        self.first_pending = true;
        Ok(catalog)
    }

    /// Decode every referenced image that is not complete yet.
    ///
    /// Decode failures mark the slot `Failed` and are otherwise tolerated. Fails with
    /// `RenderNotReady` when requested art is still not drawable afterwards.
    pub async fn sweep(&self, ctx: &mut RenderContext) -> CardforgeResult<()> {
        for (name, slot) in ctx.referenced_images_mut() {
            if slot.is_complete() {
                continue;
            }
            let Some(img) = slot.loaded_mut() else {
                tracing::trace!(image = %name, "not loaded, nothing to decode");
                continue;
            };
            if let Err(e) = img.decode().await {
                tracing::warn!(image = %name, "decode failed: {e}");
                slot.state = AssetLoadState::Failed;
            }
        }

        if ctx.art.is_referenced() && !ctx.art.image.is_complete() {
            return Err(CardforgeError::render_not_ready(format!(
                "art {} is not complete",
                ctx.art.src
            )));
        }
        Ok(())
    }

    /// Fit, draw, wait for the paint, then capture the canvas.
    pub async fn render_and_capture<R: CardRenderer>(
        &mut self,
        renderer: &mut R,
        ctx: &mut RenderContext,
    ) -> CardforgeResult<CardImage> {
        renderer.auto_fit_art(ctx)?;
        renderer.draw_card(ctx)?;
        renderer.next_paint().await;
        if std::mem::take(&mut self.first_pending) && !self.first_card_settle.is_zero() {
            tracing::debug!(
                settle_ms = self.first_card_settle.as_millis() as u64,
                "first card settle"
            );
            tokio::time::sleep(self.first_card_settle).await;
        }
        renderer.snapshot()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sync.rs"]
mod tests;
