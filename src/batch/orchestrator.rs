use std::sync::Arc;

use crate::{
    assets::{fetch::AssetFetcher, loader::AssetLoader},
    batch::{
        config::BatchConfig,
        export::{GalleryEntry, write_download},
    },
    card::fields::{art_source, map_row},
    foundation::error::{CardforgeError, CardforgeResult},
    frames::{
        catalog::{CatalogReady, FrameCatalog},
        resolver::FrameResolver,
    },
    input::csv::CardRow,
    render::{
        context::{ArtHook, ArtSlot, RenderContext},
        renderer::CardRenderer,
        sync::RenderSynchronizer,
    },
};

/// Pipeline position of the row being generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowState {
    /// Row accepted.
    Start,
    /// Row mapped to card content.
    MapFields,
    /// Frame layers chosen.
    ResolveFrames,
    /// Frame, mask, art and symbol loads.
    LoadAssets,
    /// Readiness sweep.
    Synchronize,
    /// Fit, draw and paint.
    Render,
    /// Canvas encoded.
    Capture,
    /// Optional download written.
    Export,
    /// Appended to the gallery.
    Commit,
    /// Terminal failure.
    Failed,
}

impl std::fmt::Display for RowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A row that reached `Failed`.
#[derive(Debug)]
pub struct RowFailure {
    /// Zero-based data row index.
    pub index: usize,
    /// Trimmed `Cards` value.
    pub title: String,
    /// State the row was in when it failed.
    pub state: RowState,
    /// Cause.
    pub error: CardforgeError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Captured cards in row order.
    pub gallery: Vec<GalleryEntry>,
    /// Rows that failed; the batch continued past each.
    pub failures: Vec<RowFailure>,
    /// Rows skipped for an empty `Cards` value.
    pub skipped: usize,
}

/// Sequential card generator over a renderer and an asset source.
#[derive(Debug)]
pub struct Batch<R, F> {
    renderer: R,
    fetcher: F,
    config: BatchConfig,
}

struct RowRun<'a> {
    index: usize,
    state: RowState,
    title: &'a str,
}

impl RowRun<'_> {
    fn advance(&mut self, next: RowState) {
        tracing::debug!(
            row = self.index,
            title = self.title,
            from = %self.state,
            to = %next,
            "row state"
        );
        self.state = next;
    }
}

impl<R: CardRenderer, F: AssetFetcher> Batch<R, F> {
    /// Batch over `renderer` and `fetcher` with fixed settings.
    pub fn new(renderer: R, fetcher: F, config: BatchConfig) -> Self {
        Self {
            renderer,
            fetcher,
            config,
        }
    }

    /// Settings in effect.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// The renderer, e.g. to inspect the last drawn canvas.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Generate one card per row, strictly in order.
    ///
    /// Waits for fonts and the frame catalog first; a timeout there aborts the batch. Row failures
    /// are recorded and skipped. The context's art hook is swapped for the batch's own and the
    /// previous hook is back in place when this returns, on success or error.
    pub async fn run(
        &mut self,
        rows: &[CardRow],
        ctx: &mut RenderContext,
        catalog: &mut CatalogReady,
    ) -> CardforgeResult<BatchReport> {
        let previous = ctx.replace_art_hook(Some(self.art_hook()));
        let result = self.run_rows(rows, ctx, catalog).await;
        ctx.replace_art_hook(previous);
        result
    }

    fn art_hook(&self) -> ArtHook {
        let artist = self.config.artist.clone();
        Box::new(move |art: &mut ArtSlot| {
            art.edited = true;
            art.artist = Some(artist.clone());
        })
    }

    async fn run_rows(
        &mut self,
        rows: &[CardRow],
        ctx: &mut RenderContext,
        catalog: &mut CatalogReady,
    ) -> CardforgeResult<BatchReport> {
        let mut sync = self.config.synchronizer();
        let catalog = sync.await_batch_ready(&mut self.renderer, catalog).await?;

        let mut report = BatchReport::default();
        for (index, row) in rows.iter().enumerate() {
            let Some(cards) = row.non_empty("Cards") else {
                tracing::warn!(row = index, "no Cards value; row skipped");
                report.skipped += 1;
                continue;
            };

            let mut run = RowRun {
                index,
                state: RowState::Start,
                title: cards,
            };
            match self.generate(row, ctx, &catalog, &mut sync, &mut run).await {
                Ok(entry) => report.gallery.push(entry),
                Err(e) if e.is_fatal() => return Err(e),
                Err(error) => {
                    let state = run.state;
                    run.advance(RowState::Failed);
                    match &error {
                        CardforgeError::RenderNotReady(_) => {
                            tracing::warn!(row = index, title = cards, %state, "render skipped: {error}")
                        }
                        _ => tracing::error!(row = index, title = cards, %state, "row failed: {error}"),
                    }
                    report.failures.push(RowFailure {
                        index,
                        title: cards.to_string(),
                        state,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            generated = report.gallery.len(),
            failed = report.failures.len(),
            skipped = report.skipped,
            "batch finished"
        );
        Ok(report)
    }

    #[tracing::instrument(skip_all, fields(row = run.index, title = run.title))]
    async fn generate(
        &mut self,
        row: &CardRow,
        ctx: &mut RenderContext,
        catalog: &Arc<FrameCatalog>,
        sync: &mut RenderSynchronizer,
        run: &mut RowRun<'_>,
    ) -> CardforgeResult<GalleryEntry> {
        run.advance(RowState::MapFields);
        ctx.begin_row(map_row(row, &self.config.field_mapping()));

        run.advance(RowState::ResolveFrames);
        let resolver = FrameResolver::new(catalog, &self.config.half_masks);
        ctx.frames = if self.config.force_default_frame {
            resolver.resolve_named(&self.config.default_frame)
        } else {
            resolver.resolve(&ctx.content.color_identity(), ctx.content.is_legendary())
        };

        run.advance(RowState::LoadAssets);
        let opts = self.config.loader_options();
        let loader = AssetLoader::new(&self.fetcher, &opts);
        loader.load_frames(&mut ctx.frames).await;
        loader.load_art(ctx, art_source(row)).await?;
        loader.load_set_symbol(ctx).await;

        run.advance(RowState::Synchronize);
        sync.sweep(ctx).await?;

        run.advance(RowState::Render);
        let image = sync.render_and_capture(&mut self.renderer, ctx).await?;

        run.advance(RowState::Capture);
        let entry = GalleryEntry {
            title: ctx.content.title.clone(),
            png: image.encode_png()?,
        };

        if let Some(dir) = &self.config.download_dir {
            run.advance(RowState::Export);
            let path = write_download(dir, &entry).await?;
            tracing::debug!(path = %path.display(), "card written");
        }

        run.advance(RowState::Commit);
        tracing::info!(title = %entry.title, "card generated");
        Ok(entry)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/orchestrator.rs"]
mod tests;
