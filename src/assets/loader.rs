use std::{sync::Arc, time::Duration};

use futures_util::future::join_all;

use crate::{
    assets::{
        fetch::{AssetFetcher, fix_uri},
        image::{AssetLoadState, ImageSlot, LoadedImage},
    },
    foundation::error::{CardforgeError, CardforgeResult},
    frames::catalog::FrameDescriptor,
    render::context::RenderContext,
};

/// Blank art substituted when custom art fails to load.
pub const BLANK_ART: &str = "img/blank.png";
/// Art path meaning "no art chosen yet".
pub const EMPTY_ART_PLACEHOLDER: &str = "img/private/";
/// Raster extensions accepted for custom art.
pub const ART_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// What to do when custom art fails to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtPolicy {
    /// Substitute [`BLANK_ART`] and keep going.
    #[default]
    Fallback,
    /// Fail the row with [`CardforgeError::AssetLoad`].
    Strict,
}

/// Result of an art load for one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtOutcome {
    /// No usable art path; nothing was requested.
    Skipped,
    /// Custom art loaded.
    Loaded,
    /// Custom art failed and the blank fallback loaded instead.
    FallbackApplied,
    /// Custom art and fallback are both unavailable.
    Failed,
}

/// Loader settings fixed for a batch.
#[derive(Clone, Debug)]
pub struct LoaderOptions {
    /// Art failure policy.
    pub art_policy: ArtPolicy,
    /// Fallback art source.
    pub blank_art: String,
    /// Placeholder art path treated as "no art".
    pub empty_art_placeholder: String,
    /// Pause after each frame's masks when a card has two or more frames.
    pub layered_frame_settle: Duration,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            art_policy: ArtPolicy::default(),
            blank_art: BLANK_ART.to_string(),
            empty_art_placeholder: EMPTY_ART_PLACEHOLDER.to_string(),
            layered_frame_settle: Duration::from_millis(500),
        }
    }
}

/// Whether `path` names loadable custom art.
pub fn is_usable_art_path(path: &str, placeholder: &str) -> bool {
    let path = path.trim();
    if path.is_empty() || path == placeholder || path == placeholder.trim_start_matches('/') {
        return false;
    }
    let Some((_, ext)) = path.rsplit_once('.') else {
        return false;
    };
    ART_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

/// Asynchronous loader for frame, mask, art and set-symbol assets.
#[derive(Debug)]
pub struct AssetLoader<'a, F> {
    fetcher: &'a F,
    opts: &'a LoaderOptions,
}

impl<'a, F: AssetFetcher> AssetLoader<'a, F> {
    /// Loader reading through `fetcher`.
    pub fn new(fetcher: &'a F, opts: &'a LoaderOptions) -> Self {
        Self { fetcher, opts }
    }

    /// Normalize, fetch and probe one image.
    pub async fn load_image(&self, src: &str) -> CardforgeResult<LoadedImage> {
        let uri = fix_uri(src)?;
        let bytes = self.fetcher.fetch(&uri).await?;
        LoadedImage::probe(bytes)
            .map_err(|e| CardforgeError::asset_load(format!("'{uri}' is not a readable image: {e}")))
    }

    async fn load_into(&self, slot: &mut ImageSlot, src: &str) -> CardforgeResult<()> {
        slot.state = AssetLoadState::Loading;
        match self.load_image(src).await {
            Ok(img) => {
                slot.state = AssetLoadState::Loaded(img);
                Ok(())
            }
            Err(e) => {
                slot.state = AssetLoadState::Failed;
                Err(e)
            }
        }
    }

    /// Load every frame concurrently. Within a frame, the frame image loads first and its masks
    /// follow one at a time in vector order. Failures leave the slot `Failed` and never abort.
    pub async fn load_frames(&self, frames: &mut [FrameDescriptor]) {
        let layered = frames.len() >= 2;
        join_all(frames.iter_mut().map(|f| self.load_frame(f, layered))).await;
    }

    async fn load_frame(&self, frame: &mut FrameDescriptor, layered: bool) {
        if let Err(e) = self.load_into(&mut frame.image, &frame.src).await {
            tracing::error!(frame = %frame.name, src = %frame.src, error = %e, "failed to load frame");
        }

        for mask in &mut frame.masks {
            if let Err(e) = self.load_into(&mut mask.image, &mask.src).await {
                tracing::trace!(mask = %mask.name, src = %mask.src, error = %e, "mask unavailable");
            }
        }

        if layered && !self.opts.layered_frame_settle.is_zero() {
            tokio::time::sleep(self.opts.layered_frame_settle).await;
        }
    }

    /// Load custom art into the context's art slot.
    ///
    /// Unusable paths skip loading entirely. On success the context's art hook runs. On failure the
    /// configured [`ArtPolicy`] applies.
    pub async fn load_art(
        &self,
        ctx: &mut RenderContext,
        source: Option<&str>,
    ) -> CardforgeResult<ArtOutcome> {
        let source = source.map(str::trim).unwrap_or("");
        if !is_usable_art_path(source, &self.opts.empty_art_placeholder) {
            tracing::warn!(path = source, "skipping invalid or empty art path");
            return Ok(ArtOutcome::Skipped);
        }

        ctx.art.src = source.to_string();
        match self.load_into(&mut ctx.art.image, source).await {
            Ok(()) => {
                tracing::debug!(path = source, "art loaded");
                ctx.notify_art_loaded();
                Ok(ArtOutcome::Loaded)
            }
            Err(e) => match self.opts.art_policy {
                ArtPolicy::Strict => Err(CardforgeError::asset_load(format!(
                    "art '{source}' failed to load: {e}"
                ))),
                ArtPolicy::Fallback => {
                    tracing::warn!(path = source, error = %e, "art failed to load; using blank art");
                    Ok(self.apply_blank_fallback(ctx).await)
                }
            },
        }
    }

    async fn apply_blank_fallback(&self, ctx: &mut RenderContext) -> ArtOutcome {
        let blank = &self.opts.blank_art;
        let already_blank = match (fix_uri(&ctx.art.src), fix_uri(blank)) {
            (Ok(current), Ok(blank)) => current == blank,
            _ => false,
        };
        if already_blank {
            ctx.art.image.state = AssetLoadState::Failed;
            return ArtOutcome::Failed;
        }

        ctx.art.src = blank.clone();
        ctx.art.fallback_applied = true;
        match self.load_into(&mut ctx.art.image, blank).await {
            Ok(()) => ArtOutcome::FallbackApplied,
            Err(e) => {
                tracing::error!(path = %blank, error = %e, "blank art fallback failed to load");
                ArtOutcome::Failed
            }
        }
    }

    /// Load and parse the rarity set symbol SVG; failures leave the symbol absent.
    pub async fn load_set_symbol(&self, ctx: &mut RenderContext) {
        let src = ctx.content.set_symbol_src.clone();
        if src.is_empty() {
            return;
        }
        let parsed = async {
            let uri = fix_uri(&src)?;
            let bytes = self.fetcher.fetch(&uri).await?;
            let tree = usvg::Tree::from_data(&bytes, &usvg::Options::default())
                .map_err(|e| CardforgeError::asset_load(format!("parse set symbol svg: {e}")))?;
            Ok::<_, CardforgeError>(tree)
        }
        .await;
        match parsed {
            Ok(tree) => ctx.set_symbol = Some(Arc::new(tree)),
            Err(e) => tracing::warn!(src = %src, error = %e, "set symbol unavailable"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
