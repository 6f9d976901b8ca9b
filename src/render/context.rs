use std::sync::Arc;

use crate::{
    assets::image::ImageSlot, card::fields::CardContent, frames::catalog::FrameDescriptor,
};

/// Callback run after custom art loads successfully.
pub type ArtHook = Box<dyn FnMut(&mut ArtSlot)>;

/// Where the art image is drawn, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArtPlacement {
    /// Left edge of the scaled image.
    pub x: f32,
    /// Top edge of the scaled image.
    pub y: f32,
    /// Uniform scale applied to the natural image size.
    pub zoom: f32,
}

/// The single art image slot of the card being rendered.
#[derive(Clone, Debug, Default)]
pub struct ArtSlot {
    /// Current art source URI; empty when no custom art was requested.
    pub src: String,
    /// Art image.
    pub image: ImageSlot,
    /// Whether the blank fallback replaced failed art.
    pub fallback_applied: bool,
    /// Whether the art was set from row data.
    pub edited: bool,
    /// Artist credit recorded for the art.
    pub artist: Option<String>,
    /// Placement computed by auto-fit.
    pub placement: Option<ArtPlacement>,
}

impl ArtSlot {
    /// Whether custom art was requested for this row.
    pub fn is_referenced(&self) -> bool {
        !self.src.is_empty()
    }
}

/// Mutable render target owned by the orchestrator for one row at a time.
///
/// Holds the card text, frame layers, art slot and set symbol consumed by a
/// [`crate::CardRenderer`].
#[derive(Default)]
pub struct RenderContext {
    /// Card text fields.
    pub content: CardContent,
    /// Active frame layers in paint order.
    pub frames: Vec<FrameDescriptor>,
    /// Art image slot.
    pub art: ArtSlot,
    /// Parsed rarity set symbol, when one loaded.
    pub set_symbol: Option<Arc<usvg::Tree>>,
    art_hook: Option<ArtHook>,
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("content", &self.content)
            .field("frames", &self.frames)
            .field("art", &self.art)
            .field("set_symbol", &self.set_symbol.is_some())
            .field("art_hook", &self.art_hook.is_some())
            .finish()
    }
}

impl RenderContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new card: replace content and clear frames, art and symbol. The art hook is kept.
    pub fn begin_row(&mut self, content: CardContent) {
        self.content = content;
        self.frames.clear();
        self.art = ArtSlot::default();
        self.set_symbol = None;
    }

    /// Install `hook`, returning the previously installed one.
    pub fn replace_art_hook(&mut self, hook: Option<ArtHook>) -> Option<ArtHook> {
        std::mem::replace(&mut self.art_hook, hook)
    }

    /// Whether an art hook is installed.
    pub fn has_art_hook(&self) -> bool {
        self.art_hook.is_some()
    }

    /// Run the art hook against the art slot.
    pub fn notify_art_loaded(&mut self) {
        if let Some(hook) = self.art_hook.as_mut() {
            hook(&mut self.art);
        }
    }

    /// Every image slot referenced by the card: frames, their masks, then art if requested.
    pub fn referenced_images_mut(&mut self) -> Vec<(String, &mut ImageSlot)> {
        let mut out = Vec::new();
        for frame in &mut self.frames {
            out.push((frame.name.clone(), &mut frame.image));
            for mask in &mut frame.masks {
                out.push((format!("{} mask {}", frame.name, mask.name), &mut mask.image));
            }
        }
        if self.art.is_referenced() {
            out.push((format!("art {}", self.art.src), &mut self.art.image));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
