use std::future::Future;

use crate::{
    foundation::{core::CardImage, error::CardforgeResult},
    render::context::RenderContext,
};

/// The rendering subsystem the batch drives.
///
/// Implementations own the canvas. The orchestrator calls `auto_fit_art` and `draw_card` once all
/// assets are ready, awaits `next_paint` so the draw is reflected in the pixel buffer, and then
/// reads the result with `snapshot`.
pub trait CardRenderer {
    /// Resolve once fonts are available for text layout.
    fn fonts_ready(&mut self) -> impl Future<Output = CardforgeResult<()>>;

    /// Compute art placement for the context's art image.
    fn auto_fit_art(&mut self, ctx: &mut RenderContext) -> CardforgeResult<()>;

    /// Redraw the frame layers.
    fn draw_frames(&mut self, ctx: &RenderContext) -> CardforgeResult<()>;

    /// Redraw the text layer.
    fn draw_text(&mut self, ctx: &RenderContext) -> CardforgeResult<()>;

    /// Full redraw of the card.
    fn draw_card(&mut self, ctx: &RenderContext) -> CardforgeResult<()>;

    /// Yield until the host's next paint.
    fn next_paint(&mut self) -> impl Future<Output = ()>;

    /// Copy of the current canvas.
    fn snapshot(&self) -> CardforgeResult<CardImage>;
}
