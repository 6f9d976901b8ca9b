use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use resvg::tiny_skia::{Color as SkColor, FillRule, Mask, PathBuilder, Pixmap, Rect, Transform};

use crate::{
    foundation::{
        core::{Bounds, CardImage, Canvas},
        error::{CardforgeError, CardforgeResult},
    },
    render::{
        composite::{draw_zoomed, frame_layer, image_pixmap, new_pixmap},
        context::{ArtPlacement, RenderContext},
        renderer::CardRenderer,
        text::text_layer_svg,
    },
};

/// Card face layout in fractional units of the canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardLayout {
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Art window.
    pub art: Bounds,
    /// Title line.
    pub title: Bounds,
    /// Mana cost, right-aligned pips.
    pub mana: Bounds,
    /// Type line.
    pub type_line: Bounds,
    /// Rules text box.
    pub rules: Bounds,
    /// Power/toughness box, right-aligned.
    pub power_toughness: Bounds,
    /// Rarity set symbol, aspect preserved.
    pub set_symbol: Bounds,
    /// Title font size as a fraction of canvas height.
    pub title_size: f32,
    /// Type line font size as a fraction of canvas height.
    pub type_size: f32,
    /// Rules font size as a fraction of canvas height.
    pub rules_size: f32,
    /// SVG fill for text.
    pub text_color: String,
    /// CSS font-family list for all text.
    pub font_family: String,
    /// Straight RGBA the canvas is cleared to.
    pub background: [u8; 4],
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            art: Bounds {
                x: 0.0767,
                y: 0.1129,
                width: 0.8476,
                height: 0.4429,
            },
            title: Bounds {
                x: 0.0854,
                y: 0.0522,
                width: 0.5,
                height: 0.0543,
            },
            mana: Bounds {
                x: 0.55,
                y: 0.058,
                width: 0.37,
                height: 0.04,
            },
            type_line: Bounds {
                x: 0.0854,
                y: 0.5664,
                width: 0.7,
                height: 0.0543,
            },
            rules: Bounds {
                x: 0.086,
                y: 0.6303,
                width: 0.828,
                height: 0.2875,
            },
            power_toughness: Bounds {
                x: 0.7928,
                y: 0.902,
                width: 0.1367,
                height: 0.0372,
            },
            set_symbol: Bounds {
                x: 0.82,
                y: 0.5714,
                width: 0.1,
                height: 0.0443,
            },
            title_size: 0.0381,
            type_size: 0.0324,
            rules_size: 0.0362,
            text_color: "#000000".to_string(),
            font_family: "Beleren, 'Palatino Linotype', serif".to_string(),
            background: [0, 0, 0, 0],
        }
    }
}

/// Cover-fit an image of `w`x`h` into `window`: scaled so both axes are covered, centered.
pub fn cover_fit(w: u32, h: u32, window: (f32, f32, f32, f32)) -> ArtPlacement {
    let (bx, by, bw, bh) = window;
    let (w, h) = (w.max(1) as f32, h.max(1) as f32);
    let zoom = (bw / w).max(bh / h);
    ArtPlacement {
        x: bx + (bw - w * zoom) / 2.0,
        y: by + (bh - h * zoom) / 2.0,
        zoom,
    }
}

/// Software renderer drawing cards onto a `tiny_skia` pixmap.
///
/// Layer order: background, art clipped to its window, frame layers in paint order, set symbol,
/// text.
pub struct CpuRenderer {
    layout: CardLayout,
    font_dirs: Vec<PathBuf>,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
    canvas: Pixmap,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("layout", &self.layout)
            .field("font_dirs", &self.font_dirs)
            .field("fonts_loaded", &self.fontdb.is_some())
            .finish()
    }
}

impl CpuRenderer {
    /// Renderer with a cleared canvas sized by `layout`.
    pub fn new(layout: CardLayout) -> CardforgeResult<Self> {
        for b in [
            layout.art,
            layout.title,
            layout.mana,
            layout.type_line,
            layout.rules,
            layout.power_toughness,
            layout.set_symbol,
        ] {
            b.validate()?;
        }
        if layout.canvas.width == 0 || layout.canvas.height == 0 {
            return Err(CardforgeError::validation("canvas must be non-empty"));
        }
        let canvas = new_pixmap(layout.canvas.width, layout.canvas.height)?;
        Ok(Self {
            layout,
            font_dirs: Vec::new(),
            fontdb: None,
            canvas,
        })
    }

    /// Also load `.ttf`/`.otf`/`.ttc` files from `dir` when fonts are prepared.
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    /// Active layout.
    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    fn canvas_size(&self) -> Canvas {
        self.layout.canvas
    }

    fn clear(&mut self) {
        let [r, g, b, a] = self.layout.background;
        self.canvas.fill(SkColor::from_rgba8(r, g, b, a));
    }

    fn draw_art(&mut self, ctx: &RenderContext) -> CardforgeResult<()> {
        let (Some(img), Some(place)) = (ctx.art.image.loaded(), ctx.art.placement) else {
            return Ok(());
        };
        let Some(src) = image_pixmap(img)? else {
            return Ok(());
        };
        let canvas = self.canvas_size();
        let (x, y, w, h) = self.layout.art.to_pixels(canvas);
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return Ok(());
        };

        let mut layer = new_pixmap(canvas.width, canvas.height)?;
        draw_zoomed(&mut layer, &src, place.x, place.y, place.zoom);

        let mut clip = Mask::new(canvas.width, canvas.height)
            .ok_or_else(|| CardforgeError::render("failed to allocate art clip"))?;
        clip.fill_path(
            &PathBuilder::from_rect(rect),
            FillRule::Winding,
            false,
            Transform::identity(),
        );
        layer.apply_mask(&clip);
        draw_layer(&mut self.canvas, &layer);
        Ok(())
    }

    fn draw_set_symbol(&mut self, ctx: &RenderContext) {
        let Some(tree) = ctx.set_symbol.as_deref() else {
            return;
        };
        let (x, y, w, h) = self.layout.set_symbol.to_pixels(self.canvas_size());
        let size = tree.size();
        let scale = (w / size.width()).min(h / size.height());
        let dx = x + (w - size.width() * scale) / 2.0;
        let dy = y + (h - size.height() * scale) / 2.0;
        resvg::render(
            tree,
            Transform::from_row(scale, 0.0, 0.0, scale, dx, dy),
            &mut self.canvas.as_mut(),
        );
    }

    fn svg_options(&self) -> usvg::Options<'static> {
        let mut opts = usvg::Options {
            font_resolver: font_resolver(),
            ..Default::default()
        };
        if let Some(db) = &self.fontdb {
            opts.fontdb = db.clone();
        }
        opts
    }
}

impl CardRenderer for CpuRenderer {
    async fn fonts_ready(&mut self) -> CardforgeResult<()> {
        if self.fontdb.is_some() {
            return Ok(());
        }
        let dirs = self.font_dirs.clone();
        let db = tokio::task::spawn_blocking(move || build_fontdb(&dirs))
            .await
            .context("font database task failed")?;
        tracing::debug!(faces = db.len(), "fonts ready");
        self.fontdb = Some(db);
        Ok(())
    }

    fn auto_fit_art(&mut self, ctx: &mut RenderContext) -> CardforgeResult<()> {
        ctx.art.placement = ctx.art.image.loaded().map(|img| {
            cover_fit(
                img.width,
                img.height,
                self.layout.art.to_pixels(self.canvas_size()),
            )
        });
        Ok(())
    }

    fn draw_frames(&mut self, ctx: &RenderContext) -> CardforgeResult<()> {
        let canvas = self.canvas_size();
        for frame in &ctx.frames {
            match frame_layer(frame, canvas)? {
                Some(layer) => draw_layer(&mut self.canvas, &layer),
                None => tracing::trace!(frame = %frame.name, "frame has no pixels, skipped"),
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, ctx: &RenderContext) -> CardforgeResult<()> {
        let svg = text_layer_svg(&ctx.content, &self.layout, self.canvas_size());
        let tree = usvg::Tree::from_str(&svg, &self.svg_options())
            .map_err(|e| CardforgeError::render(format!("text layer: {e}")))?;
        resvg::render(&tree, Transform::identity(), &mut self.canvas.as_mut());
        Ok(())
    }

    fn draw_card(&mut self, ctx: &RenderContext) -> CardforgeResult<()> {
        self.clear();
        self.draw_art(ctx)?;
        self.draw_frames(ctx)?;
        self.draw_set_symbol(ctx);
        self.draw_text(ctx)
    }

    async fn next_paint(&mut self) {
        tokio::task::yield_now().await;
    }

    fn snapshot(&self) -> CardforgeResult<CardImage> {
        CardImage::from_premul(
            self.canvas.width(),
            self.canvas.height(),
            self.canvas.data().to_vec(),
        )
    }
}

fn draw_layer(dst: &mut Pixmap, layer: &Pixmap) {
    dst.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &resvg::tiny_skia::PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

fn build_fontdb(dirs: &[PathBuf]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font dir not readable");
        return;
    };
    for path in rd.flatten().map(|e| e.path()) {
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
            .unwrap_or(false);
        if is_font && let Err(e) = db.load_font_file(&path) {
            tracing::warn!(font = %path.display(), "failed to load font: {e}");
        }
    }
}

// Last resort is the first installed face.
fn font_resolver() -> usvg::FontResolver<'static> {
    let select = usvg::FontResolver::default_font_selector();
    usvg::FontResolver {
        select_font: Box::new(move |font, db| {
            select(font, db).or_else(|| db.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
