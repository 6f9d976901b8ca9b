use resvg::tiny_skia::{
    FilterQuality, IntSize, Mask, MaskType, Pixmap, PixmapPaint, Transform,
};

use crate::{
    assets::image::LoadedImage,
    foundation::{
        core::{Bounds, Canvas},
        error::{CardforgeError, CardforgeResult},
    },
    frames::catalog::FrameDescriptor,
};

pub(crate) fn new_pixmap(width: u32, height: u32) -> CardforgeResult<Pixmap> {
    Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| CardforgeError::render(format!("failed to allocate {width}x{height} pixmap")))
}

/// Wrap a decoded image as a pixmap; `None` when pixels are not decoded yet.
pub(crate) fn image_pixmap(img: &LoadedImage) -> CardforgeResult<Option<Pixmap>> {
    let Some(pixels) = img.pixels() else {
        return Ok(None);
    };
    let size = IntSize::from_wh(img.width, img.height)
        .ok_or_else(|| CardforgeError::render("image has zero size"))?;
    Pixmap::from_vec(pixels.to_vec(), size)
        .map(Some)
        .ok_or_else(|| CardforgeError::render("image pixels do not match dimensions"))
}

fn paint() -> PixmapPaint {
    PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    }
}

/// Draw `src` stretched over `bounds` of `dst`.
pub(crate) fn draw_stretched(dst: &mut Pixmap, src: &Pixmap, bounds: Bounds, canvas: Canvas) {
    let (x, y, w, h) = bounds.to_pixels(canvas);
    let sx = w / src.width() as f32;
    let sy = h / src.height() as f32;
    dst.draw_pixmap(
        0,
        0,
        src.as_ref(),
        &paint(),
        Transform::from_row(sx, 0.0, 0.0, sy, x, y),
        None,
    );
}

/// Draw `src` scaled by `zoom` with its top-left at `(x, y)`.
pub(crate) fn draw_zoomed(dst: &mut Pixmap, src: &Pixmap, x: f32, y: f32, zoom: f32) {
    dst.draw_pixmap(
        0,
        0,
        src.as_ref(),
        &paint(),
        Transform::from_row(zoom, 0.0, 0.0, zoom, x, y),
        None,
    );
}

/// Rasterize one frame layer with its masks applied in order.
///
/// Returns `None` when the frame image is unavailable. Masks that failed to load are skipped and
/// do not clip the layer.
pub(crate) fn frame_layer(frame: &FrameDescriptor, canvas: Canvas) -> CardforgeResult<Option<Pixmap>> {
    let Some(img) = frame.image.loaded() else {
        return Ok(None);
    };
    let Some(src) = image_pixmap(img)? else {
        return Ok(None);
    };

    let mut layer = new_pixmap(canvas.width, canvas.height)?;
    draw_stretched(&mut layer, &src, frame.bounds_or_default(), canvas);

    for mask in &frame.masks {
        let Some(mask_img) = mask.image.loaded() else {
            continue;
        };
        let Some(mask_src) = image_pixmap(mask_img)? else {
            continue;
        };
        let mut mask_px = new_pixmap(canvas.width, canvas.height)?;
        draw_stretched(
            &mut mask_px,
            &mask_src,
            mask.bounds.unwrap_or_default(),
            canvas,
        );
        layer.apply_mask(&Mask::from_pixmap(mask_px.as_ref(), MaskType::Alpha));
    }

    Ok(Some(layer))
}

/// Straight-alpha RGBA of one pixel.
#[cfg(test)]
pub(crate) fn pixel_rgba(pixmap: &Pixmap, x: u32, y: u32) -> Option<[u8; 4]> {
    let c = pixmap.pixel(x, y)?.demultiply();
    Some([c.red(), c.green(), c.blue(), c.alpha()])
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
