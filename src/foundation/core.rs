use std::io::Cursor;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{CardforgeError, CardforgeResult};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        // Card Conjurer's native card size.
        Self {
            width: 2010,
            height: 2814,
        }
    }
}

/// Rectangle in fractional card units, each component in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::FULL
    }
}

impl Bounds {
    /// The whole card face.
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Construct bounds, rejecting components outside `[0, 1]`.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> CardforgeResult<Self> {
        let b = Self {
            x,
            y,
            width,
            height,
        };
        b.validate()?;
        Ok(b)
    }

    /// Check that every component is finite and in `[0, 1]`.
    pub fn validate(&self) -> CardforgeResult<()> {
        for (name, v) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(CardforgeError::validation(format!(
                    "bounds {name} must be in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Map to a pixel rectangle `(x, y, width, height)` on `canvas`.
    pub fn to_pixels(&self, canvas: Canvas) -> (f32, f32, f32, f32) {
        let cw = canvas.width as f32;
        let ch = canvas.height as f32;
        (self.x * cw, self.y * ch, self.width * cw, self.height * ch)
    }
}

/// A captured card image as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct CardImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, not premultiplied.
    pub data: Vec<u8>,
}

impl CardImage {
    /// Build from premultiplied RGBA8 pixels (as produced by the raster backend).
    pub fn from_premul(width: u32, height: u32, mut premul: Vec<u8>) -> CardforgeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| CardforgeError::render("card image size overflow"))?;
        if premul.len() != expected {
            return Err(CardforgeError::render(format!(
                "card image expects {expected} bytes, got {}",
                premul.len()
            )));
        }
        demultiply_rgba8_in_place(&mut premul);
        Ok(Self {
            width,
            height,
            data: premul,
        })
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> CardforgeResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| CardforgeError::render("card image buffer does not match dimensions"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode card png")?;
        Ok(buf)
    }
}

/// Build a `data:image/png;base64,` URL from encoded PNG bytes.
pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
