use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::foundation::{
    core::premultiply_rgba8_in_place,
    error::{CardforgeError, CardforgeResult},
};

/// Load lifecycle of one image slot.
#[derive(Clone, Debug, Default)]
pub enum AssetLoadState {
    /// No load has been requested.
    #[default]
    Unloaded,
    /// A fetch is in flight.
    Loading,
    /// Bytes fetched and header probed; pixels may still need decoding.
    Loaded(LoadedImage),
    /// Fetch, probe or decode failed.
    Failed,
}

/// An image whose encoded bytes are available.
///
/// Natural dimensions come from the header at load time. Pixels are decoded later by the render
/// synchronizer's readiness sweep.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    encoded: Arc<Vec<u8>>,
    pixels: Option<Arc<Vec<u8>>>,
}

impl LoadedImage {
    /// Read natural dimensions from the encoded header without decoding pixels.
    pub fn probe(encoded: Vec<u8>) -> CardforgeResult<Self> {
        let (width, height) = image::ImageReader::new(Cursor::new(encoded.as_slice()))
            .with_guessed_format()
            .context("guess image format")?
            .into_dimensions()
            .context("read image dimensions")?;
        Ok(Self {
            width,
            height,
            encoded: Arc::new(encoded),
            pixels: None,
        })
    }

    /// Build an already decoded image from premultiplied RGBA8 pixels.
    pub fn from_premul(width: u32, height: u32, premul: Vec<u8>) -> CardforgeResult<Self> {
        if premul.len() != (width as usize) * (height as usize) * 4 {
            return Err(CardforgeError::validation(
                "premultiplied pixel buffer does not match dimensions",
            ));
        }
        Ok(Self {
            width,
            height,
            encoded: Arc::new(Vec::new()),
            pixels: Some(Arc::new(premul)),
        })
    }

    /// Complete means decoded with non-zero natural dimensions.
    pub fn is_complete(&self) -> bool {
        self.pixels.is_some() && self.width > 0 && self.height > 0
    }

    /// Decoded premultiplied RGBA8 pixels, once available.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref().map(Vec::as_slice)
    }

    /// Decode pixels off the async thread and wait for them.
    pub async fn decode(&mut self) -> CardforgeResult<()> {
        if self.pixels.is_some() {
            return Ok(());
        }
        let encoded = Arc::clone(&self.encoded);
        let (w, h, premul) = tokio::task::spawn_blocking(move || decode_premul(&encoded))
            .await
            .context("join image decode task")??;
        if (w, h) != (self.width, self.height) {
            return Err(CardforgeError::asset_load(format!(
                "decoded size {w}x{h} differs from probed size {}x{}",
                self.width, self.height
            )));
        }
        self.pixels = Some(Arc::new(premul));
        Ok(())
    }
}

/// Decode encoded image bytes into premultiplied RGBA8.
pub fn decode_premul(bytes: &[u8]) -> CardforgeResult<(u32, u32, Vec<u8>)> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut premul);
    Ok((width, height, premul))
}

/// A lazily attached image handle owned by a frame, mask, art or symbol.
#[derive(Clone, Debug, Default)]
pub struct ImageSlot {
    /// Current lifecycle state.
    pub state: AssetLoadState,
}

impl ImageSlot {
    /// The loaded image, if any.
    pub fn loaded(&self) -> Option<&LoadedImage> {
        match &self.state {
            AssetLoadState::Loaded(img) => Some(img),
            _ => None,
        }
    }

    /// Mutable access to the loaded image, if any.
    pub fn loaded_mut(&mut self) -> Option<&mut LoadedImage> {
        match &mut self.state {
            AssetLoadState::Loaded(img) => Some(img),
            _ => None,
        }
    }

    /// Whether the slot holds a complete, drawable image.
    pub fn is_complete(&self) -> bool {
        self.loaded().is_some_and(LoadedImage::is_complete)
    }

    /// Whether a load was attempted and failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.state, AssetLoadState::Failed)
    }

    /// Whether no load was ever requested.
    pub fn is_unloaded(&self) -> bool {
        matches!(self.state, AssetLoadState::Unloaded)
    }

    /// Drop any image and return to `Unloaded`.
    pub fn reset(&mut self) {
        self.state = AssetLoadState::Unloaded;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
