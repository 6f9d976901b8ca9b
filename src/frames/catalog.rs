use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use tokio::sync::watch;

use crate::{
    assets::image::ImageSlot,
    foundation::{
        core::Bounds,
        error::{CardforgeError, CardforgeResult},
    },
};

/// A mask clipping one frame layer. Owned by exactly one [`FrameDescriptor`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MaskDescriptor {
    /// Display name, e.g. `Left Half`.
    pub name: String,
    /// Image source (site-relative URI).
    pub src: String,
    /// Placement on the card; `None` until defaulted by the resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Lazily attached image.
    #[serde(skip)]
    pub image: ImageSlot,
}

impl MaskDescriptor {
    /// Build an unloaded mask without explicit bounds.
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            src: src.into(),
            bounds: None,
            image: ImageSlot::default(),
        }
    }
}

/// One frame layer: either a catalog template or a per-card copy of one.
///
/// `masks` are applied in vector order when compositing; position is composite order.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FrameDescriptor {
    /// Catalog name, e.g. `Red Frame`.
    pub name: String,
    /// Image source (site-relative URI).
    pub src: String,
    /// Ordered masks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masks: Vec<MaskDescriptor>,
    /// Placement on the card; `None` until defaulted by the resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Lazily attached image.
    #[serde(skip)]
    pub image: ImageSlot,
}

impl FrameDescriptor {
    /// Build an unloaded, unmasked frame without explicit bounds.
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            src: src.into(),
            masks: Vec::new(),
            bounds: None,
            image: ImageSlot::default(),
        }
    }

    /// Builder-style mask append.
    pub fn with_mask(mut self, mask: MaskDescriptor) -> Self {
        self.masks.push(mask);
        self
    }

    /// Resolved placement (full card when unset).
    pub fn bounds_or_default(&self) -> Bounds {
        self.bounds.unwrap_or_default()
    }
}

/// Read-only set of frame templates available to a batch.
#[derive(Clone, Debug, Default)]
pub struct FrameCatalog {
    frames: Vec<FrameDescriptor>,
}

impl FrameCatalog {
    /// Build from templates; image slots are reset so templates never carry pixels.
    pub fn new(frames: Vec<FrameDescriptor>) -> CardforgeResult<Self> {
        let mut frames = frames;
        for f in &mut frames {
            if let Some(b) = &f.bounds {
                b.validate()?;
            }
            f.image.reset();
            for m in &mut f.masks {
                if let Some(b) = &m.bounds {
                    b.validate()?;
                }
                m.image.reset();
            }
        }
        Ok(Self { frames })
    }

    /// Parse a JSON array of frame templates.
    pub fn from_json_str(json: &str) -> CardforgeResult<Self> {
        let frames: Vec<FrameDescriptor> = serde_json::from_str(json)
            .map_err(|e| CardforgeError::validation(format!("invalid frame catalog json: {e}")))?;
        Self::new(frames)
    }

    /// Read and parse a frame catalog file.
    pub async fn load(path: &Path) -> CardforgeResult<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read frame catalog '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Template with a case-insensitive exact name match.
    pub fn get(&self, name: &str) -> Option<&FrameDescriptor> {
        self.frames
            .iter()
            .find(|f| f.name.to_lowercase() == name.to_lowercase())
    }

    /// Deep copy of the named template, for per-card use.
    pub fn instantiate(&self, name: &str) -> Option<FrameDescriptor> {
        self.get(name).cloned()
    }

    /// Template names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.name.as_str())
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Publishing side of the one-shot catalog readiness signal.
#[derive(Debug)]
pub struct CatalogSignal {
    tx: watch::Sender<Option<Arc<FrameCatalog>>>,
}

/// Waiting side of the catalog readiness signal.
#[derive(Clone, Debug)]
pub struct CatalogReady {
    rx: watch::Receiver<Option<Arc<FrameCatalog>>>,
}

impl CatalogSignal {
    /// Create a linked signal/waiter pair.
    pub fn channel() -> (CatalogSignal, CatalogReady) {
        let (tx, rx) = watch::channel(None);
        (CatalogSignal { tx }, CatalogReady { rx })
    }

    /// Resolve the signal. Only the first call takes effect; returns whether it did.
    pub fn publish(&self, catalog: FrameCatalog) -> bool {
        let catalog = Arc::new(catalog);
        let published = self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(catalog);
            true
        });
        if !published {
            tracing::warn!("frame catalog already published; ignoring second publish");
        }
        published
    }
}

impl CatalogReady {
    /// A waiter that is already resolved, for callers that loaded the catalog up front.
    pub fn ready(catalog: FrameCatalog) -> Self {
        let (_tx, rx) = watch::channel(Some(Arc::new(catalog)));
        Self { rx }
    }

    /// Wait until a non-empty catalog is published, bounded by `timeout`.
    pub async fn wait(&mut self, timeout: Duration) -> CardforgeResult<Arc<FrameCatalog>> {
        let waited = tokio::time::timeout(
            timeout,
            self.rx
                .wait_for(|slot| slot.as_ref().is_some_and(|c| !c.is_empty())),
        )
        .await;
        match waited {
            Ok(Ok(slot)) => slot.as_ref().map(Arc::clone).ok_or_else(|| {
                CardforgeError::timeout("frame catalog signal resolved without a catalog")
            }),
            Ok(Err(_)) => Err(CardforgeError::timeout(
                "frame catalog source closed before becoming ready",
            )),
            Err(_) => Err(CardforgeError::timeout(format!(
                "frame catalog not ready after {} ms",
                timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/catalog.rs"]
mod tests;
