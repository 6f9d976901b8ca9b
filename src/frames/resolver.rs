use crate::{
    card::color::ColorIdentity,
    foundation::core::Bounds,
    frames::catalog::{FrameCatalog, FrameDescriptor, MaskDescriptor},
};

/// Frame used for colorless cards.
pub const ARTIFACT_FRAME: &str = "Artifact Frame";
/// Frame used for cards with three or more colors.
pub const MULTICOLORED_FRAME: &str = "Multicolored Frame";
/// Crown used for legendary cards with three or more colors.
pub const MULTICOLORED_CROWN: &str = "Multicolored Legend Crown";

/// Fixed masks splitting the card face into a left and right half.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HalfMasks {
    /// Mask keeping the left half.
    pub left: MaskDescriptor,
    /// Mask keeping the right half.
    pub right: MaskDescriptor,
}

impl Default for HalfMasks {
    fn default() -> Self {
        Self {
            left: MaskDescriptor::new("Left Half", "img/frames/maskLeftHalf.png"),
            right: MaskDescriptor::new("Right Half", "img/frames/maskRightHalf.png"),
        }
    }
}

impl HalfMasks {
    fn for_index(&self, idx: usize) -> &MaskDescriptor {
        if idx == 0 { &self.left } else { &self.right }
    }
}

/// Derives the per-card frame layers from the shared catalog.
///
/// Output vectors are in paint order: index 0 is drawn first, crowns come last.
#[derive(Clone, Copy, Debug)]
pub struct FrameResolver<'a> {
    catalog: &'a FrameCatalog,
    masks: &'a HalfMasks,
}

impl<'a> FrameResolver<'a> {
    /// Resolver over `catalog` using `masks` for split frames.
    pub fn new(catalog: &'a FrameCatalog, masks: &'a HalfMasks) -> Self {
        Self { catalog, masks }
    }

    /// Frames for a color identity and legendary flag.
    pub fn resolve(&self, identity: &ColorIdentity, legendary: bool) -> Vec<FrameDescriptor> {
        let colors = identity.colors();
        let mut out = Vec::new();
        match colors {
            [] => self.push(&mut out, ARTIFACT_FRAME, None),
            [c] => {
                let frame = c.frame_name();
                self.push(&mut out, &frame, Some(&self.masks.left));
                self.push(&mut out, &frame, Some(&self.masks.right));
                if legendary {
                    self.push(&mut out, &c.crown_name(), None);
                }
            }
            [_, _] => {
                for (idx, c) in colors.iter().enumerate() {
                    self.push(&mut out, &c.frame_name(), Some(self.masks.for_index(idx)));
                }
                if legendary {
                    for (idx, c) in colors.iter().enumerate() {
                        self.push(&mut out, &c.crown_name(), Some(self.masks.for_index(idx)));
                    }
                }
            }
            _ => {
                self.push(&mut out, MULTICOLORED_FRAME, None);
                if legendary {
                    self.push(&mut out, MULTICOLORED_CROWN, None);
                }
            }
        }
        out
    }

    /// Single named frame, bypassing color resolution.
    pub fn resolve_named(&self, name: &str) -> Vec<FrameDescriptor> {
        let mut out = Vec::new();
        self.push(&mut out, name, None);
        out
    }

    fn push(&self, out: &mut Vec<FrameDescriptor>, name: &str, mask: Option<&MaskDescriptor>) {
        let Some(mut frame) = self.catalog.instantiate(name) else {
            tracing::warn!(frame = name, "frame missing from catalog; layer omitted");
            return;
        };
        if let Some(mask) = mask {
            let mut mask = mask.clone();
            mask.image.reset();
            frame.masks.push(mask);
        }
        frame.bounds.get_or_insert(Bounds::FULL);
        for m in &mut frame.masks {
            m.bounds.get_or_insert(Bounds::FULL);
        }
        out.push(frame);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/resolver.rs"]
mod tests;
