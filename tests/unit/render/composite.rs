use super::*;
use crate::{
    assets::image::AssetLoadState,
    frames::catalog::MaskDescriptor,
};

const CANVAS: Canvas = Canvas {
    width: 8,
    height: 4,
};

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> LoadedImage {
    let mut px = Vec::new();
    for _ in 0..w * h {
        px.extend_from_slice(&rgba);
    }
    LoadedImage::from_premul(w, h, px).unwrap()
}

fn left_half_mask(w: u32, h: u32) -> LoadedImage {
    let mut px = Vec::new();
    for _y in 0..h {
        for x in 0..w {
            let a = if x < w / 2 { 255 } else { 0 };
            px.extend_from_slice(&[a, a, a, a]);
        }
    }
    LoadedImage::from_premul(w, h, px).unwrap()
}

#[test]
fn frame_without_pixels_has_no_layer() {
    let frame = FrameDescriptor::new("Red Frame", "r.png");
    assert!(frame_layer(&frame, CANVAS).unwrap().is_none());
}

#[test]
fn unmasked_frame_fills_its_bounds() {
    let mut frame = FrameDescriptor::new("Red Frame", "r.png");
    frame.image.state = AssetLoadState::Loaded(solid(2, 2, [255, 0, 0, 255]));
    let layer = frame_layer(&frame, CANVAS).unwrap().unwrap();
    assert_eq!(pixel_rgba(&layer, 1, 1), Some([255, 0, 0, 255]));
    assert_eq!(pixel_rgba(&layer, 7, 3), Some([255, 0, 0, 255]));
}

#[test]
fn mask_clips_to_left_half() {
    let mut mask = MaskDescriptor::new("Left Half", "l.png");
    mask.image.state = AssetLoadState::Loaded(left_half_mask(8, 4));
    let mut frame = FrameDescriptor::new("Red Frame", "r.png").with_mask(mask);
    frame.image.state = AssetLoadState::Loaded(solid(8, 4, [255, 0, 0, 255]));

    let layer = frame_layer(&frame, CANVAS).unwrap().unwrap();
    assert_eq!(pixel_rgba(&layer, 1, 2).unwrap()[3], 255);
    assert_eq!(pixel_rgba(&layer, 6, 2).unwrap()[3], 0);
}

#[test]
fn failed_mask_does_not_clip() {
    let mut mask = MaskDescriptor::new("Left Half", "l.png");
    mask.image.state = AssetLoadState::Failed;
    let mut frame = FrameDescriptor::new("Red Frame", "r.png").with_mask(mask);
    frame.image.state = AssetLoadState::Loaded(solid(8, 4, [0, 0, 255, 255]));

    let layer = frame_layer(&frame, CANVAS).unwrap().unwrap();
    assert_eq!(pixel_rgba(&layer, 6, 2), Some([0, 0, 255, 255]));
}

#[test]
fn frame_bounds_limit_the_layer() {
    let mut frame = FrameDescriptor::new("Crown", "c.png");
    frame.bounds = Some(Bounds::new(0.0, 0.0, 1.0, 0.5).unwrap());
    frame.image.state = AssetLoadState::Loaded(solid(4, 1, [0, 255, 0, 255]));

    let layer = frame_layer(&frame, CANVAS).unwrap().unwrap();
    assert_eq!(pixel_rgba(&layer, 3, 0).unwrap()[3], 255);
    assert_eq!(pixel_rgba(&layer, 3, 3).unwrap()[3], 0);
}
