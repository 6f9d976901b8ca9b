use std::io::Cursor;

use super::*;
use crate::{
    assets::image::LoadedImage,
    foundation::core::CardImage,
    frames::catalog::{CatalogSignal, FrameDescriptor},
};

#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
}

impl CardRenderer for Recorder {
    async fn fonts_ready(&mut self) -> CardforgeResult<()> {
        self.calls.push("fonts_ready");
        Ok(())
    }

    fn auto_fit_art(&mut self, _ctx: &mut RenderContext) -> CardforgeResult<()> {
        self.calls.push("auto_fit_art");
        Ok(())
    }

    fn draw_frames(&mut self, _ctx: &RenderContext) -> CardforgeResult<()> {
        self.calls.push("draw_frames");
        Ok(())
    }

    fn draw_text(&mut self, _ctx: &RenderContext) -> CardforgeResult<()> {
        self.calls.push("draw_text");
        Ok(())
    }

    fn draw_card(&mut self, _ctx: &RenderContext) -> CardforgeResult<()> {
        self.calls.push("draw_card");
        Ok(())
    }

    async fn next_paint(&mut self) {
        self.calls.push("next_paint");
    }

    fn snapshot(&self) -> CardforgeResult<CardImage> {
        CardImage::from_premul(1, 1, vec![0; 4])
    }
}

fn encode(w: u32, h: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([1, 2, 3, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

fn png(w: u32, h: u32) -> Vec<u8> {
    encode(w, h, image::ImageFormat::Png)
}

fn catalog() -> FrameCatalog {
    FrameCatalog::new(vec![FrameDescriptor::new("Red Frame", "r.png")]).unwrap()
}

#[tokio::test]
async fn batch_ready_waits_for_fonts_then_catalog() {
    let mut sync = RenderSynchronizer::new(Duration::from_millis(50), Duration::ZERO);
    let mut r = Recorder::default();
    let mut ready = CatalogReady::ready(catalog());
    let cat = sync.await_batch_ready(&mut r, &mut ready).await.unwrap();
    assert_eq!(cat.len(), 1);
    assert_eq!(r.calls, ["fonts_ready"]);
}

#[tokio::test(start_paused = true)]
async fn unpublished_catalog_times_out_as_fatal() {
    let mut sync = RenderSynchronizer::new(Duration::from_secs(10), Duration::ZERO);
    let (_signal, mut ready) = CatalogSignal::channel();
    let err = sync
        .await_batch_ready(&mut Recorder::default(), &mut ready)
        .await
        .unwrap_err();
    assert!(matches!(err, CardforgeError::Timeout(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn sweep_decodes_pending_images() {
    let sync = RenderSynchronizer::default();
    let mut ctx = RenderContext::new();
    let mut frame = FrameDescriptor::new("Red Frame", "r.png");
    frame.image.state = AssetLoadState::Loaded(LoadedImage::probe(png(3, 2)).unwrap());
    ctx.frames.push(frame);
    ctx.art.src = "art.png".to_string();
    ctx.art.image.state = AssetLoadState::Loaded(LoadedImage::probe(png(4, 4)).unwrap());

    sync.sweep(&mut ctx).await.unwrap();
    assert!(ctx.frames[0].image.is_complete());
    assert!(ctx.art.image.is_complete());
}

#[tokio::test]
async fn sweep_marks_undecodable_frame_failed_and_continues() {
    let sync = RenderSynchronizer::default();
    let mut ctx = RenderContext::new();
    // Header intact, pixel data cut short.
    let mut bytes = encode(2, 2, image::ImageFormat::Bmp);
    bytes.truncate(bytes.len() - 4);
    let mut frame = FrameDescriptor::new("Red Frame", "r.png");
    frame.image.state = AssetLoadState::Loaded(LoadedImage::probe(bytes).unwrap());
    ctx.frames.push(frame);

    sync.sweep(&mut ctx).await.unwrap();
    assert!(ctx.frames[0].image.is_failed());
}

#[tokio::test]
async fn sweep_rejects_incomplete_art() {
    let sync = RenderSynchronizer::default();
    let mut ctx = RenderContext::new();
    ctx.art.src = "art/missing.png".to_string();
    ctx.art.image.state = AssetLoadState::Failed;

    let err = sync.sweep(&mut ctx).await.unwrap_err();
    assert!(matches!(err, CardforgeError::RenderNotReady(_)));
}

#[tokio::test]
async fn sweep_ignores_unreferenced_art() {
    let sync = RenderSynchronizer::default();
    let mut ctx = RenderContext::new();
    sync.sweep(&mut ctx).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn first_card_settles_once() {
    let mut sync = RenderSynchronizer::new(Duration::from_secs(1), Duration::from_secs(1));
    let mut r = Recorder::default();
    let mut ctx = RenderContext::new();

    let start = tokio::time::Instant::now();
    sync.render_and_capture(&mut r, &mut ctx).await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(1));

    let second = tokio::time::Instant::now();
    sync.render_and_capture(&mut r, &mut ctx).await.unwrap();
    assert!(second.elapsed() < Duration::from_secs(1));

    assert_eq!(
        &r.calls[..3],
        ["auto_fit_art", "draw_card", "next_paint"]
    );
}
