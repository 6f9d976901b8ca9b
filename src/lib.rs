//! cardforge batch-generates trading-card images from CSV rows.
//!
//! Each data row becomes one rendered card: the row is mapped to card text, the card's color
//! identity picks frame layers from a shared catalog, frame/mask/art images load asynchronously,
//! and a renderer draws and captures the canvas once every referenced image is drawable.
//!
//! # Pipeline overview
//!
//! 1. **Read**: [`parse_csv`] turns CSV text into [`CardRow`]s.
//! 2. **Map**: [`map_row`] builds [`CardContent`] (title, type line, mana cost, rules text).
//! 3. **Resolve**: [`FrameResolver`] picks frame and crown layers with their half masks.
//! 4. **Load**: [`AssetLoader`] fetches frames concurrently, masks in order, then art.
//! 5. **Synchronize**: [`RenderSynchronizer`] decodes pending images and gates the capture.
//! 6. **Render and export**: a [`CardRenderer`] draws the card; [`Batch`] commits the PNG.
//!
//! Rows run strictly one after another on a single-threaded runtime. A failing row is recorded in
//! the [`BatchReport`] and the batch moves on; only the initial catalog wait can abort a batch.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod batch;
mod card;
mod foundation;
mod frames;
mod input;
mod render;

pub use assets::fetch::{AssetFetcher, FsFetcher, MemoryFetcher, fix_uri};
pub use assets::image::{AssetLoadState, ImageSlot, LoadedImage, decode_premul};
pub use assets::loader::{
    ART_EXTENSIONS, ArtOutcome, ArtPolicy, AssetLoader, BLANK_ART, EMPTY_ART_PLACEHOLDER,
    LoaderOptions, is_usable_art_path,
};
pub use batch::config::{BatchConfig, DEFAULT_ARTIST};
pub use batch::export::{
    GalleryEntry, download_name, gallery_html, safe_filename, strip_tags, write_download,
};
pub use batch::orchestrator::{Batch, BatchReport, RowFailure, RowState};
pub use card::color::{Color, ColorIdentity};
pub use card::fields::{
    CardContent, DEFAULT_RARITY, DEFAULT_SET_SYMBOL_PATTERN, FieldMapping, RulesColumn,
    RulesPreset, TextWrap, UNTITLED, art_source, assemble_rules_text, format_mana_cost,
    is_legendary, map_row,
};
pub use foundation::core::{Bounds, CardImage, Canvas, png_data_url};
pub use foundation::error::{CardforgeError, CardforgeResult};
pub use frames::catalog::{
    CatalogReady, CatalogSignal, FrameCatalog, FrameDescriptor, MaskDescriptor,
};
pub use frames::resolver::{
    ARTIFACT_FRAME, FrameResolver, HalfMasks, MULTICOLORED_CROWN, MULTICOLORED_FRAME,
};
pub use input::csv::{CardRow, parse_csv};
pub use render::context::{ArtHook, ArtPlacement, ArtSlot, RenderContext};
pub use render::cpu::{CardLayout, CpuRenderer, cover_fit};
pub use render::renderer::CardRenderer;
pub use render::sync::RenderSynchronizer;
