#![forbid(unsafe_code)]
//! art_collage: hue-sorted image manifests and spiral collage layout.
//!
//! Modules:
//! - color: RGB/HSL conversion and dominant color extraction
//! - manifest: image records, manifest builder, flattening art copier
//! - layout: viewport, image sizing, spiral placement, density metrics
//! - collage: the coordinator that loads a manifest and places images one by one
//! - events: observable progress of builds and load sessions
pub mod collage;
pub mod color;
pub mod error;
pub mod events;
pub mod layout;
pub mod manifest;
mod random;

pub use random::shuffle;

/// Convenient re-exports for common types. Import with `use art_collage::prelude::*;`.
pub mod prelude {
    pub use crate::collage::{
        Background, Collage, CollageConfig, FileManifestSource, ImageFileLoader, LoadOutcome,
        LoadQueue, LoadSummary, ManifestDimensions, ManifestSource, PlacedImage, TextureInfo,
        TextureLoader,
    };
    pub use crate::color::{dominant_color, rgb_to_hsl, Hsl, Rgb};
    pub use crate::error::{Error, Result};
    pub use crate::events::{CollageEvent, EventSink, FnSink, VecSink};
    pub use crate::layout::{
        find_next_position, fit_size, PlacedRectangle, SpiralConfig, Viewport,
    };
    pub use crate::manifest::builder::BuildReport;
    pub use crate::manifest::{
        copy_art, read_manifest, sort_by_hue, write_manifest, CopyReport, ImageRecord,
        ManifestBuilder, ManifestConfig,
    };
}
