//! Image manifest: the JSON document that connects the build step to the layout engine.
//!
//! A manifest is a pretty-printed JSON array of [`ImageRecord`]s ordered by the hue
//! of each record's dominant color.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{Error, Result};

pub mod builder;
pub mod copy;

pub use builder::{ManifestBuilder, ManifestConfig};
pub use copy::{copy_art, CopyReport};

/// One manifest entry describing a source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// File name inside the image directory.
    pub filename: String,
    /// Public path the runtime loads the image from.
    pub path: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// File size in bytes.
    pub size: u64,
    /// Dominant color of the image.
    pub average_color: Rgb,
}

impl ImageRecord {
    /// Sort key of this record.
    pub fn hue(&self) -> f64 {
        self.average_color.hue()
    }

    /// Natural aspect ratio (`width / height`).
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Stable sort by ascending hue of the dominant color.
pub fn sort_by_hue(records: &mut [ImageRecord]) {
    records.sort_by(|a, b| a.hue().total_cmp(&b.hue()));
}

/// Parses a manifest from a JSON string and checks record dimensions.
pub fn parse_manifest(json: &str) -> Result<Vec<ImageRecord>> {
    let records: Vec<ImageRecord> = serde_json::from_str(json)?;
    if let Some(bad) = records.iter().find(|r| r.width == 0 || r.height == 0) {
        return Err(Error::Manifest(format!(
            "record '{}' has zero dimension {}x{}",
            bad.filename, bad.width, bad.height
        )));
    }
    Ok(records)
}

/// Reads a manifest file from disk.
pub fn read_manifest(path: &Path) -> Result<Vec<ImageRecord>> {
    let json = fs::read_to_string(path).map_err(|e| Error::at_path(path, e))?;
    parse_manifest(&json)
}

/// Writes `records` as pretty-printed JSON, replacing any existing file.
pub fn write_manifest(path: &Path, records: &[ImageRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::at_path(parent, e))?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).map_err(|e| Error::at_path(path, e))?;
    Ok(())
}
