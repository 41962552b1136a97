//! Seams to the outside world: where the manifest comes from and how images are loaded.
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::manifest::{read_manifest, ImageRecord};

/// Supplies the manifest at the start of a load session.
pub trait ManifestSource {
    fn fetch(&self) -> Result<Vec<ImageRecord>>;
}

/// Reads the manifest JSON from a file on disk.
#[derive(Debug, Clone)]
pub struct FileManifestSource {
    pub path: PathBuf,
}

impl FileManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ManifestSource for FileManifestSource {
    fn fetch(&self) -> Result<Vec<ImageRecord>> {
        read_manifest(&self.path)
    }
}

/// An in-memory manifest.
impl ManifestSource for Vec<ImageRecord> {
    fn fetch(&self) -> Result<Vec<ImageRecord>> {
        Ok(self.clone())
    }
}

/// Natural pixel size of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
}

impl TextureInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Loads the image behind a manifest record.
pub trait TextureLoader {
    fn load(&mut self, record: &ImageRecord) -> Result<TextureInfo>;
}

impl<F> TextureLoader for F
where
    F: FnMut(&ImageRecord) -> Result<TextureInfo>,
{
    fn load(&mut self, record: &ImageRecord) -> Result<TextureInfo> {
        self(record)
    }
}

/// Resolves [`ImageRecord::path`] under an asset root and reads the image header.
#[derive(Debug, Clone)]
pub struct ImageFileLoader {
    pub root: PathBuf,
}

impl ImageFileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File system location of `record`.
    pub fn resolve(&self, record: &ImageRecord) -> PathBuf {
        self.root.join(record.path.trim_start_matches('/'))
    }
}

impl TextureLoader for ImageFileLoader {
    fn load(&mut self, record: &ImageRecord) -> Result<TextureInfo> {
        let path = self.resolve(record);
        let (width, height) = image::image_dimensions(&path)?;
        checked(&path, width, height)
    }
}

/// Trusts the dimensions stored in the manifest without touching the disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestDimensions;

impl TextureLoader for ManifestDimensions {
    fn load(&mut self, record: &ImageRecord) -> Result<TextureInfo> {
        checked(Path::new(&record.path), record.width, record.height)
    }
}

fn checked(path: &Path, width: u32, height: u32) -> Result<TextureInfo> {
    if width == 0 || height == 0 {
        return Err(Error::Other(format!(
            "'{}' has zero dimension {}x{}",
            path.display(),
            width,
            height
        )));
    }
    Ok(TextureInfo::new(width, height))
}

#[cfg(test)]
mod tests {
    use image::{Rgb as Px, RgbImage};

    use super::*;
    use crate::color::Rgb;
    use crate::manifest::write_manifest;

    fn record(name: &str, width: u32, height: u32) -> ImageRecord {
        ImageRecord {
            filename: name.into(),
            path: format!("/images/{name}"),
            width,
            height,
            size: 0,
            average_color: Rgb::BLACK,
        }
    }

    #[test]
    fn file_source_reads_manifest() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("imageData.json");
        write_manifest(&path, &[record("a.png", 3, 4)]).expect("write");

        let fetched = FileManifestSource::new(&path).fetch().expect("fetch");
        assert_eq!(fetched, vec![record("a.png", 3, 4)]);
    }

    #[test]
    fn file_source_reports_missing_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let source = FileManifestSource::new(tmp.path().join("missing.json"));
        assert!(matches!(source.fetch(), Err(Error::Path { .. })));
    }

    #[test]
    fn image_loader_reads_dimensions_under_root() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("images")).expect("mkdir");
        RgbImage::from_pixel(30, 12, Px([1, 2, 3]))
            .save(tmp.path().join("images/wide.png"))
            .expect("save");

        let mut loader = ImageFileLoader::new(tmp.path());
        let info = loader.load(&record("wide.png", 1, 1)).expect("load");
        assert_eq!(info, TextureInfo::new(30, 12));
        assert!((info.aspect_ratio() - 2.5).abs() < 1e-6);

        assert!(loader.load(&record("absent.png", 1, 1)).is_err());
    }

    #[test]
    fn manifest_dimensions_rejects_zero() {
        let mut loader = ManifestDimensions;
        assert_eq!(
            loader.load(&record("a.png", 5, 6)).expect("load"),
            TextureInfo::new(5, 6)
        );
        assert!(loader.load(&record("b.png", 0, 6)).is_err());
    }

    #[test]
    fn closures_are_loaders() {
        let mut calls = 0;
        let mut loader = |r: &ImageRecord| {
            calls += 1;
            Ok::<_, Error>(TextureInfo::new(r.width, r.height))
        };
        loader.load(&record("a.png", 1, 2)).expect("load");
        assert_eq!(calls, 1);
    }
}
