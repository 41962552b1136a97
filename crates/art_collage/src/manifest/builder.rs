//! Builds the hue-sorted image manifest from a directory of images.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::color::{dominant_color, Rgb, DEFAULT_SAMPLE_SIZE};
use crate::error::{Error, Result};
use crate::events::{CollageEvent, EventSink};
use crate::manifest::{sort_by_hue, write_manifest, ImageRecord};

/// Configuration for a manifest build.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ManifestConfig {
    /// Directory holding the images. Not searched recursively.
    pub input_dir: PathBuf,
    /// Where the JSON manifest is written.
    pub output_path: PathBuf,
    /// Prefix joined with the file name to form [`ImageRecord::path`].
    pub public_prefix: String,
    /// Edge length of the thumbnail used for the dominant color.
    pub sample_size: u32,
    /// Progress is reported every `progress_interval` directory entries.
    pub progress_interval: usize,
    /// Accepted file extensions, compared case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("public/images"),
            output_path: PathBuf::from("public/imageData.json"),
            public_prefix: "/images".into(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            progress_interval: 100,
            extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
        }
    }
}

impl ManifestConfig {
    /// Creates a new [`ManifestConfig`] reading from `input_dir` and writing to `output_path`.
    pub fn new(input_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    /// Sets the public path prefix.
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefix = prefix.into();
        self
    }

    /// Sets the thumbnail size used for color extraction.
    pub fn with_sample_size(mut self, sample_size: u32) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Sets the progress reporting interval.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Replaces the accepted extensions.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(Error::InvalidConfig("sample_size must be > 0".into()));
        }
        if self.progress_interval == 0 {
            return Err(Error::InvalidConfig("progress_interval must be > 0".into()));
        }
        if self.extensions.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one extension must be accepted".into(),
            ));
        }
        Ok(())
    }

    /// Returns true if `filename` has one of the accepted extensions.
    pub fn accepts(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    fn public_path(&self, filename: &str) -> String {
        let prefix = self.public_prefix.trim_end_matches('/');
        format!("{prefix}/{filename}")
    }
}

/// Outcome of [`ManifestBuilder::run`].
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Directory entries seen, accepted or not.
    pub entries: usize,
    /// Records written to the manifest.
    pub records: usize,
    /// Accepted files dropped because their metadata could not be read.
    pub skipped: usize,
    /// Records whose color fell back to black.
    pub color_fallbacks: usize,
}

pub struct ManifestBuilder {
    /// Build configuration.
    pub config: ManifestConfig,
}

impl ManifestBuilder {
    pub fn try_new(config: ManifestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Analyzes every accepted image and returns the records sorted by hue.
    pub fn build(&self, sink: &mut dyn EventSink) -> Result<(Vec<ImageRecord>, BuildReport)> {
        let dir = &self.config.input_dir;
        let filenames = list_dir(dir)?;
        let total = filenames.len();
        info!("Found {} files in {}", total, dir.display());

        let mut report = BuildReport {
            entries: total,
            ..Default::default()
        };
        let mut records = Vec::new();

        for (index, filename) in filenames.iter().enumerate() {
            if !self.config.accepts(filename) {
                continue;
            }

            match self.analyze(filename, sink) {
                Ok((record, fell_back)) => {
                    if fell_back {
                        report.color_fallbacks += 1;
                    }
                    records.push(record);

                    let processed = index + 1;
                    if processed % self.config.progress_interval == 0 || processed == total {
                        info!("Processed {}/{} images...", processed, total);
                        sink.send(CollageEvent::ManifestProgress { processed, total });
                    }
                }
                Err(e) => {
                    warn!("Error processing {}: {}", filename, e);
                    report.skipped += 1;
                    sink.send(CollageEvent::ImageSkipped {
                        filename: filename.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        sort_by_hue(&mut records);
        report.records = records.len();
        Ok((records, report))
    }

    /// Builds the manifest and writes it to [`ManifestConfig::output_path`].
    pub fn run(&self, sink: &mut dyn EventSink) -> Result<BuildReport> {
        let (records, report) = self.build(sink)?;
        let output = &self.config.output_path;
        write_manifest(output, &records)?;

        info!("Success! Processed {} images.", records.len());
        info!("Data saved to {}", output.display());
        sink.send(CollageEvent::ManifestWritten {
            path: output.clone(),
            records: records.len(),
        });
        Ok(report)
    }

    /// Returns the record for one file and whether its color fell back to black.
    fn analyze(&self, filename: &str, sink: &mut dyn EventSink) -> Result<(ImageRecord, bool)> {
        let path = self.config.input_dir.join(filename);
        let size = fs::metadata(&path)
            .map_err(|e| Error::at_path(&path, e))?
            .len();
        let (width, height) = image::image_dimensions(&path)?;
        if width == 0 || height == 0 {
            return Err(Error::Other(format!("{filename} has zero dimension")));
        }

        let sample_size = self.config.sample_size;
        let (average_color, fell_back) = match image::open(&path) {
            Ok(img) => (dominant_color(&img, sample_size), false),
            Err(e) => {
                warn!("Error processing {}: {}", path.display(), e);
                sink.send(CollageEvent::ColorFallback {
                    filename: filename.to_owned(),
                    reason: e.to_string(),
                });
                (Rgb::BLACK, true)
            }
        };

        let record = ImageRecord {
            filename: filename.to_owned(),
            path: self.config.public_path(filename),
            width,
            height,
            size,
            average_color,
        };
        Ok((record, fell_back))
    }
}

/// Lists the entry names of `dir`, sorted for a reproducible processing order.
fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::at_path(dir, e))? {
        let entry = entry.map_err(|e| Error::at_path(dir, e))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("Skipping non UTF-8 file name {:?}", raw),
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use image::{ImageFormat, Rgb as Px, RgbImage};

    use super::*;
    use crate::events::VecSink;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32, color: [u8; 3]) {
        RgbImage::from_pixel(w, h, Px(color))
            .save_with_format(dir.join(name), ImageFormat::Png)
            .expect("write png");
    }

    /// A PNG whose header is intact but whose pixel data is cut off.
    fn write_truncated_png(dir: &Path, name: &str) {
        let mut bytes = Vec::new();
        RgbImage::from_pixel(64, 64, Px([10, 200, 30]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");
        // Keep everything up to the IDAT chunk type plus two bytes of compressed data.
        let idat = bytes
            .windows(4)
            .position(|w| w == b"IDAT")
            .expect("encoded png has IDAT");
        bytes.truncate(idat + 6);
        fs::write(dir.join(name), bytes).expect("write truncated png");
    }

    #[test]
    fn accepts_extensions_case_insensitively() {
        let config = ManifestConfig::default();
        assert!(config.accepts("a.jpg"));
        assert!(config.accepts("b.JPEG"));
        assert!(config.accepts("c.Png"));
        assert!(!config.accepts("d.gif"));
        assert!(!config.accepts("png"));
        assert!(!config.accepts("notes.txt"));
    }

    #[test]
    fn validate_rejects_zero_sample_size_and_interval() {
        let dir = PathBuf::from("in");
        assert!(ManifestConfig::new(&dir, "out.json")
            .with_sample_size(0)
            .validate()
            .is_err());
        assert!(ManifestConfig::new(&dir, "out.json")
            .with_progress_interval(0)
            .validate()
            .is_err());
        assert!(ManifestConfig::new(&dir, "out.json")
            .with_extensions(Vec::<String>::new())
            .validate()
            .is_err());
        assert!(ManifestConfig::new(&dir, "out.json").validate().is_ok());
    }

    #[test]
    fn builds_hue_sorted_manifest_and_skips_other_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let images = tmp.path().join("images");
        fs::create_dir_all(&images).expect("mkdir");
        write_png(&images, "blue.png", 100, 100, [10, 10, 240]);
        write_png(&images, "green.png", 200, 100, [10, 250, 10]);
        write_png(&images, "red.png", 100, 200, [240, 10, 10]);
        fs::write(images.join("readme.txt"), "not an image").expect("write txt");

        let output = tmp.path().join("imageData.json");
        let builder = ManifestBuilder::try_new(ManifestConfig::new(&images, &output))
            .expect("valid config");
        let mut sink = VecSink::new();
        let report = builder.run(&mut sink).expect("build");

        assert_eq!(report.entries, 4);
        assert_eq!(report.records, 3);
        assert_eq!(report.skipped, 0);

        let records = crate::manifest::read_manifest(&output).expect("read back");
        let names: Vec<_> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["red.png", "green.png", "blue.png"]);
        assert!(records.windows(2).all(|w| w[0].hue() <= w[1].hue()));

        let green = &records[1];
        assert_eq!((green.width, green.height), (200, 100));
        assert_eq!(green.path, "/images/green.png");
        assert!(green.size > 0);
        assert_eq!(green.average_color, Rgb::new(8, 248, 8));

        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, CollageEvent::ManifestWritten { records: 3, .. })));
    }

    #[test]
    fn corrupt_image_falls_back_to_black_and_sorts_first() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let images = tmp.path().join("images");
        fs::create_dir_all(&images).expect("mkdir");
        write_png(&images, "a_green.png", 40, 40, [10, 250, 10]);
        write_png(&images, "b_blue.png", 40, 40, [10, 10, 240]);
        write_truncated_png(&images, "c_broken.png");

        let builder = ManifestBuilder::try_new(ManifestConfig::new(
            &images,
            tmp.path().join("out.json"),
        ))
        .expect("valid config");
        let mut sink = VecSink::new();
        let (records, report) = builder.build(&mut sink).expect("build");

        assert_eq!(records.len(), 3);
        assert_eq!(report.color_fallbacks, 1);
        assert_eq!(records[0].filename, "c_broken.png");
        assert_eq!(records[0].average_color, Rgb::BLACK);
        assert_eq!((records[0].width, records[0].height), (64, 64));
        let fallbacks: Vec<_> = sink
            .as_slice()
            .iter()
            .filter_map(|e| match e {
                CollageEvent::ColorFallback { filename, .. } => Some(filename.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(fallbacks, ["c_broken.png"]);
    }

    #[test]
    fn unreadable_header_skips_record() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_png(tmp.path(), "ok.png", 10, 10, [0, 0, 200]);
        fs::write(tmp.path().join("garbage.jpg"), b"definitely not a jpeg").expect("write");

        let builder = ManifestBuilder::try_new(ManifestConfig::new(
            tmp.path(),
            tmp.path().join("out.json"),
        ))
        .expect("valid config");
        let mut sink = VecSink::new();
        let (records, report) = builder.build(&mut sink).expect("build");

        assert_eq!(records.len(), 1);
        assert_eq!(report.skipped, 1);
        let skipped: Vec<_> = sink
            .as_slice()
            .iter()
            .filter_map(|e| match e {
                CollageEvent::ImageSkipped { filename, .. } => Some(filename.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(skipped, ["garbage.jpg"]);
    }

    #[test]
    fn progress_reported_on_interval_and_last_entry() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for i in 0..5 {
            write_png(tmp.path(), &format!("img{i}.png"), 4, 4, [i * 40, 0, 0]);
        }

        let config = ManifestConfig::new(tmp.path(), tmp.path().join("out.json"))
            .with_progress_interval(2);
        let builder = ManifestBuilder::try_new(config).expect("valid config");
        let mut sink = VecSink::new();
        builder.build(&mut sink).expect("build");

        let processed: Vec<_> = sink
            .into_inner()
            .into_iter()
            .filter_map(|e| match e {
                CollageEvent::ManifestProgress { processed, total } => {
                    assert_eq!(total, 5);
                    Some(processed)
                }
                _ => None,
            })
            .collect();
        assert_eq!(processed, vec![2, 4, 5]);
    }

    #[test]
    fn missing_input_dir_is_fatal() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let builder = ManifestBuilder::try_new(ManifestConfig::new(
            tmp.path().join("nope"),
            tmp.path().join("out.json"),
        ))
        .expect("valid config");
        assert!(matches!(
            builder.run(&mut ()),
            Err(Error::Path { .. })
        ));
        assert!(!tmp.path().join("out.json").exists());
    }
}
