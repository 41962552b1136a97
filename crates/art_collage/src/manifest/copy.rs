//! Flattening copy of an art tree into the public image directory.
//!
//! Only basenames are kept, so files with the same name in different
//! subdirectories overwrite each other in walk order.
use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::events::{CollageEvent, EventSink};

/// Outcome of [`copy_art`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Files copied into the target directory.
    pub copied: usize,
    /// Files that could not be copied.
    pub failed: usize,
}

/// Default art source, `$HOME/Documents/Root/art`.
pub fn default_art_source() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join("Documents/Root/art"))
}

/// Recursively copies every regular file under `source` into `target`.
pub fn copy_art(source: &Path, target: &Path, sink: &mut dyn EventSink) -> Result<CopyReport> {
    fs::create_dir_all(target).map_err(|e| Error::at_path(target, e))?;
    let meta = fs::metadata(source).map_err(|e| Error::at_path(source, e))?;
    if !meta.is_dir() {
        return Err(Error::InvalidConfig(format!(
            "art source '{}' is not a directory",
            source.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(source)
        .sort(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect();
    files.sort();

    let mut report = CopyReport::default();
    for path in files {
        let Some(name) = path.file_name() else {
            continue;
        };
        let filename = name.to_string_lossy().into_owned();
        match fs::copy(&path, target.join(name)) {
            Ok(_) => {
                info!("Copied: {}", filename);
                report.copied += 1;
                sink.send(CollageEvent::FileCopied { filename });
            }
            Err(e) => {
                warn!("Error copying {}: {}", path.display(), e);
                report.failed += 1;
                sink.send(CollageEvent::CopyFailed {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    info!("All art files copied successfully!");
    Ok(report)
}
