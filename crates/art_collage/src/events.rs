//! Event types and sinks for observing manifest builds and collage loads.
//!
//! This module defines [`CollageEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while running
//! [`crate::manifest::builder::ManifestBuilder`], [`crate::manifest::copy::copy_art`]
//! or [`crate::collage::Collage::load_next`]. A renderer can subscribe to
//! [`CollageEvent::ImagePlaced`] to add meshes as they appear.
use std::path::PathBuf;

use crate::collage::{LoadSummary, PlacedImage};
use crate::layout::Viewport;

/// Describes events emitted by the manifest and collage pipelines.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum CollageEvent {
    /// Periodic progress while building a manifest.
    ManifestProgress {
        /// One-based index of the directory entry just processed.
        processed: usize,
        /// Total number of directory entries.
        total: usize,
    },

    /// A file was dropped from the manifest because its metadata could not be read.
    ImageSkipped {
        filename: String,
        reason: String,
    },

    /// Color extraction failed and the record fell back to black.
    ColorFallback {
        filename: String,
        reason: String,
    },

    /// The manifest was written to disk.
    ManifestWritten {
        path: PathBuf,
        /// Number of records in the manifest.
        records: usize,
    },

    /// A file was copied into the flat image directory.
    FileCopied {
        filename: String,
    },

    /// Copying a single file failed.
    CopyFailed {
        path: PathBuf,
        message: String,
    },

    /// The manifest was fetched and the load sequence begins.
    LoadStarted {
        /// Number of records queued.
        count: usize,
    },

    /// An image was loaded and placed in the scene.
    ImagePlaced {
        /// Position of the record in the shuffled sequence.
        index: usize,
        placed: PlacedImage,
    },

    /// Loading a single image failed; it contributes no mesh.
    ImageFailed {
        index: usize,
        path: String,
        message: String,
    },

    /// The manifest could not be fetched or parsed. Nothing is loaded.
    LoadAborted {
        message: String,
    },

    /// Every queued record has been processed.
    LoadFinished {
        summary: LoadSummary,
    },

    /// The viewport changed after a window resize.
    Resized {
        viewport: Viewport,
    },
}

/// A generic event sink that accepts [`CollageEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: CollageEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: CollageEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(CollageEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(CollageEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(CollageEvent),
{
    #[inline]
    fn send(&mut self, event: CollageEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<CollageEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<CollageEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[CollageEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: CollageEvent) {
        self.events.push(event);
    }
}
