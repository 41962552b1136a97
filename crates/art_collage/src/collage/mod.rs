//! The collage coordinator: owns the scene state and drives sequential image loading.
//!
//! A [`Collage`] holds the current [`Viewport`], the background plane, the seeded
//! random source, and the append-only list of [`PlacedImage`]s. Loading is pulled
//! one record at a time from a [`LoadQueue`], so each placement sees the final
//! position of every image before it.
use std::time::Duration;

use glam::{Vec2, Vec3};
use rand::RngCore;
use tracing::{debug, error, info, warn};

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::events::{CollageEvent, EventSink};
use crate::layout::{
    coverage_ratio, edge_score, find_next_position, fit_size, is_density_sufficient,
    PlacedRectangle, SpiralConfig, Viewport, DEFAULT_BASE_SIZE_FRACTION, DEFAULT_CAMERA_DISTANCE,
    DEFAULT_FOV_DEGREES,
};
use crate::manifest::ImageRecord;
use crate::random::shuffle;

pub mod queue;
pub mod source;

pub use queue::LoadQueue;
pub use source::{
    FileManifestSource, ImageFileLoader, ManifestDimensions, ManifestSource, TextureInfo,
    TextureLoader,
};

/// Paper tint of the background plane.
pub const BACKGROUND_TINT: Rgb = Rgb::new(0xf2, 0xee, 0xe5);

/// Configuration for a collage session.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct CollageConfig {
    /// Vertical field of view of the camera, in degrees.
    pub fov_degrees: f32,
    /// Distance of the camera from the image plane.
    pub camera_distance: f32,
    /// Window size in pixels, used for the aspect ratio.
    pub window_size: (u32, u32),
    /// Longest image side relative to the shorter viewport side.
    pub base_size_fraction: f32,
    /// Pause before each image load.
    pub pacing: Duration,
    /// Spiral search constants.
    pub spiral: SpiralConfig,
    /// Background extent relative to the viewport.
    pub background_scale: f32,
    /// Depth of the background plane.
    pub background_depth: f32,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            camera_distance: DEFAULT_CAMERA_DISTANCE,
            window_size: (1920, 1080),
            base_size_fraction: DEFAULT_BASE_SIZE_FRACTION,
            pacing: Duration::from_millis(30),
            spiral: SpiralConfig::default(),
            background_scale: 1.5,
            background_depth: -2.0,
        }
    }
}

impl CollageConfig {
    /// Creates a new [`CollageConfig`] for a window of the given pixel size.
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_size: (window_width, window_height),
            ..Default::default()
        }
    }

    /// Sets the pause before each load.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Sets the camera field of view and distance.
    pub fn with_camera(mut self, fov_degrees: f32, distance: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self.camera_distance = distance;
        self
    }

    /// Sets the image size fraction.
    pub fn with_base_size_fraction(mut self, fraction: f32) -> Self {
        self.base_size_fraction = fraction;
        self
    }

    /// Sets the spiral search constants.
    pub fn with_spiral(mut self, spiral: SpiralConfig) -> Self {
        self.spiral = spiral;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(Error::InvalidConfig(
                "fov_degrees must be in (0, 180)".into(),
            ));
        }
        if self.camera_distance <= 0.0 {
            return Err(Error::InvalidConfig("camera_distance must be > 0".into()));
        }
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Err(Error::InvalidConfig(
                "window_size must be > 0 in both components".into(),
            ));
        }
        if self.base_size_fraction <= 0.0 {
            return Err(Error::InvalidConfig(
                "base_size_fraction must be > 0".into(),
            ));
        }
        if self.background_scale <= 0.0 {
            return Err(Error::InvalidConfig("background_scale must be > 0".into()));
        }
        self.spiral.validate()
    }

    fn viewport_for(&self, width_px: u32, height_px: u32) -> Viewport {
        Viewport::for_window(
            self.fov_degrees,
            self.camera_distance,
            width_px,
            height_px,
        )
    }
}

/// The paper plane behind all images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    /// Center of the plane.
    pub position: Vec3,
    /// Width and height in world units.
    pub extent: Vec2,
    pub tint: Rgb,
}

impl Background {
    fn covering(viewport: &Viewport, scale: f32, depth: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, depth),
            extent: viewport.extent() * scale,
            tint: BACKGROUND_TINT,
        }
    }
}

/// An image and where it sits in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    pub record: ImageRecord,
    pub rect: PlacedRectangle,
}

/// Result of pulling one record from the queue.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Placed(PlacedImage),
    Failed { path: String, message: String },
}

/// Tally of a load session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records in the manifest.
    pub queued: usize,
    /// Images placed in the scene.
    pub placed: usize,
    /// Images that failed to load.
    pub failed: usize,
}

pub struct Collage<R: RngCore> {
    config: CollageConfig,
    viewport: Viewport,
    background: Background,
    rects: Vec<PlacedRectangle>,
    placed: Vec<PlacedImage>,
    rng: R,
}

impl<R: RngCore> Collage<R> {
    pub fn try_new(config: CollageConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let (w, h) = config.window_size;
        let viewport = config.viewport_for(w, h);
        let background = Background::covering(
            &viewport,
            config.background_scale,
            config.background_depth,
        );
        Ok(Self {
            config,
            viewport,
            background,
            rects: Vec::new(),
            placed: Vec::new(),
            rng,
        })
    }

    pub fn config(&self) -> &CollageConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Placed images in placement order.
    pub fn placed(&self) -> &[PlacedImage] {
        &self.placed
    }

    /// Placed rectangles in placement order.
    pub fn rectangles(&self) -> &[PlacedRectangle] {
        &self.rects
    }

    /// Applies a window resize. Only placements made afterwards see the new viewport.
    pub fn resize(&mut self, width_px: u32, height_px: u32, sink: &mut dyn EventSink) -> Viewport {
        self.viewport = self.config.viewport_for(width_px, height_px.max(1));
        self.background = Background::covering(
            &self.viewport,
            self.config.background_scale,
            self.config.background_depth,
        );
        debug!(
            "Resized to {}x{} px, viewport {:.3}x{:.3}.",
            width_px, height_px, self.viewport.width, self.viewport.height
        );
        sink.send(CollageEvent::Resized {
            viewport: self.viewport,
        });
        self.viewport
    }

    /// Sizes `record` for the current viewport, finds a spot for it, and appends it.
    pub fn place(&mut self, record: ImageRecord, texture: TextureInfo) -> &PlacedImage {
        let size = fit_size(
            texture.aspect_ratio(),
            &self.viewport,
            self.config.base_size_fraction,
        );
        let position = find_next_position(
            size,
            &self.rects,
            &self.viewport,
            &self.config.spiral,
            &mut self.rng,
        );
        let rect = PlacedRectangle::new(position, size);
        self.rects.push(rect);
        self.placed.push(PlacedImage { record, rect });
        &self.placed[self.placed.len() - 1]
    }

    /// Fetches and shuffles the manifest, returning the queue of loads.
    ///
    /// A fetch failure is fatal for the session: nothing is queued.
    pub fn start(
        &mut self,
        source: &dyn ManifestSource,
        sink: &mut dyn EventSink,
    ) -> Result<LoadQueue> {
        let mut records = match source.fetch() {
            Ok(records) => records,
            Err(e) => {
                error!("Error loading images: {}", e);
                sink.send(CollageEvent::LoadAborted {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        shuffle(&mut records, &mut self.rng);
        info!("Loading {} images.", records.len());
        sink.send(CollageEvent::LoadStarted {
            count: records.len(),
        });
        Ok(LoadQueue::new(records, self.config.pacing))
    }

    /// Loads and places the next queued image. Returns `None` once the queue is drained.
    pub fn load_next(
        &mut self,
        queue: &mut LoadQueue,
        loader: &mut dyn TextureLoader,
        sink: &mut dyn EventSink,
    ) -> Option<LoadOutcome> {
        let (index, record) = queue.next()?;
        match loader.load(&record) {
            Ok(texture) => {
                let placed = self.place(record, texture).clone();
                sink.send(CollageEvent::ImagePlaced {
                    index,
                    placed: placed.clone(),
                });
                Some(LoadOutcome::Placed(placed))
            }
            Err(e) => {
                warn!("Error loading image: {} {}", record.path, e);
                sink.send(CollageEvent::ImageFailed {
                    index,
                    path: record.path.clone(),
                    message: e.to_string(),
                });
                Some(LoadOutcome::Failed {
                    path: record.path,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Runs a whole session: fetch, shuffle, then load every image in turn.
    pub fn load_all(
        &mut self,
        source: &dyn ManifestSource,
        loader: &mut dyn TextureLoader,
        sink: &mut dyn EventSink,
    ) -> Result<LoadSummary> {
        let mut queue = self.start(source, sink)?;
        let mut summary = LoadSummary {
            queued: queue.len(),
            ..Default::default()
        };

        while let Some(outcome) = self.load_next(&mut queue, loader, sink) {
            match outcome {
                LoadOutcome::Placed(_) => summary.placed += 1,
                LoadOutcome::Failed { .. } => summary.failed += 1,
            }
        }

        info!(
            "Placed {} of {} images ({} failed).",
            summary.placed, summary.queued, summary.failed
        );
        sink.send(CollageEvent::LoadFinished { summary });
        Ok(summary)
    }

    /// Sum of placed areas over the viewport area.
    pub fn coverage(&self) -> f32 {
        coverage_ratio(&self.rects, &self.viewport)
    }

    /// Returns true once coverage reaches `threshold`.
    pub fn is_density_sufficient(&self, threshold: f32) -> bool {
        is_density_sufficient(&self.rects, &self.viewport, threshold)
    }

    /// How far `rect` sticks out of the current viewport.
    pub fn edge_score(&self, rect: &PlacedRectangle) -> f32 {
        edge_score(
            rect.x(),
            rect.y(),
            rect.width(),
            rect.height(),
            &self.viewport,
        )
    }
}
