//! Spiral search placement.
//!
//! Candidates are sampled on rings of growing radius along a fixed number of
//! arms whose angle drifts with the radius. A candidate is valid when it does
//! not overlap any placed rectangle, where the padding of the overlap test
//! grows with the depth difference between the two rectangles. Once enough valid candidates
//! are pooled, the one nearest the origin (with some random slack) wins.
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::RngCore;
use tracing::debug;

use crate::error::{Error, Result};
use crate::layout::{PlacedRectangle, Viewport};
use crate::random::{rand01, rand_centered};

/// Tuning constants of the spiral search.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct SpiralConfig {
    /// Base padding of the overlap test. Negative values allow that much overlap.
    pub overlap_padding: f32,
    /// Padding added per unit of depth difference.
    pub depth_relaxation: f32,
    /// Total spread of the random z offset, centered on 0.
    pub z_range: f32,
    /// Number of spiral arms.
    pub arms: usize,
    /// Maximum number of rings to search.
    pub max_rings: usize,
    /// Search stops after a ring once this many valid candidates are pooled.
    pub pool_target: usize,
    /// First ring radius as a fraction of the rectangle's shorter side.
    pub start_radius_factor: f32,
    /// Ring spacing as a fraction of the rectangle's shorter side.
    pub radius_step_factor: f32,
    /// Angle added per unit of radius.
    pub angle_drift: f32,
    /// Radial jitter as a fraction of the ring spacing.
    pub radial_jitter: f32,
    /// Random slack added to candidate distances, as a fraction of the width.
    pub distance_slack: f32,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            overlap_padding: -0.8,
            depth_relaxation: 0.5,
            z_range: 1.0,
            arms: 12,
            max_rings: 2000,
            pool_target: 15,
            start_radius_factor: 0.6,
            radius_step_factor: 0.2,
            angle_drift: 0.15,
            radial_jitter: 0.8,
            distance_slack: 0.5,
        }
    }
}

impl SpiralConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base overlap padding.
    pub fn with_overlap_padding(mut self, padding: f32) -> Self {
        self.overlap_padding = padding;
        self
    }

    /// Sets the per-unit-depth padding relaxation.
    pub fn with_depth_relaxation(mut self, relaxation: f32) -> Self {
        self.depth_relaxation = relaxation;
        self
    }

    /// Sets the spread of the random z offset.
    pub fn with_z_range(mut self, z_range: f32) -> Self {
        self.z_range = z_range;
        self
    }

    /// Sets the number of arms.
    pub fn with_arms(mut self, arms: usize) -> Self {
        self.arms = arms;
        self
    }

    /// Sets the ring limit.
    pub fn with_max_rings(mut self, max_rings: usize) -> Self {
        self.max_rings = max_rings;
        self
    }

    /// Sets the candidate pool target.
    pub fn with_pool_target(mut self, pool_target: usize) -> Self {
        self.pool_target = pool_target;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.arms == 0 {
            return Err(Error::InvalidConfig("arms must be > 0".into()));
        }
        if self.pool_target == 0 {
            return Err(Error::InvalidConfig("pool_target must be > 0".into()));
        }
        if self.radius_step_factor <= 0.0 {
            return Err(Error::InvalidConfig(
                "radius_step_factor must be > 0".into(),
            ));
        }
        if self.z_range < 0.0 || self.depth_relaxation < 0.0 {
            return Err(Error::InvalidConfig(
                "z_range and depth_relaxation must be >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Padding used between two rectangles whose depths differ by `dz`:
    /// `overlap_padding + depth_relaxation * |dz|`.
    #[inline]
    pub fn padding_for_depth(&self, dz: f32) -> f32 {
        self.overlap_padding + dz.abs() * self.depth_relaxation
    }
}

/// Strict overlap test between two centered rectangles, grown by `padding`.
#[inline]
pub fn overlaps(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2, padding: f32) -> bool {
    let d = (a_center - b_center).abs();
    let reach = (a_size + b_size) / 2.0 + Vec2::splat(padding);
    d.x < reach.x && d.y < reach.y
}

fn collides(
    candidate: Vec3,
    size: Vec2,
    placed: &[PlacedRectangle],
    config: &SpiralConfig,
) -> bool {
    placed.iter().any(|rect| {
        let padding = config.padding_for_depth(candidate.z - rect.position.z);
        overlaps(
            candidate.truncate(),
            size,
            rect.position.truncate(),
            rect.size,
            padding,
        )
    })
}

/// Finds a position for a rectangle of `size` among `placed`.
///
/// Returns the origin when nothing is placed yet, and a random position within
/// twice the viewport when the search finds no free spot.
pub fn find_next_position(
    size: Vec2,
    placed: &[PlacedRectangle],
    viewport: &Viewport,
    config: &SpiralConfig,
    rng: &mut dyn RngCore,
) -> Vec3 {
    if placed.is_empty() {
        return Vec3::ZERO;
    }

    let short_side = size.x.min(size.y);
    let radius_step = short_side * config.radius_step_factor;
    let mut radius = short_side * config.start_radius_factor;

    // (position, distance from origin)
    let mut pool: Vec<(Vec3, f32)> = Vec::new();

    for _ in 0..config.max_rings {
        for arm in 0..config.arms {
            let base_angle = arm as f32 * TAU / config.arms as f32;
            let angle = base_angle + radius * config.angle_drift;

            let jitter = rand_centered(rng) * radius_step * config.radial_jitter;
            let r = radius + jitter;
            let z = rand_centered(rng) * config.z_range;
            let candidate = Vec3::new(angle.cos() * r, angle.sin() * r, z);

            if !collides(candidate, size, placed, config) {
                pool.push((candidate, candidate.truncate().length()));
            }
        }

        radius += radius_step;
        if pool.len() >= config.pool_target {
            break;
        }
    }

    if pool.is_empty() {
        debug!(
            "No free spot for {}x{} after {} rings; using random fallback.",
            size.x, size.y, config.max_rings
        );
        return Vec3::new(
            rand_centered(rng) * viewport.width * 2.0,
            rand_centered(rng) * viewport.height * 2.0,
            rand_centered(rng) * config.z_range,
        );
    }

    let slack = size.x * config.distance_slack;
    pool.into_iter()
        .map(|(position, distance)| (position, distance + rand01(rng) * slack))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(position, _)| position)
        .unwrap_or(Vec3::ZERO)
}
