//! Collage layout: viewport geometry, image sizing, and spiral placement.
//!
//! Positions are in world units on a plane facing the camera, centered on the
//! origin. `z` is a small depth offset used for layering.
use glam::{Vec2, Vec3};

pub mod density;
pub mod spiral;

pub use density::{coverage_ratio, edge_bonus, edge_score, is_density_sufficient};
pub use spiral::{find_next_position, overlaps, SpiralConfig};

/// Default vertical field of view of the collage camera, in degrees.
pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
/// Default distance of the camera from the image plane.
pub const DEFAULT_CAMERA_DISTANCE: f32 = 15.0;
/// Longest side of a placed image relative to the shorter viewport side.
pub const DEFAULT_BASE_SIZE_FRACTION: f32 = 0.35;

/// Visible extent of the image plane in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport seen by a perspective camera at `distance` from the plane.
    pub fn from_camera(fov_degrees: f32, distance: f32, aspect: f32) -> Self {
        let height = 2.0 * (fov_degrees.to_radians() / 2.0).tan() * distance;
        Self {
            width: height * aspect,
            height,
        }
    }

    /// Viewport for a window of `width_px x height_px` pixels.
    pub fn for_window(fov_degrees: f32, distance: f32, width_px: u32, height_px: u32) -> Self {
        let aspect = width_px as f32 / height_px.max(1) as f32;
        Self::from_camera(fov_degrees, distance, aspect)
    }

    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// An axis-aligned rectangle placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedRectangle {
    /// Center of the rectangle.
    pub position: Vec3,
    /// Width and height in world units.
    pub size: Vec2,
}

impl PlacedRectangle {
    pub fn new(position: Vec3, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn z(&self) -> f32 {
        self.position.z
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }
}

/// On-screen size of an image with the given aspect ratio.
///
/// The longer side is always `fraction * viewport.min_side()`.
pub fn fit_size(aspect_ratio: f32, viewport: &Viewport, fraction: f32) -> Vec2 {
    let base = viewport.min_side() * fraction;
    if aspect_ratio >= 1.0 {
        Vec2::new(base, base / aspect_ratio)
    } else {
        Vec2::new(base * aspect_ratio, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_viewport_matches_perspective_formula() {
        let vp = Viewport::from_camera(90.0, 10.0, 2.0);
        assert!((vp.height - 20.0).abs() < 1e-4);
        assert!((vp.width - 40.0).abs() < 1e-4);

        let default = Viewport::for_window(DEFAULT_FOV_DEGREES, DEFAULT_CAMERA_DISTANCE, 1600, 900);
        let expected_h = 2.0 * (37.5f32.to_radians()).tan() * 15.0;
        assert!((default.height - expected_h).abs() < 1e-4);
        assert!((default.width - expected_h * 16.0 / 9.0).abs() < 1e-3);
    }

    #[test]
    fn fit_size_bounds_longer_side() {
        let vp = Viewport::new(10.0, 8.0);
        let base = 0.35 * 8.0;

        let square = fit_size(1.0, &vp, DEFAULT_BASE_SIZE_FRACTION);
        assert_eq!(square, Vec2::splat(base));

        let wide = fit_size(2.0, &vp, DEFAULT_BASE_SIZE_FRACTION);
        assert_eq!(wide.x, base);
        assert!(wide.x >= wide.y);
        assert!((wide.y - base / 2.0).abs() < 1e-6);

        let tall = fit_size(0.5, &vp, DEFAULT_BASE_SIZE_FRACTION);
        assert_eq!(tall.y, base);
        assert!(tall.x < tall.y);
        assert!((tall.x - base / 2.0).abs() < 1e-6);
    }

    #[test]
    fn placed_rectangle_accessors() {
        let r = PlacedRectangle::new(Vec3::new(1.0, 2.0, -0.25), Vec2::new(3.0, 4.0));
        assert_eq!((r.x(), r.y(), r.z()), (1.0, 2.0, -0.25));
        assert_eq!((r.width(), r.height()), (3.0, 4.0));
        assert_eq!(r.area(), 12.0);
    }
}
