//! Fill and edge metrics over placed rectangles.
//!
//! These are measurements only. [`crate::layout::spiral::find_next_position`] does not
//! consult them; callers may use them as a stopping condition or to score candidates.
use crate::layout::{PlacedRectangle, Viewport};

/// Coverage above which the viewport counts as filled. Overlap is counted twice,
/// so values above 1 are reachable.
pub const DEFAULT_DENSITY_THRESHOLD: f32 = 2.0;

/// Sum of placed rectangle areas divided by the viewport area.
pub fn coverage_ratio(placed: &[PlacedRectangle], viewport: &Viewport) -> f32 {
    let total = viewport.area();
    if total <= 0.0 {
        return 0.0;
    }
    placed.iter().map(PlacedRectangle::area).sum::<f32>() / total
}

/// Returns true once [`coverage_ratio`] reaches `threshold`.
pub fn is_density_sufficient(
    placed: &[PlacedRectangle],
    viewport: &Viewport,
    threshold: f32,
) -> bool {
    coverage_ratio(placed, viewport) >= threshold
}

/// How far a rectangle centered at (`x`, `y`) sticks out of the viewport, summed over both axes.
pub fn edge_score(x: f32, y: f32, width: f32, height: f32, viewport: &Viewport) -> f32 {
    let x_edge = (x.abs() + width / 2.0 - viewport.width / 2.0).max(0.0);
    let y_edge = (y.abs() + height / 2.0 - viewport.height / 2.0).max(0.0);
    x_edge + y_edge
}

/// Bonus of 2 for positions within 20% of a viewport extent from `±width` or `±height`.
pub fn edge_bonus(x: f32, y: f32, viewport: &Viewport) -> f32 {
    let x_edge = (x - viewport.width).abs().min((x + viewport.width).abs());
    let y_edge = (y - viewport.height).abs().min((y + viewport.height).abs());
    if x_edge < viewport.width * 0.2 || y_edge < viewport.height * 0.2 {
        2.0
    } else {
        0.0
    }
}
