//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for project-internal
//!   callers (the CLI, benches, examples). Breaking changes are allowed.

// Chaos game
pub use crate::chaos::{
    generate_points, point_count, ChaosCfg, ChaosError, ChaosGenerator, SeedPointMode, Step,
    DEFAULT_MAX_CORNER_DRAWS,
};
pub use crate::source::{RandomSource, RngSource, ScriptedSource, SourceError};
pub use crate::square::{corner, diagonal_of, is_diagonal, midpoint, Point2, CORNERS};
// Placement and views
pub use crate::affine::Aff2;
pub use crate::ring::{parse_figure, Figure, FigureError, RingAnimation, RingCfg, RING_VIEW};
pub use crate::view::{Ortho2, ViewError};
// Contours
pub use crate::contour::{
    grid_lines, marching_squares, ContourCfg, ContourError, EdgePlacement, Field, Segment, MAX_CELLS,
};

/// Pixel coordinates of every point, for a `width × height` window showing `view`.
pub fn to_pixels(
    points: &[Point2],
    view: &Ortho2,
    width: u32,
    height: u32,
) -> Result<Vec<Point2>, ViewError> {
    points
        .iter()
        .map(|&p| view.to_pixel(p, width, height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn seeded_points_map_into_window() {
        let pts = generate_points(200, 5, ChaosCfg::default()).unwrap();
        let px = to_pixels(&pts, &Ortho2::DOT_PLOT, 640, 480).unwrap();
        assert_eq!(px.len(), pts.len());
        for p in px {
            assert!((0.0..=640.0).contains(&p.x));
            assert!((0.0..=480.0).contains(&p.y));
        }
    }

    #[test]
    fn empty_window_is_rejected() {
        let pts = vec![vector![0.0, 0.0]];
        assert!(to_pixels(&pts, &Ortho2::DOT_PLOT, 640, 0).is_err());
        assert!(to_pixels(&[], &Ortho2::DOT_PLOT, 640, 0).unwrap().is_empty());
    }
}
