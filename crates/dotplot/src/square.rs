//! The fixed square `[-1,1]²` the chaos game plays on.
//!
//! - Corners are indexed 0..4 clockwise from the top-left:
//!   `(-1,1), (1,1), (1,-1), (-1,-1)`.
//! - Corner `i` and corner `(i + 2) % 4` are diagonal to each other.

use nalgebra::Vector2;

/// A point in the plane.
pub type Point2 = Vector2<f64>;

/// Number of corners of the square.
pub const CORNER_COUNT: usize = 4;

/// Half extent of the square; corners sit at `±HALF_EXTENT`.
pub const HALF_EXTENT: f64 = 1.0;

/// Corner coordinates, indexed 0..4.
pub const CORNERS: [[f64; 2]; CORNER_COUNT] = [[-1.0, 1.0], [1.0, 1.0], [1.0, -1.0], [-1.0, -1.0]];

/// Corner `i` as a point, or `None` if `i >= 4`.
#[inline]
pub fn corner(i: usize) -> Option<Point2> {
    CORNERS.get(i).map(|&[x, y]| Vector2::new(x, y))
}

/// Index of the corner diagonally opposite `i`.
#[inline]
pub fn diagonal_of(i: usize) -> usize {
    (i + 2) % CORNER_COUNT
}

/// True if choosing `next` after `prev` would jump across the diagonal.
#[inline]
pub fn is_diagonal(prev: usize, next: usize) -> bool {
    next % CORNER_COUNT == diagonal_of(prev)
}

#[inline]
pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    Vector2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Closed-square membership with slack `eps`.
#[inline]
pub fn contains_eps(p: Point2, eps: f64) -> bool {
    p.x.abs() <= HALF_EXTENT + eps && p.y.abs() <= HALF_EXTENT + eps
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn corners_are_clockwise_from_top_left() {
        assert_eq!(corner(0), Some(vector![-1.0, 1.0]));
        assert_eq!(corner(1), Some(vector![1.0, 1.0]));
        assert_eq!(corner(2), Some(vector![1.0, -1.0]));
        assert_eq!(corner(3), Some(vector![-1.0, -1.0]));
        assert_eq!(corner(4), None);
    }

    #[test]
    fn diagonals_pair_up() {
        assert!(is_diagonal(0, 2));
        assert!(is_diagonal(2, 0));
        assert!(is_diagonal(1, 3));
        assert!(is_diagonal(3, 1));
        for i in 0..CORNER_COUNT {
            assert!(!is_diagonal(i, i));
            assert!(!is_diagonal(i, (i + 1) % CORNER_COUNT));
            assert!(!is_diagonal(i, (i + 3) % CORNER_COUNT));
            // Diagonal corners are reflections through the origin.
            let a = corner(i).unwrap();
            let b = corner(diagonal_of(i)).unwrap();
            assert!((a + b).norm() < 1e-15);
        }
    }

    #[test]
    fn midpoint_stays_inside() {
        let m = midpoint(vector![0.5, 0.5], corner(1).unwrap());
        assert!((m - vector![0.75, 0.75]).norm() < 1e-15);
        assert!(contains_eps(m, 0.0));
        assert!(!contains_eps(vector![1.0 + 1e-6, 0.0], 0.0));
    }
}
