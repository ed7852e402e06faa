//! 2D affine maps `x ↦ M x + t` for placing figures.
//!
//! Composition reads like a matrix stack: `a.compose(&b)` applies `b` first,
//! then `a`. Pushing "translate, then rotate" onto a stack gives
//! `translation(t).compose(&rotation_deg(θ))`.

use nalgebra::{Matrix2, Vector2};

use crate::square::Point2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aff2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Default for Aff2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Aff2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    #[inline]
    pub fn translation(t: Vector2<f64>) -> Self {
        Self {
            m: Matrix2::identity(),
            t,
        }
    }

    /// Counterclockwise rotation about the origin, in degrees.
    pub fn rotation_deg(deg: f64) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        Self {
            m: Matrix2::new(c, -s, s, c),
            t: Vector2::zeros(),
        }
    }

    /// `self ∘ other`: apply `other`, then `self`.
    #[inline]
    pub fn compose(&self, other: &Aff2) -> Aff2 {
        Aff2 {
            m: self.m * other.m,
            t: self.m * other.t + self.t,
        }
    }

    #[inline]
    pub fn apply(&self, p: Point2) -> Point2 {
        self.m * p + self.t
    }

    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn quarter_turn_is_counterclockwise() {
        let r = Aff2::rotation_deg(90.0);
        let p = r.apply(vector![1.0, 0.0]);
        assert!((p - vector![0.0, 1.0]).norm() < 1e-12);
    }

    #[test]
    fn compose_applies_right_first() {
        let t = Aff2::translation(vector![30.0, 30.0]);
        let r = Aff2::rotation_deg(180.0);
        // translate-then-rotate on the stack: rotate the vertex, then move it
        let p = t.compose(&r).apply(vector![1.0, 2.0]);
        assert!((p - vector![29.0, 28.0]).norm() < 1e-12);
        // the other order moves first and rotates the result about the origin
        let q = r.compose(&t).apply(vector![1.0, 2.0]);
        assert!((q - vector![-31.0, -32.0]).norm() < 1e-12);
    }

    #[test]
    fn inverse_round_trips() {
        let f = Aff2::translation(vector![3.0, -1.0]).compose(&Aff2::rotation_deg(33.0));
        let g = f.inverse().unwrap();
        let p = vector![0.4, -2.5];
        assert!((g.apply(f.apply(p)) - p).norm() < 1e-12);
        let singular = Aff2 {
            m: Matrix2::zeros(),
            t: Vector2::zeros(),
        };
        assert!(singular.inverse().is_none());
    }
}
