//! Orthographic view boxes: world coordinates → NDC → window pixels.
//!
//! Pixels have their origin at the top-left corner with y pointing down; NDC
//! spans `[-1,1]²` with y pointing up.

use nalgebra::Vector2;

use crate::square::Point2;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error("degenerate view box: {reason}")]
    Degenerate { reason: String },
    #[error("window size must be positive, got {width}x{height}")]
    EmptyWindow { width: u32, height: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ortho2 {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Ortho2 {
    /// Box around the chaos-game square with a 0.1 margin.
    pub const DOT_PLOT: Ortho2 = Ortho2 {
        left: -1.1,
        right: 1.1,
        bottom: -1.1,
        top: 1.1,
    };

    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Result<Self, ViewError> {
        let o = Self {
            left,
            right,
            bottom,
            top,
        };
        o.validate()?;
        Ok(o)
    }

    fn validate(&self) -> Result<(), ViewError> {
        let w = self.right - self.left;
        let h = self.top - self.bottom;
        if !(w.is_finite() && h.is_finite()) || w == 0.0 || h == 0.0 {
            return Err(ViewError::Degenerate {
                reason: format!("width {w}, height {h}"),
            });
        }
        Ok(())
    }

    /// World → normalized device coordinates.
    #[inline]
    pub fn to_ndc(&self, p: Point2) -> Point2 {
        Vector2::new(
            2.0 * (p.x - self.left) / (self.right - self.left) - 1.0,
            2.0 * (p.y - self.bottom) / (self.top - self.bottom) - 1.0,
        )
    }

    /// World → pixel coordinates for a `width × height` window.
    pub fn to_pixel(&self, p: Point2, width: u32, height: u32) -> Result<Point2, ViewError> {
        if width == 0 || height == 0 {
            return Err(ViewError::EmptyWindow { width, height });
        }
        self.validate()?;
        let ndc = self.to_ndc(p);
        Ok(Vector2::new(
            (ndc.x + 1.0) * 0.5 * f64::from(width),
            (1.0 - ndc.y) * 0.5 * f64::from(height),
        ))
    }
}
