//! Iso-lines of a scalar field by marching squares.
//!
//! The domain box is cut into cells of side `step` (the last row and column
//! are clipped to the box). Each cell corner is classified as below the iso
//! value or not, and the resulting 4-bit case picks the cell edges the line
//! crosses. Output is an unordered list of segments; nothing is stitched.
//!
//! Case bits: top-left 8, top-right 4, bottom-right 2, bottom-left 1.
//! Edges: 0 top, 1 right, 2 bottom, 3 left.

use nalgebra::Vector2;
use tracing::debug;

use crate::square::Point2;
use crate::view::Ortho2;

/// Upper bound on cells per call.
pub const MAX_CELLS: usize = 1 << 24;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContourError {
    #[error("grid step must be finite and > 0, got {step}")]
    Step { step: f64 },
    #[error("empty domain: {reason}")]
    Domain { reason: String },
    #[error("grid of {cells} cells exceeds the cell limit")]
    TooManyCells { cells: f64 },
}

/// A line segment from `a` to `b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Point2,
    pub b: Point2,
}

/// Where a crossing sits on a cell edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgePlacement {
    /// Edge midpoint, as in the classroom implementation.
    #[default]
    Midpoint,
    /// Linear interpolation of the field along the edge.
    Interpolated,
}

#[derive(Clone, Copy, Debug)]
pub struct ContourCfg {
    pub step: f64,
    pub iso: f64,
    pub placement: EdgePlacement,
}

impl Default for ContourCfg {
    fn default() -> Self {
        Self {
            step: 0.1,
            iso: 1.0,
            placement: EdgePlacement::Midpoint,
        }
    }
}

/// The sample fields the drawing exercises contour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// `x² + y²`
    Circle,
    /// `sin(x·y)`
    SinXy,
    /// `sin(x)·cos(y)`
    SinCos,
}

impl Field {
    pub fn eval(self, x: f64, y: f64) -> f64 {
        match self {
            Field::Circle => x * x + y * y,
            Field::SinXy => (x * y).sin(),
            Field::SinCos => x.sin() * y.cos(),
        }
    }
}

// Edge pairs per case. Cases 5 and 10 are saddles and emit two segments.
const CASES: [&[(u8, u8)]; 16] = [
    &[],
    &[(2, 3)],
    &[(1, 2)],
    &[(1, 3)],
    &[(0, 1)],
    &[(0, 1), (2, 3)],
    &[(0, 2)],
    &[(0, 3)],
    &[(0, 3)],
    &[(0, 2)],
    &[(0, 3), (1, 2)],
    &[(0, 1)],
    &[(1, 3)],
    &[(1, 2)],
    &[(2, 3)],
    &[],
];

/// Grid coordinates along one axis: `n + 1` ticks from `lo`, the last at `hi`.
#[derive(Clone, Copy, Debug)]
struct Axis {
    lo: f64,
    hi: f64,
    step: f64,
    cells: usize,
}

impl Axis {
    fn at(&self, i: usize) -> f64 {
        (self.lo + i as f64 * self.step).min(self.hi)
    }
}

fn axes(domain: &Ortho2, step: f64) -> Result<(Axis, Axis), ContourError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(ContourError::Step { step });
    }
    let w = domain.right - domain.left;
    let h = domain.top - domain.bottom;
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return Err(ContourError::Domain {
            reason: format!("width {w}, height {h}"),
        });
    }
    // Tolerate spans that are a whole number of steps up to rounding.
    let nx = (w / step - 1e-9).ceil().max(1.0);
    let ny = (h / step - 1e-9).ceil().max(1.0);
    let cells = nx * ny;
    if cells > MAX_CELLS as f64 {
        return Err(ContourError::TooManyCells { cells });
    }
    Ok((
        Axis {
            lo: domain.left,
            hi: domain.right,
            step,
            cells: nx as usize,
        },
        Axis {
            lo: domain.bottom,
            hi: domain.top,
            step,
            cells: ny as usize,
        },
    ))
}

/// Iso-line segments of `field` at `cfg.iso` over `domain`.
pub fn marching_squares<F>(
    field: F,
    domain: &Ortho2,
    cfg: &ContourCfg,
) -> Result<Vec<Segment>, ContourError>
where
    F: Fn(f64, f64) -> f64,
{
    let (ax, ay) = axes(domain, cfg.step)?;
    let stride = ax.cells + 1;
    let mut values = Vec::with_capacity(stride * (ay.cells + 1));
    for j in 0..=ay.cells {
        let y = ay.at(j);
        for i in 0..=ax.cells {
            values.push(field(ax.at(i), y));
        }
    }
    let value = |i: usize, j: usize| values[j * stride + i];

    let mut out = Vec::new();
    for j in 0..ay.cells {
        for i in 0..ax.cells {
            let (x0, x1, y0, y1) = (ax.at(i), ax.at(i + 1), ay.at(j), ay.at(j + 1));
            let bl = (Vector2::new(x0, y0), value(i, j));
            let br = (Vector2::new(x1, y0), value(i + 1, j));
            let tr = (Vector2::new(x1, y1), value(i + 1, j + 1));
            let tl = (Vector2::new(x0, y1), value(i, j + 1));
            let below = |v: f64| v < cfg.iso;
            let case = usize::from(below(tl.1)) << 3
                | usize::from(below(tr.1)) << 2
                | usize::from(below(br.1)) << 1
                | usize::from(below(bl.1));
            // Endpoints run from the lower to the higher coordinate, so a shared
            // edge yields the same crossing from both neighbouring cells.
            let edge = |e: u8| {
                let (a, b) = match e {
                    0 => (tl, tr),
                    1 => (br, tr),
                    2 => (bl, br),
                    _ => (bl, tl),
                };
                crossing(a, b, cfg.iso, cfg.placement)
            };
            for &(e0, e1) in CASES[case] {
                out.push(Segment {
                    a: edge(e0),
                    b: edge(e1),
                });
            }
        }
    }
    debug!(
        cells_x = ax.cells,
        cells_y = ay.cells,
        iso = cfg.iso,
        segments = out.len(),
        "marching squares"
    );
    Ok(out)
}

fn crossing(a: (Point2, f64), b: (Point2, f64), iso: f64, placement: EdgePlacement) -> Point2 {
    let t = match placement {
        EdgePlacement::Midpoint => 0.5,
        EdgePlacement::Interpolated => {
            let t = (iso - a.1) / (b.1 - a.1);
            if t.is_finite() {
                t.clamp(0.0, 1.0)
            } else {
                0.5
            }
        }
    };
    a.0 + (b.0 - a.0) * t
}

/// Background grid: horizontal lines bottom to top, then vertical lines left
/// to right, one per grid tick.
pub fn grid_lines(domain: &Ortho2, step: f64) -> Result<Vec<Segment>, ContourError> {
    let (ax, ay) = axes(domain, step)?;
    let horizontal = (0..=ay.cells).map(|j| Segment {
        a: Vector2::new(ax.lo, ay.at(j)),
        b: Vector2::new(ax.hi, ay.at(j)),
    });
    let vertical = (0..=ax.cells).map(|i| Segment {
        a: Vector2::new(ax.at(i), ay.lo),
        b: Vector2::new(ax.at(i), ay.hi),
    });
    Ok(horizontal.chain(vertical).collect())
}
