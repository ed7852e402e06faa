//! Ring of rotating figures.
//!
//! Copies of one polyline figure sit on equally spaced slots of a circle and
//! spin about their own origin, one `step_deg` per frame. Each copy is placed
//! with `T(slot) ∘ R(frame · step_deg)`: rotate the figure, then move it to its
//! slot. The frame counter lives in [`RingAnimation`], which the caller's frame
//! loop owns and advances.

use std::str::FromStr;

use nalgebra::Vector2;

use crate::affine::Aff2;
use crate::square::Point2;
use crate::view::Ortho2;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FigureError {
    #[error("token {index} ({token:?}) is not a number")]
    BadToken { index: usize, token: String },
    #[error("odd number of coordinates ({count}); expected x y pairs")]
    OddCount { count: usize },
}

/// An open polyline drawn as a line strip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Figure {
    pub vertices: Vec<Point2>,
}

impl Figure {
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn transformed(&self, f: &Aff2) -> Figure {
        Figure {
            vertices: self.vertices.iter().map(|&p| f.apply(p)).collect(),
        }
    }
}

/// Parse whitespace-separated floats as consecutive `x y` pairs.
pub fn parse_figure(text: &str) -> Result<Figure, FigureError> {
    let coords = text
        .split_whitespace()
        .enumerate()
        .map(|(index, tok)| {
            tok.parse::<f64>().map_err(|_| FigureError::BadToken {
                index,
                token: tok.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if coords.len() % 2 != 0 {
        return Err(FigureError::OddCount {
            count: coords.len(),
        });
    }
    Ok(Figure::new(
        coords
            .chunks_exact(2)
            .map(|xy| Vector2::new(xy[0], xy[1]))
            .collect(),
    ))
}

impl FromStr for Figure {
    type Err = FigureError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_figure(s)
    }
}

/// Ring layout configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RingCfg {
    pub center: Point2,
    pub radius: f64,
    /// Slot positions on the circle, degrees counterclockwise from +x.
    pub slot_angles_deg: Vec<f64>,
    /// Spin per frame, degrees counterclockwise.
    pub step_deg: f64,
}

impl Default for RingCfg {
    fn default() -> Self {
        Self {
            center: Vector2::new(30.0, 30.0),
            radius: 25.0,
            slot_angles_deg: (0..8u16).map(|k| f64::from(k) * 45.0).collect(),
            step_deg: 1.0,
        }
    }
}

/// View box the default ring is drawn in.
pub const RING_VIEW: Ortho2 = Ortho2 {
    left: 0.0,
    right: 60.0,
    bottom: 0.0,
    top: 60.0,
};

impl RingCfg {
    pub fn slot_position(&self, slot: usize) -> Option<Point2> {
        let deg = *self.slot_angles_deg.get(slot)?;
        let (s, c) = deg.to_radians().sin_cos();
        Some(self.center + self.radius * Vector2::new(c, s))
    }
}

/// Frame context for the ring: what a frame loop mutates between frames.
#[derive(Clone, Debug, Default)]
pub struct RingAnimation {
    cfg: RingCfg,
    frame: u64,
}

impl RingAnimation {
    pub fn new(cfg: RingCfg) -> Self {
        Self { cfg, frame: 0 }
    }

    /// Start at a given frame, e.g. to render a single snapshot.
    pub fn at_frame(cfg: RingCfg, frame: u64) -> Self {
        Self { cfg, frame }
    }

    pub fn cfg(&self) -> &RingCfg {
        &self.cfg
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn rotation_deg(&self) -> f64 {
        self.frame as f64 * self.cfg.step_deg
    }

    pub fn slot_transform(&self, slot: usize) -> Option<Aff2> {
        let pos = self.cfg.slot_position(slot)?;
        Some(Aff2::translation(pos).compose(&Aff2::rotation_deg(self.rotation_deg())))
    }

    /// One placed copy of `figure` per slot, in slot order.
    pub fn place(&self, figure: &Figure) -> Vec<Figure> {
        (0..self.cfg.slot_angles_deg.len())
            .filter_map(|slot| self.slot_transform(slot))
            .map(|f| figure.transformed(&f))
            .collect()
    }

    pub fn advance(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn parses_pairs() {
        let f = parse_figure("0 0\n1.5 -2\t3 4e0\n").unwrap();
        assert_eq!(
            f.vertices,
            vec![vector![0.0, 0.0], vector![1.5, -2.0], vector![3.0, 4.0]]
        );
        assert!(parse_figure("  \n").unwrap().is_empty());
        let g: Figure = "1 2".parse().unwrap();
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn rejects_malformed_figures() {
        assert_eq!(
            parse_figure("1 2 3"),
            Err(FigureError::OddCount { count: 3 })
        );
        assert_eq!(
            parse_figure("1 x"),
            Err(FigureError::BadToken {
                index: 1,
                token: "x".into()
            })
        );
    }

    #[test]
    fn default_slots_ring_the_view_center() {
        let cfg = RingCfg::default();
        assert_eq!(cfg.slot_angles_deg.len(), 8);
        let p0 = cfg.slot_position(0).unwrap();
        assert!((p0 - vector![55.0, 30.0]).norm() < 1e-12);
        let p2 = cfg.slot_position(2).unwrap();
        assert!((p2 - vector![30.0, 55.0]).norm() < 1e-12);
        for k in 0..8 {
            let p = cfg.slot_position(k).unwrap();
            assert!(((p - cfg.center).norm() - 25.0).abs() < 1e-12);
        }
        assert!(cfg.slot_position(8).is_none());
        // Every slot fits in the view box.
        for k in 0..8 {
            let ndc = RING_VIEW.to_ndc(cfg.slot_position(k).unwrap());
            assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0);
        }
    }

    #[test]
    fn frame_zero_only_translates() {
        let anim = RingAnimation::new(RingCfg::default());
        let fig = Figure::new(vec![vector![0.0, 0.0], vector![1.0, 0.0]]);
        let placed = anim.place(&fig);
        assert_eq!(placed.len(), 8);
        assert!((placed[0].vertices[0] - vector![55.0, 30.0]).norm() < 1e-12);
        assert!((placed[0].vertices[1] - vector![56.0, 30.0]).norm() < 1e-12);
    }

    #[test]
    fn figures_spin_one_degree_per_frame() {
        let mut anim = RingAnimation::new(RingCfg::default());
        for _ in 0..90 {
            anim.advance();
        }
        assert_eq!(anim.frame(), 90);
        assert!((anim.rotation_deg() - 90.0).abs() < 1e-12);
        let fig = Figure::new(vec![vector![1.0, 0.0]]);
        let placed = anim.place(&fig);
        // Slot stays put, the figure turns about its own origin.
        let slot4 = anim.cfg().slot_position(4).unwrap();
        assert!((placed[4].vertices[0] - (slot4 + vector![0.0, 1.0])).norm() < 1e-9);
    }

    #[test]
    fn snapshot_matches_stepped_animation() {
        let mut stepped = RingAnimation::new(RingCfg::default());
        for _ in 0..37 {
            stepped.advance();
        }
        let snap = RingAnimation::at_frame(RingCfg::default(), 37);
        let fig = Figure::new(vec![vector![2.0, 3.0], vector![-1.0, 0.5]]);
        assert_eq!(stepped.place(&fig), snap.place(&fig));
    }
}
