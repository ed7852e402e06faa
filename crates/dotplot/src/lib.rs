//! Chaos-game dot plots and small 2D layout helpers.
//!
//! The core is [`chaos`]: a seedable generator that walks a point towards
//! randomly chosen corners of the square `[-1,1]²` while never jumping to the
//! corner diagonally opposite the previous one. Everything else is pure
//! geometry the drawing front-ends need (affine placement, a rotating ring of
//! figures, orthographic view boxes, iso-line contours).
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Prefer [`api`] or [`prelude`] re-exports in callers.

pub mod affine;
pub mod api;
pub mod chaos;
pub mod contour;
pub mod ring;
pub mod source;
pub mod square;
pub mod view;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use affine::Aff2;
pub use nalgebra::Vector2 as Vec2;
pub use square::Point2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::affine::Aff2;
    pub use crate::chaos::{ChaosCfg, ChaosError, ChaosGenerator, SeedPointMode, Step};
    pub use crate::contour::{grid_lines, marching_squares, ContourCfg, Segment};
    pub use crate::source::{RandomSource, RngSource, ScriptedSource};
    pub use crate::square::{corner, is_diagonal, midpoint, Point2, CORNERS};
    pub use crate::view::Ortho2;
    pub use nalgebra::Vector2 as Vec2;
}
