//! Chaos-game point generator on the square `[-1,1]²`.
//!
//! Model
//! - Seed: `p0 = (frand(), frand())` and a corner `c0` in `0..4`. The seed is not
//!   part of the output.
//! - Step: draw a corner `c2` until it is not the diagonal of the previous corner
//!   `c1`, emit `p2 = midpoint(p1, corner[c2])`, then `p1 = p2`, `c1 = c2`.
//! - Forbidding the diagonal jump is what turns uniform noise into the fractal
//!   pattern.
//!
//! Draw order is fixed (seed x, seed y, initial corner, then corner draws per
//! step), so a seeded source reproduces a run exactly.
//!
//! Errors
//! - Negative counts and a zero redraw cap are `InvalidArgument`.
//! - A source that runs dry, returns out-of-range draws, or keeps returning the
//!   diagonal corner past `ChaosCfg::max_corner_draws` is a `Generator` error.
//!   The sequence stops at the failing step; nothing malformed is emitted.

use std::iter::FusedIterator;

use nalgebra::Vector2;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::source::{RandomSource, RngSource, SourceError};
use crate::square::{corner, diagonal_of, is_diagonal, midpoint, Point2, CORNER_COUNT};

/// Default cap on corner draws within a single step.
pub const DEFAULT_MAX_CORNER_DRAWS: u32 = 10_000;

/// Cap on unit redraws for one symmetric seed coordinate.
const MAX_SEED_REDRAWS: u32 = 64;

const PREALLOC_CAP: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChaosError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
    #[error("generator error: {reason}")]
    Generator { reason: String },
}

impl ChaosError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    fn generator(reason: impl Into<String>) -> Self {
        Self::Generator {
            reason: reason.into(),
        }
    }
}

impl From<SourceError> for ChaosError {
    fn from(e: SourceError) -> Self {
        Self::generator(e.to_string())
    }
}

/// How the seed point coordinates are drawn.
///
/// The classroom script negates a draw `x ∈ [0,1)` when `x % 2 == 1`, which
/// never holds, so its seed point always lands in `[0,1)²`. The intent was
/// most likely a symmetric draw on the open interval `(-1,1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedPointMode {
    /// Reproduce the script: coordinates in `[0,1)`.
    #[default]
    Observed,
    /// `2x - 1`: coordinates in `(-1,1)`. A draw of exactly `0` (which would
    /// give `-1`) is redrawn.
    Symmetric,
}

/// Generator configuration.
#[derive(Clone, Copy, Debug)]
pub struct ChaosCfg {
    /// Maximum corner draws per step, including the first. Must be > 0.
    pub max_corner_draws: u32,
    pub seed_point: SeedPointMode,
}

impl Default for ChaosCfg {
    fn default() -> Self {
        Self {
            max_corner_draws: DEFAULT_MAX_CORNER_DRAWS,
            seed_point: SeedPointMode::Observed,
        }
    }
}

impl ChaosCfg {
    fn validate(&self) -> Result<(), ChaosError> {
        if self.max_corner_draws == 0 {
            return Err(ChaosError::invalid("max_corner_draws must be > 0"));
        }
        Ok(())
    }
}

/// One emitted point plus the bookkeeping that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub point: Point2,
    /// Corner index the point moved towards.
    pub corner: usize,
    /// Corner draws spent in this step (1 unless the diagonal was drawn).
    pub corner_draws: u32,
}

/// Validate a signed point count.
pub fn point_count(n: i64) -> Result<usize, ChaosError> {
    if n < 0 {
        return Err(ChaosError::invalid(format!(
            "point count must be non-negative, got {n}"
        )));
    }
    usize::try_from(n).map_err(|_| ChaosError::invalid(format!("point count {n} too large")))
}

/// Lazy chaos-game sequence of exactly `n` points.
///
/// Iterating yields `Result<Point2, ChaosError>`; after the first error the
/// iterator is exhausted.
#[derive(Debug)]
pub struct ChaosGenerator<S> {
    source: S,
    cfg: ChaosCfg,
    seed_point: Point2,
    initial_corner: usize,
    current: Point2,
    prev_corner: usize,
    remaining: usize,
    failed: bool,
}

impl<S: RandomSource> ChaosGenerator<S> {
    /// Validate `n`, then draw the seed point and initial corner from `source`.
    pub fn new(n: i64, mut source: S, cfg: ChaosCfg) -> Result<Self, ChaosError> {
        let remaining = point_count(n)?;
        cfg.validate()?;
        let x = frand(&mut source, cfg.seed_point)?;
        let y = frand(&mut source, cfg.seed_point)?;
        let c0 = draw_corner(&mut source)?;
        let seed_point = Vector2::new(x, y);
        debug!(
            n = remaining,
            seed_x = x,
            seed_y = y,
            initial_corner = c0,
            mode = ?cfg.seed_point,
            "chaos generator ready"
        );
        Ok(Self {
            source,
            cfg,
            seed_point,
            initial_corner: c0,
            current: seed_point,
            prev_corner: c0,
            remaining,
            failed: false,
        })
    }

    pub fn cfg(&self) -> &ChaosCfg {
        &self.cfg
    }

    /// The (unemitted) starting point.
    pub fn seed_point(&self) -> Point2 {
        self.seed_point
    }

    pub fn initial_corner(&self) -> usize {
        self.initial_corner
    }

    /// Points still to be emitted.
    pub fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.remaining
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Advance one step. `Ok(None)` once all `n` points are out.
    pub fn next_step(&mut self) -> Result<Option<Step>, ChaosError> {
        if self.failed || self.remaining == 0 {
            return Ok(None);
        }
        match self.advance() {
            Ok(step) => Ok(Some(step)),
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    fn advance(&mut self) -> Result<Step, ChaosError> {
        let (c2, corner_draws) = self.choose_corner()?;
        let target = corner(c2)
            .ok_or_else(|| ChaosError::generator(format!("corner index {c2} out of range")))?;
        let p2 = midpoint(self.current, target);
        self.current = p2;
        self.prev_corner = c2;
        self.remaining -= 1;
        Ok(Step {
            point: p2,
            corner: c2,
            corner_draws,
        })
    }

    /// All remaining steps, or the first error.
    pub fn collect_steps(mut self) -> Result<Vec<Step>, ChaosError> {
        // `remaining` can be far larger than what a source ever delivers.
        let mut out = Vec::with_capacity(self.remaining.min(PREALLOC_CAP));
        while let Some(step) = self.next_step()? {
            out.push(step);
        }
        Ok(out)
    }

    /// All remaining points, or the first error.
    pub fn collect_points(self) -> Result<Vec<Point2>, ChaosError> {
        self.collect::<Result<Vec<_>, _>>()
    }

    fn choose_corner(&mut self) -> Result<(usize, u32), ChaosError> {
        for draws in 1..=self.cfg.max_corner_draws {
            let c2 = draw_corner(&mut self.source)?;
            if !is_diagonal(self.prev_corner, c2) {
                return Ok((c2, draws));
            }
        }
        let diagonal = diagonal_of(self.prev_corner);
        warn!(
            previous = self.prev_corner,
            diagonal,
            cap = self.cfg.max_corner_draws,
            "corner redraw cap exceeded"
        );
        Err(ChaosError::generator(format!(
            "drew diagonal corner {diagonal} {} times in a row after corner {}",
            self.cfg.max_corner_draws, self.prev_corner
        )))
    }
}

impl ChaosGenerator<RngSource<StdRng>> {
    /// Generator over a seeded `StdRng`.
    pub fn seeded(n: i64, seed: u64, cfg: ChaosCfg) -> Result<Self, ChaosError> {
        Self::new(n, RngSource::seeded(seed), cfg)
    }
}

impl<S: RandomSource> Iterator for ChaosGenerator<S> {
    type Item = Result<Point2, ChaosError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_step().map(|s| s.map(|s| s.point)).transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // An error may cut the sequence short, but it is still yielded as an item.
        let n = self.remaining();
        (n.min(1), Some(n))
    }
}

impl<S: RandomSource> FusedIterator for ChaosGenerator<S> {}

/// Batch form: `n` points from a seeded `StdRng`.
pub fn generate_points(n: i64, seed: u64, cfg: ChaosCfg) -> Result<Vec<Point2>, ChaosError> {
    ChaosGenerator::seeded(n, seed, cfg)?.collect_points()
}

fn frand<S: RandomSource>(source: &mut S, mode: SeedPointMode) -> Result<f64, ChaosError> {
    match mode {
        SeedPointMode::Observed => {
            let mut x = draw_unit(source)?;
            // Never true for x in [0,1); kept so the draw matches the script.
            if x % 2.0 == 1.0 {
                x *= -1.0;
            }
            Ok(x)
        }
        SeedPointMode::Symmetric => {
            for _ in 0..MAX_SEED_REDRAWS {
                let x = 2.0 * draw_unit(source)? - 1.0;
                if x > -1.0 {
                    return Ok(x);
                }
            }
            Err(ChaosError::generator(format!(
                "unit draw was 0 {MAX_SEED_REDRAWS} times in a row"
            )))
        }
    }
}

fn draw_unit<S: RandomSource>(source: &mut S) -> Result<f64, ChaosError> {
    let x = source.unit()?;
    if !(0.0..1.0).contains(&x) {
        return Err(ChaosError::generator(format!("unit draw {x} outside [0,1)")));
    }
    Ok(x)
}

fn draw_corner<S: RandomSource>(source: &mut S) -> Result<usize, ChaosError> {
    let c = source.corner()?;
    if c >= CORNER_COUNT {
        return Err(ChaosError::generator(format!(
            "corner draw {c} outside 0..{CORNER_COUNT}"
        )));
    }
    Ok(c)
}
