//! Random sources for the chaos game.
//!
//! The generator only needs two kinds of draws: a uniform value in `[0,1)` for
//! the seed point and a uniform corner index in `0..4`. [`RandomSource`] keeps
//! those two draws behind a fallible interface so scripted sources can run dry
//! or misbehave and the generator reports it instead of panicking.
//!
//! - [`RngSource`] adapts any `rand` RNG; `RngSource::seeded` is the
//!   reproducible default (`StdRng::seed_from_u64`).
//! - [`ScriptedSource`] replays fixed queues of draws, in order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::square::CORNER_COUNT;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("random source exhausted: no {what} draws left")]
    Exhausted { what: &'static str },
}

/// Uniform draws consumed by the generator.
pub trait RandomSource {
    /// A value in `[0,1)`.
    fn unit(&mut self) -> Result<f64, SourceError>;
    /// A corner index in `0..4`.
    fn corner(&mut self) -> Result<usize, SourceError>;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn unit(&mut self) -> Result<f64, SourceError> {
        (**self).unit()
    }
    fn corner(&mut self) -> Result<usize, SourceError> {
        (**self).corner()
    }
}

/// Adapter from a `rand` RNG.
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<StdRng> {
    /// Reproducible source: same seed, same draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    #[inline]
    fn unit(&mut self) -> Result<f64, SourceError> {
        Ok(self.rng.gen::<f64>())
    }
    #[inline]
    fn corner(&mut self) -> Result<usize, SourceError> {
        Ok(self.rng.gen_range(0..CORNER_COUNT))
    }
}

/// Replays fixed draws. Values are handed out as given, without range checks,
/// so a scripted source can also stand in for a malformed one.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    units: VecDeque<f64>,
    corners: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn new(
        units: impl IntoIterator<Item = f64>,
        corners: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            units: units.into_iter().collect(),
            corners: corners.into_iter().collect(),
        }
    }

    /// Append corner draws at the back of the queue.
    pub fn push_corners(&mut self, corners: impl IntoIterator<Item = usize>) {
        self.corners.extend(corners);
    }

    pub fn remaining_units(&self) -> usize {
        self.units.len()
    }

    pub fn remaining_corners(&self) -> usize {
        self.corners.len()
    }
}

impl RandomSource for ScriptedSource {
    fn unit(&mut self) -> Result<f64, SourceError> {
        self.units
            .pop_front()
            .ok_or(SourceError::Exhausted { what: "unit" })
    }
    fn corner(&mut self) -> Result<usize, SourceError> {
        self.corners
            .pop_front()
            .ok_or(SourceError::Exhausted { what: "corner" })
    }
}
