//! # Sample grid
//!
//! The evenly spaced sample points of the independent variable. Points are
//! laid out the way array libraries build a closed `linspace`:
//! `x[i] = start + i * step` with `step = (stop - start) / (n - 1)`, and the
//! last point pinned exactly to `stop`.

use itertools::Itertools;
use nalgebra::DVector;
use thiserror::Error;

pub const DEFAULT_START: f64 = -2.0;
pub const DEFAULT_STOP: f64 = 2.0;
pub const DEFAULT_SAMPLES: usize = 20_000;

/// Second differences need at least three points.
pub const MIN_SAMPLES: usize = 3;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("A sample grid needs at least 3 points, got {0}")]
    TooFewSamples(usize),

    #[error("Grid bounds must be finite, got [{start}, {stop}]")]
    NonFiniteBounds { start: f64, stop: f64 },

    #[error("Grid start {start} must be below stop {stop}")]
    EmptyInterval { start: f64, stop: f64 },

    #[error("Grid [{start}, {stop}] with {samples} points is not strictly increasing")]
    NotStrictlyIncreasing {
        start: f64,
        stop: f64,
        samples: usize,
    },
}

/// Strictly increasing, evenly spaced sample points over a closed interval.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    points: DVector<f64>,
}

impl SampleGrid {
    /// Builds `samples` evenly spaced points over `[start, stop]`.
    pub fn linspace(start: f64, stop: f64, samples: usize) -> Result<Self, GridError> {
        if samples < MIN_SAMPLES {
            return Err(GridError::TooFewSamples(samples));
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(GridError::NonFiniteBounds { start, stop });
        }
        if start >= stop {
            return Err(GridError::EmptyInterval { start, stop });
        }

        let grid = Self::build(start, stop, samples);
        // Tiny intervals can collapse neighbouring points onto one float.
        if !grid.points.iter().tuple_windows().all(|(a, b)| b > a) {
            return Err(GridError::NotStrictlyIncreasing {
                start,
                stop,
                samples,
            });
        }
        Ok(grid)
    }

    fn build(start: f64, stop: f64, samples: usize) -> Self {
        let step = (stop - start) / (samples - 1) as f64;
        let points = DVector::from_fn(samples, |i, _| {
            if i == samples - 1 {
                stop
            } else {
                start + i as f64 * step
            }
        });
        SampleGrid { points }
    }

    pub fn points(&self) -> &DVector<f64> {
        &self.points
    }

    pub fn as_slice(&self) -> &[f64] {
        self.points.as_slice()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a grid holds at least [`MIN_SAMPLES`] points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn stop(&self) -> f64 {
        self.points[self.points.len() - 1]
    }
}

impl Default for SampleGrid {
    /// 20000 points over `[-2, 2]`.
    fn default() -> Self {
        Self::build(DEFAULT_START, DEFAULT_STOP, DEFAULT_SAMPLES)
    }
}
