//! Forward finite differences over a sample grid.
//!
//! For `n` samples the first derivative has `n - 1` entries and the second
//! `n - 2`:
//!
//! ```text
//! d1[i] = (y[i+1] - y[i]) / (x[i+1] - x[i])
//! d2[i] = (d1[i+1] - d1[i]) / (x[i+1] - x[i])
//! ```
//!
//! The second derivative is taken from the raw first derivative; only then
//! are non-finite entries of both series replaced by zero.

use itertools::Itertools;
use log::debug;
use nalgebra::DVector;

use crate::{equation::ValueSeries, grid::SampleGrid};

/// Cleaned first and second derivative of a value series.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivatives {
    pub first: DVector<f64>,
    pub second: DVector<f64>,
}

/// Forward difference quotient of `values` over the leading grid intervals.
///
/// Produces `values.len() - 1` entries; grid intervals beyond that are unused.
pub fn finite_difference(values: &[f64], grid: &[f64]) -> DVector<f64> {
    debug_assert!(grid.len() >= values.len(), "grid shorter than series");
    let quotients = values
        .iter()
        .tuple_windows()
        .zip(grid.iter().tuple_windows())
        .map(|((y0, y1), (x0, x1))| (y1 - y0) / (x1 - x0));
    DVector::from_iterator(values.len().saturating_sub(1), quotients)
}

/// Replaces NaN and infinite entries with 0.0, returning how many were replaced.
pub fn clean_non_finite(series: &mut DVector<f64>) -> usize {
    let mut replaced = 0;
    for value in series.iter_mut() {
        if !value.is_finite() {
            *value = 0.0;
            replaced += 1;
        }
    }
    replaced
}

/// Estimates both derivatives of `values` and cleans them.
pub fn derivatives(grid: &SampleGrid, values: &ValueSeries) -> Derivatives {
    let mut first = finite_difference(values.as_slice(), grid.as_slice());
    let mut second = finite_difference(first.as_slice(), grid.as_slice());

    let replaced = clean_non_finite(&mut first) + clean_non_finite(&mut second);
    if replaced > 0 {
        debug!("Replaced {} non-finite derivative samples with 0", replaced);
    }

    Derivatives { first, second }
}
