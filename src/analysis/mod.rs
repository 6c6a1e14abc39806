//! # Shape classification
//!
//! Turns a sampled curve into a [`Category`] by looking at its estimated
//! first and second derivatives.
//!
//! ## Decision procedure
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. any `|d1| > threshold` → [`Category::Rectangular`]
//! 2. any `|d2| > threshold` → [`Category::Triangular`]
//! 3. population std-dev of `d2 < tolerance`:
//!    mean of `|d2| < tolerance` → [`Category::Linear`], otherwise
//!    [`Category::Quadratic`]
//! 4. otherwise → [`Category::SmoothCurved`]
//!
//! Rule 1 shadows rule 2: a curve with both a steep slope and a sharp kink is
//! always `Rectangular`.
//!
//! Curves that are constant or entirely NaN never reach the procedure; they
//! are reported as [`Category::ConstantOrInvalid`] by [`analyze`].
//!
//! ```rust
//! use curve_shape::{Category, ClassifierSettings, SampleGrid, analysis};
//!
//! let grid = SampleGrid::default();
//! let analysis = analysis::analyze("x*x", &grid, &ClassifierSettings::default()).unwrap();
//! assert_eq!(analysis.category(), Category::Quadratic);
//! ```

pub mod category;
pub mod derivative;

use log::{info, warn};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

pub use category::Category;
pub use derivative::{Derivatives, derivatives};

use crate::{
    equation::{EvaluationError, ValueSeries, evaluate_with_warnings},
    grid::SampleGrid,
};

/// Derivative magnitude above which a curve counts as discontinuous.
pub const THRESHOLD: f64 = 1000.0;

/// Spread and magnitude below which a second derivative counts as constant or zero.
pub const TOLERANCE: f64 = 1e-6;

/// Tunable constants of the decision procedure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub threshold: f64,
    pub tolerance: f64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            threshold: THRESHOLD,
            tolerance: TOLERANCE,
        }
    }
}

/// A category together with the cleaned derivative series it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub first_derivative: DVector<f64>,
    pub second_derivative: DVector<f64>,
}

/// Outcome of analysing one formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// Constant or entirely NaN values; no derivatives were computed.
    Degenerate { values: ValueSeries },
    Classified {
        values: ValueSeries,
        classification: Classification,
    },
}

impl Analysis {
    pub fn category(&self) -> Category {
        match self {
            Analysis::Degenerate { .. } => Category::ConstantOrInvalid,
            Analysis::Classified { classification, .. } => classification.category,
        }
    }

    pub fn values(&self) -> &ValueSeries {
        match self {
            Analysis::Degenerate { values } | Analysis::Classified { values, .. } => values,
        }
    }

    pub fn classification(&self) -> Option<&Classification> {
        match self {
            Analysis::Degenerate { .. } => None,
            Analysis::Classified { classification, .. } => Some(classification),
        }
    }
}

/// True when every value is NaN, or every value equals the first one.
///
/// A NaN first value never equals anything, so a series starting with NaN
/// is degenerate only when all of it is NaN.
pub fn is_degenerate(values: &ValueSeries) -> bool {
    let Some(&first) = values.iter().next() else {
        return true;
    };
    values.iter().all(|v| v.is_nan()) || values.iter().all(|&v| v == first)
}

/// Population standard deviation, computed in two passes.
fn population_std(series: &DVector<f64>) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let mean = series.mean();
    let sum_sq: f64 = series.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_sq / series.len() as f64).sqrt()
}

/// Applies the ordered decision procedure to cleaned derivative series.
pub fn decide(
    first: &DVector<f64>,
    second: &DVector<f64>,
    settings: &ClassifierSettings,
) -> Category {
    if first.iter().any(|v| v.abs() > settings.threshold) {
        Category::Rectangular
    } else if second.iter().any(|v| v.abs() > settings.threshold) {
        Category::Triangular
    } else if population_std(second) < settings.tolerance {
        if second.abs().mean() < settings.tolerance {
            Category::Linear
        } else {
            Category::Quadratic
        }
    } else {
        Category::SmoothCurved
    }
}

/// Classifies a non-degenerate value series sampled on `grid`.
pub fn classify(
    grid: &SampleGrid,
    values: &ValueSeries,
    settings: &ClassifierSettings,
) -> Classification {
    debug_assert_eq!(grid.len(), values.len(), "one value per grid point");

    let Derivatives { first, second } = derivatives(grid, values);
    let category = decide(&first, &second, settings);

    Classification {
        category,
        first_derivative: first,
        second_derivative: second,
    }
}

/// Evaluates `source` over `grid` and classifies the result.
pub fn analyze(
    source: &str,
    grid: &SampleGrid,
    settings: &ClassifierSettings,
) -> Result<Analysis, EvaluationError> {
    let (values, warnings): (ValueSeries, Vec<String>) =
        evaluate_with_warnings(source, grid)?.into();
    for warning in warnings {
        warn!("'{}': {}", source, warning);
    }

    if is_degenerate(&values) {
        info!("'{}' is constant or invalid", source);
        return Ok(Analysis::Degenerate { values });
    }

    let classification = classify(grid, &values, settings);
    info!("'{}' classified as {}", source, classification.category);
    Ok(Analysis::Classified {
        values,
        classification,
    })
}
