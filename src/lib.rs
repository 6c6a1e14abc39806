//! Classifies the shape of a one-variable function.
//!
//! A formula in `x` is evaluated over a sample grid, its first and second
//! derivatives are estimated by finite differences, and the derivatives decide
//! whether the curve is linear, quadratic, rectangular, triangular or smoothly
//! curved. A diagnostic plot can be rendered alongside.
//!
//! ```rust
//! use curve_shape::{Category, ClassifierSettings, SampleGrid, analysis};
//!
//! let grid = SampleGrid::default();
//! let result = analysis::analyze("abs(x)", &grid, &ClassifierSettings::default()).unwrap();
//! assert_eq!(result.category(), Category::Triangular);
//! ```

pub mod analysis;
pub mod config;
pub mod equation;
pub mod error;
pub mod grid;
pub mod render;
pub mod service;

pub mod types;

#[cfg(test)]
mod test_utils;

pub use crate::analysis::{Analysis, Category, Classification, ClassifierSettings, analyze};
pub use crate::config::{AnalysisConfig, ConfigError};
pub use crate::equation::{
    EvaluationError, Expression, NumericConstant, Operator, SyntaxError, ValueSeries, evaluate,
};
pub use crate::error::{AnalysisError, ErrorKind};
pub use crate::grid::{GridError, SampleGrid};
pub use crate::render::{EncodedPlot, PlotRenderer, PlotRequest, RenderError, SvgRenderer};
pub use crate::service::{AnalysisRequest, AnalysisResponse, AnalysisService};
