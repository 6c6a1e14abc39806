//! # Diagnostic plots
//!
//! A plot shows the analysed function and its estimated derivatives, one
//! panel per series. How many panels are drawn is a presentation decision
//! made here, not by the classifier: see [`shows_second_derivative`].
//!
//! Renderers return an [`EncodedPlot`] ready for transport. [`SvgRenderer`]
//! is the built-in implementation.

pub mod decimate;
pub mod emit;
pub mod svg;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use svg::SvgRenderer;

use crate::analysis::{Category, Classification};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("XML writing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{series} has {found} samples, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("cannot plot an empty grid")]
    EmptyGrid,
}

/// Canvas settings shared by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Upper bound on drawn vertices per series.
    pub max_points: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            max_points: 1000,
        }
    }
}

/// Whether the plot for `category` gets a third panel for the second
/// derivative. Only shapes whose curvature is informative get one.
pub fn shows_second_derivative(category: Category) -> bool {
    matches!(category, Category::Triangular | Category::SmoothCurved)
}

/// Everything a renderer needs, borrowed from one analysis.
#[derive(Debug, Clone, Copy)]
pub struct PlotRequest<'a> {
    pub expression: &'a str,
    pub category: Category,
    pub grid: &'a [f64],
    pub values: &'a [f64],
    pub first_derivative: &'a [f64],
    /// `Some` exactly when a third panel is drawn.
    pub second_derivative: Option<&'a [f64]>,
}

impl<'a> PlotRequest<'a> {
    /// Builds a request, attaching the second derivative only when the
    /// category calls for a third panel.
    pub fn new(
        expression: &'a str,
        grid: &'a [f64],
        values: &'a [f64],
        classification: &'a Classification,
    ) -> Self {
        let category = classification.category;
        PlotRequest {
            expression,
            category,
            grid,
            values,
            first_derivative: classification.first_derivative.as_slice(),
            second_derivative: shows_second_derivative(category)
                .then(|| classification.second_derivative.as_slice()),
        }
    }

    pub fn panel_count(&self) -> usize {
        if self.second_derivative.is_some() { 3 } else { 2 }
    }

    /// Checks series lengths against the grid: `n`, `n - 1` and `n - 2`.
    pub fn validate(&self) -> Result<(), RenderError> {
        let n = self.grid.len();
        if n == 0 {
            return Err(RenderError::EmptyGrid);
        }

        let mut expected = vec![
            ("values", n, self.values.len()),
            ("first derivative", n.saturating_sub(1), self.first_derivative.len()),
        ];
        if let Some(second) = self.second_derivative {
            expected.push(("second derivative", n.saturating_sub(2), second.len()));
        }

        for (series, expected, found) in expected {
            if expected != found {
                return Err(RenderError::LengthMismatch {
                    series,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

/// A rendered plot ready for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPlot {
    /// Media type of the decoded bytes, e.g. `image/svg+xml`.
    pub mime: String,
    /// Standard base64 of the image bytes.
    pub data: String,
}

/// Turns a [`PlotRequest`] into an encoded image.
pub trait PlotRenderer {
    fn render(&self, request: &PlotRequest<'_>) -> Result<EncodedPlot, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    fn classification(category: Category, n: usize) -> Classification {
        Classification {
            category,
            first_derivative: DVector::zeros(n - 1),
            second_derivative: DVector::zeros(n - 2),
        }
    }

    #[test]
    fn test_panel_choice() {
        assert!(shows_second_derivative(Category::Triangular));
        assert!(shows_second_derivative(Category::SmoothCurved));
        assert!(!shows_second_derivative(Category::Rectangular));
        assert!(!shows_second_derivative(Category::Linear));
        assert!(!shows_second_derivative(Category::Quadratic));
        assert!(!shows_second_derivative(Category::ConstantOrInvalid));
    }

    #[test]
    fn test_request_attaches_second_derivative() {
        let grid = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, 1.0, 0.0, 1.0];

        let smooth = classification(Category::SmoothCurved, 4);
        let request = PlotRequest::new("f", &grid, &values, &smooth);
        assert_eq!(request.panel_count(), 3);
        assert_eq!(request.second_derivative.map(<[f64]>::len), Some(2));
        assert!(request.validate().is_ok());

        let linear = classification(Category::Linear, 4);
        let request = PlotRequest::new("f", &grid, &values, &linear);
        assert_eq!(request.panel_count(), 2);
        assert!(request.second_derivative.is_none());
    }

    #[test]
    fn test_validate_lengths() {
        let grid = [0.0, 1.0, 2.0];
        let request = PlotRequest {
            expression: "x",
            category: Category::Linear,
            grid: &grid,
            values: &[0.0, 1.0, 2.0],
            first_derivative: &[1.0],
            second_derivative: None,
        };
        assert!(matches!(
            request.validate(),
            Err(RenderError::LengthMismatch {
                series: "first derivative",
                expected: 2,
                found: 1,
            })
        ));

        let empty = PlotRequest {
            grid: &[],
            ..request
        };
        assert!(matches!(empty.validate(), Err(RenderError::EmptyGrid)));
    }
}
