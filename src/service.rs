//! # Transport-neutral request handling
//!
//! [`AnalysisService`] runs the whole pipeline for one expression: evaluate
//! it over the configured grid, classify the curve, render the diagnostic
//! plot, and package everything as a status code plus a JSON-serialisable
//! [`AnalysisResponse`]. Mounting it behind HTTP or any other transport is
//! left to the caller.
//!
//! ```rust
//! use curve_shape::{AnalysisConfig, AnalysisService};
//!
//! let service = AnalysisService::new(AnalysisConfig::default()).unwrap();
//! let (status, body) = service.handle_json(r#"{"expressionString": "x*x"}"#);
//! assert_eq!(status, 200);
//! assert!(body.contains("\"category\":\"Quadratic\""));
//! ```

use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    analysis::{self, Analysis, Category},
    config::{AnalysisConfig, ConfigError},
    error::{AnalysisError, AnalysisResult, ErrorKind},
    grid::SampleGrid,
    render::{EncodedPlot, PlotRenderer, PlotRequest, SvgRenderer},
};

/// An analysis request as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// A missing field reads as empty and is rejected as [`AnalysisError::EmptyInput`].
    #[serde(default, alias = "function_string")]
    pub expression_string: String,
}

impl AnalysisRequest {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression_string: expression.into(),
        }
    }
}

/// The sampled series behind a plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPayload {
    pub grid: Vec<f64>,
    /// Non-finite values serialise as `null`.
    pub values: Vec<f64>,
    pub derivative1: Vec<f64>,
    /// Present exactly when the plot has a second-derivative panel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derivative2: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedResponse {
    pub category: Category,
    pub display_text: String,
    pub series: SeriesPayload,
    pub plot: EncodedPlot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DegenerateResponse {
    pub category: Category,
    pub display_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    pub error_kind: ErrorKind,
    pub message: String,
}

impl From<&AnalysisError> for FailureResponse {
    fn from(err: &AnalysisError) -> Self {
        FailureResponse {
            error_kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Body of a response; the variant follows from the fields present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Classified(ClassifiedResponse),
    Degenerate(DegenerateResponse),
    Failure(FailureResponse),
}

impl AnalysisResponse {
    pub fn category(&self) -> Option<Category> {
        match self {
            AnalysisResponse::Classified(response) => Some(response.category),
            AnalysisResponse::Degenerate(response) => Some(response.category),
            AnalysisResponse::Failure(_) => None,
        }
    }

    /// The human-readable outcome: display text or failure message.
    pub fn text(&self) -> &str {
        match self {
            AnalysisResponse::Classified(response) => &response.display_text,
            AnalysisResponse::Degenerate(response) => &response.display_text,
            AnalysisResponse::Failure(response) => &response.message,
        }
    }
}

/// `The function is classified as: <LABEL>`, or the constant/invalid notice
/// naming the expression.
pub fn display_text(category: Category, expression: &str) -> String {
    match category.label() {
        Some(label) => format!("The function is classified as: {}", label),
        None => format!("The function '{}' is CONSTANT or INVALID.", expression),
    }
}

/// Evaluates, classifies and renders expressions with a fixed configuration.
///
/// Holds only immutable state, so a shared reference may serve several
/// threads as long as the renderer allows it.
#[derive(Debug, Clone)]
pub struct AnalysisService<R = SvgRenderer> {
    config: AnalysisConfig,
    grid: SampleGrid,
    renderer: R,
}

impl AnalysisService<SvgRenderer> {
    /// Validates `config` and builds an SVG-rendering service from it.
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        let renderer = SvgRenderer::new(config.render);
        Self::with_renderer(config, renderer)
    }
}

impl<R: PlotRenderer> AnalysisService<R> {
    pub fn with_renderer(config: AnalysisConfig, renderer: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = config.grid.build()?;
        Ok(Self {
            config,
            grid,
            renderer,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    /// Runs the pipeline for one expression.
    pub fn analyze(&self, expression: &str) -> AnalysisResult<AnalysisResponse> {
        if expression.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let analysis = analysis::analyze(expression, &self.grid, &self.config.classifier)?;
        let (values, classification) = match analysis {
            Analysis::Degenerate { .. } => {
                return Ok(AnalysisResponse::Degenerate(DegenerateResponse {
                    category: Category::ConstantOrInvalid,
                    display_text: display_text(Category::ConstantOrInvalid, expression),
                }));
            }
            Analysis::Classified {
                values,
                classification,
            } => (values, classification),
        };

        let request = PlotRequest::new(
            expression,
            self.grid.as_slice(),
            values.as_slice(),
            &classification,
        );
        let plot = self.renderer.render(&request)?;

        Ok(AnalysisResponse::Classified(ClassifiedResponse {
            category: classification.category,
            display_text: display_text(classification.category, expression),
            series: SeriesPayload {
                grid: self.grid.as_slice().to_vec(),
                values: values.as_slice().to_vec(),
                derivative1: request.first_derivative.to_vec(),
                derivative2: request.second_derivative.map(<[f64]>::to_vec),
            },
            plot,
        }))
    }

    /// Handles a decoded request, returning the status code and response body.
    pub fn handle(&self, request: &AnalysisRequest) -> (u16, AnalysisResponse) {
        match self.analyze(&request.expression_string) {
            Ok(response) => (200, response),
            Err(err) => Self::failure(&err),
        }
    }

    /// Handles a raw JSON request body, returning the status code and a JSON body.
    pub fn handle_json(&self, body: &str) -> (u16, String) {
        let (status, response) = match serde_json::from_str::<AnalysisRequest>(body) {
            Ok(request) => self.handle(&request),
            Err(err) => Self::failure(&AnalysisError::from(err)),
        };

        match serde_json::to_string(&response) {
            Ok(body) => (status, body),
            Err(err) => {
                error!("Failed to encode response: {}", err);
                let body = json!({
                    "errorKind": ErrorKind::Internal,
                    "message": format!("Failed to encode response: {}", err),
                });
                (500, body.to_string())
            }
        }
    }

    fn failure(err: &AnalysisError) -> (u16, AnalysisResponse) {
        let status = err.status();
        if status >= 500 {
            error!("{}", err);
        } else {
            warn!("Rejected request: {}", err);
        }
        (status, AnalysisResponse::Failure(FailureResponse::from(err)))
    }
}
