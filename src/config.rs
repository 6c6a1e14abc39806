//! Configuration loading from TOML files.
//!
//! Every section and field is optional; the defaults reproduce the reference
//! behaviour (20000 samples over `[-2, 2]`, threshold 1000, tolerance 1e-6).
//!
//! Lookup order for [`AnalysisConfig::discover`]:
//! 1. an explicit path
//! 2. `$CURVE_SHAPE_CONFIG`
//! 3. built-in defaults
//!
//! ```toml
//! [grid]
//! start = -2.0
//! stop = 2.0
//! samples = 20000
//!
//! [classifier]
//! threshold = 1000.0
//! tolerance = 1e-6
//!
//! [render]
//! width = 800
//! height = 600
//! max_points = 1000
//! ```

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    analysis::ClassifierSettings,
    grid::{DEFAULT_SAMPLES, DEFAULT_START, DEFAULT_STOP, GridError, SampleGrid},
    render::RenderSettings,
};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "CURVE_SHAPE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid [grid] section: {0}")]
    Grid(#[from] GridError),

    #[error("invalid [{section}] section: {message}")]
    Invalid {
        section: &'static str,
        message: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub grid: GridConfig,
    pub classifier: ClassifierSettings,
    pub render: RenderSettings,
}

/// Sample grid settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub start: f64,
    pub stop: f64,
    pub samples: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            stop: DEFAULT_STOP,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl GridConfig {
    pub fn build(&self) -> Result<SampleGrid, GridError> {
        SampleGrid::linspace(self.start, self.stop, self.samples)
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Loads `path` if given, else the file named by `$CURVE_SHAPE_CONFIG`,
    /// else returns the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(path) => Self::load(PathBuf::from(path)),
                None => Ok(Self::default()),
            },
        }
    }

    /// Checks that every section describes a usable setup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.build()?;

        let ClassifierSettings {
            threshold,
            tolerance,
        } = self.classifier;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::Invalid {
                section: "classifier",
                message: format!("threshold must be positive and finite, got {threshold}"),
            });
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(ConfigError::Invalid {
                section: "classifier",
                message: format!("tolerance must be positive and finite, got {tolerance}"),
            });
        }

        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(ConfigError::Invalid {
                section: "render",
                message: format!(
                    "width and height must be non-zero, got {}x{}",
                    render.width, render.height
                ),
            });
        }
        if render.max_points < 2 {
            return Err(ConfigError::Invalid {
                section: "render",
                message: format!("max_points must be at least 2, got {}", render.max_points),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.grid.samples, 20_000);
        assert_eq!(config.grid.start, -2.0);
        assert_eq!(config.classifier.threshold, 1000.0);
        assert_eq!(config.classifier.tolerance, 1e-6);
        assert_eq!(config.render.width, 800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[grid]
samples = 501
"#;
        let config = AnalysisConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.grid.samples, 501);
        // Other fields should be defaults
        assert_eq!(config.grid.stop, 2.0);
        assert_eq!(config.classifier, ClassifierSettings::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[grid]
start = 0.0
stop = 10.0
samples = 1001

[classifier]
threshold = 50.0
tolerance = 1e-4

[render]
width = 1024
height = 768
max_points = 400
"#;
        let config = AnalysisConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.grid.build().unwrap().len(), 1001);
        assert_eq!(config.classifier.threshold, 50.0);
        assert_eq!(config.classifier.tolerance, 1e-4);
        assert_eq!(config.render.max_points, 400);
    }

    #[test]
    fn test_empty_toml() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let err = AnalysisConfig::from_toml_str("[grid]\nsamples = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Grid(GridError::TooFewSamples(2))));

        let err = AnalysisConfig::from_toml_str("[grid]\nstart = 3.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Grid(GridError::EmptyInterval { .. })));
    }

    #[test]
    fn test_invalid_classifier_rejected() {
        let err = AnalysisConfig::from_toml_str("[classifier]\ntolerance = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                section: "classifier",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_render_rejected() {
        let err = AnalysisConfig::from_toml_str("[render]\nmax_points = 1\n").unwrap_err();
        assert!(err.to_string().starts_with("invalid [render] section"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = AnalysisConfig::from_toml_str("[grid\nsamples = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nwidth = 640").unwrap();

        let config = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(config.render.width, 640);
        assert_eq!(config.render.height, 600);
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnalysisConfig::load("/nonexistent/curve-shape.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
