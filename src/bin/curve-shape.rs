//! Command-line front end
//!
//! Classifies one expression and prints the outcome, optionally as JSON and
//! optionally writing the diagnostic plot to an SVG file.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use curve_shape::render::{PlotRequest, SvgRenderer};
use curve_shape::service::{AnalysisRequest, AnalysisResponse, AnalysisService, ClassifiedResponse};
use curve_shape::AnalysisConfig;
use log::{LevelFilter, info, warn};

#[derive(Parser)]
#[command(name = "curve-shape")]
#[command(about = "Classify the shape of a one-variable function from its derivatives")]
#[command(version)]
struct Cli {
    /// Expression in x, e.g. "sin(5*x)" or "abs(x)"
    expression: String,
    /// TOML configuration file (defaults to $CURVE_SHAPE_CONFIG, then built-in values)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the full JSON response instead of the display text
    #[arg(long)]
    json: bool,
    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,
    /// Write the diagnostic plot to this SVG file
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,
    /// Number of grid samples, overriding the configuration
    #[arg(short = 'n', long)]
    samples: Option<usize>,
    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.quiet);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn init_logging(quiet: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if quiet {
        builder.filter_level(LevelFilter::Error);
    }
    builder.init();
}

/// Returns whether the analysis succeeded.
fn run(cli: &Cli) -> Result<bool> {
    let mut config =
        AnalysisConfig::discover(cli.config.as_deref()).context("loading configuration")?;
    if let Some(samples) = cli.samples {
        config.grid.samples = samples;
    }
    let service = AnalysisService::new(config).context("invalid configuration")?;

    let (status, response) = service.handle(&AnalysisRequest::new(cli.expression.as_str()));
    info!("'{}' answered with status {}", cli.expression, status);

    if cli.json {
        let body = if cli.pretty {
            serde_json::to_string_pretty(&response)
        } else {
            serde_json::to_string(&response)
        }
        .context("encoding response")?;
        println!("{body}");
    } else if status == 200 {
        println!("{}", response.text());
    } else {
        eprintln!("{}", response.text());
    }

    if let Some(path) = &cli.svg {
        match &response {
            AnalysisResponse::Classified(classified) => {
                write_plot(&service, &cli.expression, classified, path)?;
            }
            _ => warn!("No plot for '{}'; {} not written", cli.expression, path.display()),
        }
    }

    Ok(status == 200)
}

fn write_plot(
    service: &AnalysisService,
    expression: &str,
    response: &ClassifiedResponse,
    path: &Path,
) -> Result<()> {
    let series = &response.series;
    let request = PlotRequest {
        expression,
        category: response.category,
        grid: &series.grid,
        values: &series.values,
        first_derivative: &series.derivative1,
        second_derivative: series.derivative2.as_deref(),
    };
    SvgRenderer::new(service.config().render)
        .write_svg(&request, path)
        .with_context(|| format!("writing {}", path.display()))
}
