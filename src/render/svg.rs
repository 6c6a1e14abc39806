//! SVG rendering of diagnostic plots.
//!
//! The document is a column of framed panels under a common title. Each panel
//! has its own y range, five grid lines per axis with tick labels, a legend
//! entry and one `<path>` for its series; the last panel carries the `x` axis
//! label.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use itertools::{Itertools, MinMaxResult};
use log::debug;
use quick_xml::Writer;

use super::{
    EncodedPlot, PlotRenderer, PlotRequest, RenderError, RenderSettings,
    decimate::{Point, decimate},
    emit::{AttrList, SvgEmitter, coord},
};

pub const SVG_MIME: &str = "image/svg+xml";

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const TITLE_HEIGHT: f64 = 40.0;
const X_LABEL_HEIGHT: f64 = 20.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const PANEL_TITLE_HEIGHT: f64 = 22.0;
const PANEL_BOTTOM: f64 = 28.0;
const TICKS: usize = 5;
const GRID_COLOUR: &str = "#dddddd";

/// One series and how to present it.
struct Panel<'a> {
    title: &'static str,
    legend: &'static str,
    colour: &'static str,
    xs: &'a [f64],
    ys: &'a [f64],
}

/// Maps data coordinates into one panel's frame.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Frame {
    fn project(&self, (x, y): Point) -> Point {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        (
            self.left + (x - x0) / (x1 - x0) * (self.right - self.left),
            self.bottom - (y - y0) / (y1 - y0) * (self.bottom - self.top),
        )
    }
}

/// Finite min/max of `values`, widened so that it is never empty.
fn data_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    match finite.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (-1.0, 1.0),
        MinMaxResult::OneElement(v) => (v - 1.0, v + 1.0),
        MinMaxResult::MinMax(lo, hi) if lo == hi => (lo - 1.0, hi + 1.0),
        MinMaxResult::MinMax(lo, hi) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
    }
}

fn tick_label(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-2..1e4).contains(&magnitude) {
        format!("{:.1e}", value)
    } else {
        coord(value)
    }
}

/// Draws plots as standalone SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    settings: RenderSettings,
}

impl SvgRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    /// Renders `request` to an SVG document.
    pub fn document(&self, request: &PlotRequest<'_>) -> Result<String, RenderError> {
        request.validate()?;

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let mut emit = SvgEmitter::new(&mut writer);
        self.write_document(&mut emit, request)?;

        let document = String::from_utf8(writer.into_inner())?;
        debug!(
            "Rendered {}-panel plot for '{}' ({} bytes)",
            request.panel_count(),
            request.expression,
            document.len()
        );
        Ok(document)
    }

    /// Renders `request` and writes the raw SVG document to `path`.
    pub fn write_svg(
        &self,
        request: &PlotRequest<'_>,
        path: impl AsRef<Path>,
    ) -> Result<(), RenderError> {
        let document = self.document(request)?;
        std::fs::write(path.as_ref(), document)?;
        debug!("Wrote plot to {}", path.as_ref().display());
        Ok(())
    }

    fn panels<'a>(&self, request: &PlotRequest<'a>) -> Vec<Panel<'a>> {
        let grid = request.grid;
        let mut panels = vec![
            Panel {
                title: "Original Function",
                legend: "f(x)",
                colour: "blue",
                xs: grid,
                ys: request.values,
            },
            Panel {
                title: "First Derivative (dy/dx)",
                legend: "dy/dx",
                colour: "green",
                xs: &grid[..request.first_derivative.len()],
                ys: request.first_derivative,
            },
        ];
        if let Some(second) = request.second_derivative {
            panels.push(Panel {
                title: "Second Derivative (d²y/dx²)",
                legend: "d²y/dx²",
                colour: "red",
                xs: &grid[..second.len()],
                ys: second,
            });
        }
        panels
    }

    fn write_document<W: std::io::Write>(
        &self,
        emit: &mut SvgEmitter<'_, W>,
        request: &PlotRequest<'_>,
    ) -> Result<(), RenderError> {
        let width = f64::from(self.settings.width);
        let height = f64::from(self.settings.height);

        emit.xml_decl()?;
        let mut root = AttrList::new();
        root.add("xmlns", SVG_NS)
            .add_u32("width", self.settings.width)
            .add_u32("height", self.settings.height)
            .add(
                "viewBox",
                format!("0 0 {} {}", self.settings.width, self.settings.height),
            )
            .add("font-family", "sans-serif");
        emit.open("svg", &root)?;

        let mut background = AttrList::new();
        background
            .add("width", "100%")
            .add("height", "100%")
            .add("fill", "white");
        emit.empty("rect", &background)?;

        let mut title = AttrList::new();
        title
            .add_f64("x", width / 2.0)
            .add_f64("y", 26.0)
            .add("text-anchor", "middle")
            .add("font-size", "16")
            .add("font-weight", "bold");
        emit.text(
            "text",
            &title,
            &format!("Analysis of function: '{}'", request.expression),
        )?;

        let panels = self.panels(request);
        let slot = (height - TITLE_HEIGHT - X_LABEL_HEIGHT) / panels.len() as f64;
        for (i, panel) in panels.iter().enumerate() {
            let frame = Frame {
                left: MARGIN_LEFT,
                top: TITLE_HEIGHT + i as f64 * slot + PANEL_TITLE_HEIGHT,
                right: width - MARGIN_RIGHT,
                bottom: TITLE_HEIGHT + (i + 1) as f64 * slot - PANEL_BOTTOM,
                x_range: data_range(panel.xs),
                y_range: data_range(panel.ys),
            };
            self.write_panel(emit, panel, &frame)?;
        }

        let mut x_label = AttrList::new();
        x_label
            .add_f64("x", (MARGIN_LEFT + width - MARGIN_RIGHT) / 2.0)
            .add_f64("y", height - 6.0)
            .add("text-anchor", "middle")
            .add("font-size", "12");
        emit.text("text", &x_label, "x")?;

        emit.close("svg")
    }

    fn write_panel<W: std::io::Write>(
        &self,
        emit: &mut SvgEmitter<'_, W>,
        panel: &Panel<'_>,
        frame: &Frame,
    ) -> Result<(), RenderError> {
        let mut group = AttrList::new();
        group.add("class", "panel");
        emit.open("g", &group)?;

        let mut title = AttrList::new();
        title
            .add_f64("x", (frame.left + frame.right) / 2.0)
            .add_f64("y", frame.top - 7.0)
            .add("text-anchor", "middle")
            .add("font-size", "13");
        emit.text("text", &title, panel.title)?;

        self.write_grid(emit, frame)?;

        let mut border = AttrList::new();
        border
            .add_f64("x", frame.left)
            .add_f64("y", frame.top)
            .add_f64("width", frame.right - frame.left)
            .add_f64("height", frame.bottom - frame.top)
            .add("fill", "none")
            .add("stroke", "black");
        emit.empty("rect", &border)?;

        let segments = decimate(panel.xs, panel.ys, self.settings.max_points);
        let d = segments
            .iter()
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let points = segment
                    .iter()
                    .map(|&point| {
                        let (x, y) = frame.project(point);
                        format!("{},{}", coord(x), coord(y))
                    })
                    .join(" L");
                format!("M{}", points)
            })
            .join(" ");
        let mut path = AttrList::new();
        path.add("d", d)
            .add("fill", "none")
            .add("stroke", panel.colour)
            .add("stroke-width", "1.5");
        emit.empty("path", &path)?;

        let mut legend = AttrList::new();
        legend
            .add_f64("x", frame.right - 8.0)
            .add_f64("y", frame.top + 16.0)
            .add("text-anchor", "end")
            .add("font-size", "12")
            .add("fill", panel.colour);
        emit.text("text", &legend, panel.legend)?;

        emit.close("g")
    }

    fn write_grid<W: std::io::Write>(
        &self,
        emit: &mut SvgEmitter<'_, W>,
        frame: &Frame,
    ) -> Result<(), RenderError> {
        let (x0, x1) = frame.x_range;
        let (y0, y1) = frame.y_range;

        for k in 0..=TICKS {
            let t = k as f64 / TICKS as f64;

            let x = frame.left + t * (frame.right - frame.left);
            let mut line = AttrList::new();
            line.add_f64("x1", x)
                .add_f64("y1", frame.top)
                .add_f64("x2", x)
                .add_f64("y2", frame.bottom)
                .add("stroke", GRID_COLOUR);
            emit.empty("line", &line)?;

            let mut label = AttrList::new();
            label
                .add_f64("x", x)
                .add_f64("y", frame.bottom + 14.0)
                .add("text-anchor", "middle")
                .add("font-size", "10");
            emit.text("text", &label, &tick_label(x0 + t * (x1 - x0)))?;

            let y = frame.bottom - t * (frame.bottom - frame.top);
            let mut line = AttrList::new();
            line.add_f64("x1", frame.left)
                .add_f64("y1", y)
                .add_f64("x2", frame.right)
                .add_f64("y2", y)
                .add("stroke", GRID_COLOUR);
            emit.empty("line", &line)?;

            let mut label = AttrList::new();
            label
                .add_f64("x", frame.left - 6.0)
                .add_f64("y", y + 4.0)
                .add("text-anchor", "end")
                .add("font-size", "10");
            emit.text("text", &label, &tick_label(y0 + t * (y1 - y0)))?;
        }
        Ok(())
    }
}

impl PlotRenderer for SvgRenderer {
    fn render(&self, request: &PlotRequest<'_>) -> Result<EncodedPlot, RenderError> {
        let document = self.document(request)?;
        Ok(EncodedPlot {
            mime: SVG_MIME.to_string(),
            data: STANDARD.encode(document.as_bytes()),
        })
    }
}
