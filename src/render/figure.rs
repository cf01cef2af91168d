//! In-memory figure that records plot commands and renders them to SVG.

use crate::core::normalize::{NORMALIZED_MAX, NORMALIZED_MIN};
use crate::error::RenderError;
use crate::render::{RenderSurface, RowAddress};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

const WIDTH: u32 = 900;
const ROW_HEIGHT: u32 = 180;

/// Headroom above and below the normalized range on the y axis.
const Y_PADDING: f64 = 0.1;

/// Band color for names that are not recognized.
const FALLBACK_COLOR: RGBColor = RGBColor(128, 128, 128);

/// A single recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotCommand {
    Region {
        at: RowAddress,
        title: String,
        x_label: String,
        y_label: String,
    },
    Line {
        at: RowAddress,
        x: Vec<f64>,
        y: Vec<f64>,
    },
    Band {
        at: RowAddress,
        start: f64,
        end: f64,
        color: String,
        alpha: f64,
    },
}

impl PlotCommand {
    pub fn address(&self) -> RowAddress {
        match self {
            PlotCommand::Region { at, .. }
            | PlotCommand::Line { at, .. }
            | PlotCommand::Band { at, .. } => *at,
        }
    }
}

/// A stack of plot rows built up from [`RenderSurface`] calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Figure {
    commands: Vec<PlotCommand>,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PlotCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of rows in the stack, as declared by the drawn commands.
    pub fn total_rows(&self) -> usize {
        self.commands
            .iter()
            .map(|c| c.address().total_rows)
            .max()
            .unwrap_or(0)
    }

    /// Title of the region declared for `row`, if any.
    pub fn title_of(&self, row: usize) -> Option<&str> {
        self.commands.iter().find_map(|c| match c {
            PlotCommand::Region { at, title, .. } if at.row == row => Some(title.as_str()),
            _ => None,
        })
    }

    /// Line series drawn in `row`.
    pub fn lines_in(&self, row: usize) -> Vec<(&[f64], &[f64])> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                PlotCommand::Line { at, x, y } if at.row == row => {
                    Some((x.as_slice(), y.as_slice()))
                }
                _ => None,
            })
            .collect()
    }

    /// Bands shaded in `row` as `(start, end, color)`.
    pub fn bands_in(&self, row: usize) -> Vec<(f64, f64, &str)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                PlotCommand::Band {
                    at,
                    start,
                    end,
                    color,
                    ..
                } if at.row == row => Some((*start, *end, color.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Render the figure as a standalone SVG document, one chart per row.
    pub fn to_svg(&self) -> Result<String, RenderError> {
        let rows = self.total_rows();
        let height = ROW_HEIGHT * rows.max(1) as u32;
        let mut svg = String::new();

        {
            let root = SVGBackend::with_string(&mut svg, (WIDTH, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            if rows > 0 {
                for (row, area) in root.split_evenly((rows, 1)).iter().enumerate() {
                    self.draw_row(area, row)?;
                }
            }

            root.present().map_err(draw_error)?;
        }

        Ok(svg)
    }

    fn draw_row<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        row: usize,
    ) -> Result<(), RenderError> {
        let (x_min, x_max) = self.x_range(row);
        let y_min = NORMALIZED_MIN - Y_PADDING;
        let y_max = NORMALIZED_MAX + Y_PADDING;

        let mut builder = ChartBuilder::on(area);
        builder
            .margin(8)
            .x_label_area_size(28)
            .y_label_area_size(40);
        if let Some(title) = self.title_of(row) {
            builder.caption(title, ("sans-serif", 14).into_font());
        }
        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_error)?;

        let (x_label, y_label) = self.axis_labels(row);
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh().x_labels(5).y_labels(5).x_desc(x_label);
        if !y_label.is_empty() {
            mesh.y_desc(y_label);
        }
        mesh.draw().map_err(draw_error)?;

        // bands first so the series stays visible on top
        let bands = self.bands_in_row(row).map(|(start, end, color, alpha)| {
            Rectangle::new(
                [(start, y_min), (end, y_max)],
                parse_color(color).mix(alpha).filled(),
            )
        });
        chart.draw_series(bands).map_err(draw_error)?;

        for (x, y) in self.lines_in(row) {
            let points = x
                .iter()
                .copied()
                .zip(y.iter().copied())
                .filter(|(x, y)| x.is_finite() && y.is_finite());
            chart
                .draw_series(LineSeries::new(points, &BLACK))
                .map_err(draw_error)?;
        }

        Ok(())
    }

    fn axis_labels(&self, row: usize) -> (&str, &str) {
        self.commands
            .iter()
            .find_map(|c| match c {
                PlotCommand::Region {
                    at,
                    x_label,
                    y_label,
                    ..
                } if at.row == row => Some((x_label.as_str(), y_label.as_str())),
                _ => None,
            })
            .unwrap_or(("", ""))
    }

    fn bands_in_row(&self, row: usize) -> impl Iterator<Item = (f64, f64, &str, f64)> + '_ {
        self.commands.iter().filter_map(move |c| match c {
            PlotCommand::Band {
                at,
                start,
                end,
                color,
                alpha,
            } if at.row == row => Some((*start, *end, color.as_str(), *alpha)),
            _ => None,
        })
    }

    /// Extent of all x positions drawn in a row, widened if degenerate.
    fn x_range(&self, row: usize) -> (f64, f64) {
        let xs = self
            .commands
            .iter()
            .filter(|c| c.address().row == row)
            .flat_map(|c| match c {
                PlotCommand::Line { x, .. } => x.clone(),
                PlotCommand::Band { start, end, .. } => vec![*start, *end],
                PlotCommand::Region { .. } => Vec::new(),
            })
            .filter(|x| x.is_finite());

        let (min, max) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });

        if !min.is_finite() || !max.is_finite() {
            (0.0, 1.0)
        } else if max - min <= f64::EPSILON {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        }
    }
}

impl RenderSurface for Figure {
    fn region(&mut self, at: RowAddress, title: &str, x_label: &str, y_label: &str) {
        self.commands.push(PlotCommand::Region {
            at,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        });
    }

    fn line(&mut self, at: RowAddress, x: &[f64], y: &[f64]) {
        self.commands.push(PlotCommand::Line {
            at,
            x: x.to_vec(),
            y: y.to_vec(),
        });
    }

    fn band(&mut self, at: RowAddress, start: f64, end: f64, color: &str, alpha: f64) {
        self.commands.push(PlotCommand::Band {
            at,
            start,
            end,
            color: color.to_string(),
            alpha,
        });
    }
}

fn draw_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Map a configured color name or `#rrggbb` value to an RGB color.
///
/// Unknown names render gray.
pub fn parse_color(name: &str) -> RGBColor {
    let name = name.trim().to_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() == 6 {
            if let Ok(value) = u32::from_str_radix(hex, 16) {
                return RGBColor((value >> 16) as u8, (value >> 8) as u8, value as u8);
            }
        }
        return FALLBACK_COLOR;
    }

    match name.as_str() {
        "black" => BLACK,
        "white" => WHITE,
        "red" => RGBColor(255, 0, 0),
        "green" => RGBColor(0, 128, 0),
        "blue" => RGBColor(0, 0, 255),
        "yellow" => RGBColor(255, 255, 0),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "pink" => RGBColor(255, 192, 203),
        "cyan" => CYAN,
        "magenta" => MAGENTA,
        _ => FALLBACK_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_figure() -> Figure {
        let mut figure = Figure::new();
        let at = RowAddress::new(2, 0);
        figure.region(at, "proximity 0", "Time", "");
        figure.line(at, &[0.0, 1.0, 2.0], &[-1.0, 0.0, 1.0]);
        figure.band(at, 0.0, 1.0, "blue", 0.3);
        figure.band(at, 1.0, 2.0, "green", 0.3);
        figure.region(RowAddress::new(2, 1), "orientation 0 Roll", "Time", "");
        figure
    }

    #[test]
    fn test_records_commands_per_row() {
        let figure = sample_figure();
        assert_eq!(figure.total_rows(), 2);
        assert_eq!(figure.title_of(0), Some("proximity 0"));
        assert_eq!(figure.title_of(1), Some("orientation 0 Roll"));
        assert_eq!(figure.lines_in(0).len(), 1);
        assert!(figure.lines_in(1).is_empty());
        assert_eq!(
            figure.bands_in(0),
            vec![(0.0, 1.0, "blue"), (1.0, 2.0, "green")]
        );
    }

    #[test]
    fn test_svg_contains_titles_bands_and_lines() {
        let svg = sample_figure().to_svg().unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("proximity 0"));
        assert!(svg.contains("orientation 0 Roll"));
        assert!(svg.contains("<polyline"));
        // background plus two bands
        assert!(svg.matches("<rect").count() >= 3);
    }

    #[test]
    fn test_zero_width_band_renders() {
        let mut figure = Figure::new();
        let at = RowAddress::new(1, 0);
        figure.region(at, "proximity 0", "Time", "");
        figure.line(at, &[0.5], &[0.0]);
        figure.band(at, 0.5, 0.5, "red", 0.3);

        assert_eq!(figure.x_range(0), (0.0, 1.0));
        let svg = figure.to_svg().unwrap();
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_empty_figure_is_valid_svg() {
        let figure = Figure::new();
        assert_eq!(figure.total_rows(), 0);
        let svg = figure.to_svg().unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("blue").rgb(), (0, 0, 255));
        assert_eq!(parse_color(" Green ").rgb(), (0, 128, 0));
        assert_eq!(parse_color("#ff8000").rgb(), (255, 128, 0));
        assert_eq!(parse_color("#zz").rgb(), FALLBACK_COLOR.rgb());
        assert_eq!(parse_color("chartreuse").rgb(), FALLBACK_COLOR.rgb());
    }

    #[test]
    fn test_commands_serialize_with_kind_tag() {
        let json = serde_json::to_string(&sample_figure()).unwrap();
        assert!(json.contains(r#""kind":"region""#));
        assert!(json.contains(r#""kind":"band""#));
    }
}
