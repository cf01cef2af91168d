//! Plot rendering for finished sessions.
//!
//! Sensors draw through the [`RenderSurface`] trait, addressing a vertical
//! stack of plot rows. [`Figure`] records those commands and can render them
//! as an SVG document.

pub mod figure;

pub use figure::{parse_color, Figure, PlotCommand};

use serde::{Deserialize, Serialize};

/// One row in a vertical stack of `total_rows` plot rows (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowAddress {
    pub total_rows: usize,
    pub row: usize,
}

impl RowAddress {
    pub fn new(total_rows: usize, row: usize) -> Self {
        Self { total_rows, row }
    }
}

/// Something plot commands can be drawn on.
pub trait RenderSurface {
    /// Declare a titled plot region for a row.
    fn region(&mut self, at: RowAddress, title: &str, x_label: &str, y_label: &str);

    /// Draw a line series in a row.
    fn line(&mut self, at: RowAddress, x: &[f64], y: &[f64]);

    /// Shade the background of a row between two x positions.
    fn band(&mut self, at: RowAddress, start: f64, end: f64, color: &str, alpha: f64);
}
