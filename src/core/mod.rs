//! Pure signal-handling algorithms shared by every sensor type.
//!
//! This module contains:
//! - Range normalization applied to each channel before plotting
//! - Category segmentation of the per-sample label stream
//! - Activity labels and the label → color palette

pub mod labels;
pub mod normalize;
pub mod segment;

// Re-export commonly used types
pub use labels::{default_label_styles, Label, LabelPalette, LabelStyle};
pub use normalize::{normalize, NORMALIZED_MAX, NORMALIZED_MIN};
pub use segment::{segment, CategoryInterval};
