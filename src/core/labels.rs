//! Activity labels and their band colors.
//!
//! A label is an opaque token chosen live by the operator. Nothing in the
//! sampling path validates it; the palette only decides how it is shaded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An activity tag attached to every sample taken during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A selectable label and the color used to shade its intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub name: String,
    pub color: String,
}

impl LabelStyle {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// The reference label set: eating, talking, nothing.
pub fn default_label_styles() -> Vec<LabelStyle> {
    vec![
        LabelStyle::new("eating", "green"),
        LabelStyle::new("talking", "red"),
        LabelStyle::new("nothing", "blue"),
    ]
}

/// Label → color lookup used when shading category intervals.
#[derive(Debug, Clone)]
pub struct LabelPalette {
    styles: Vec<LabelStyle>,
    fallback: String,
    alpha: f64,
}

impl LabelPalette {
    pub fn new(styles: Vec<LabelStyle>, fallback: impl Into<String>, alpha: f64) -> Self {
        Self {
            styles,
            fallback: fallback.into(),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Color for a label; labels outside the palette get the fallback color.
    pub fn color_for(&self, label: &Label) -> &str {
        self.styles
            .iter()
            .find(|style| style.name == label.as_str())
            .map(|style| style.color.as_str())
            .unwrap_or(&self.fallback)
    }

    /// Opacity of the background bands.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn styles(&self) -> &[LabelStyle] {
        &self.styles
    }

    /// Resolve operator input to a configured label.
    ///
    /// Accepts the full name (case-insensitive) or an unambiguous prefix,
    /// so a single keystroke like `e` selects `eating`.
    pub fn resolve(&self, input: &str) -> Option<Label> {
        let wanted = input.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(style) = self.styles.iter().find(|s| s.name.to_lowercase() == wanted) {
            return Some(Label::new(style.name.clone()));
        }

        let mut matches = self
            .styles
            .iter()
            .filter(|s| s.name.to_lowercase().starts_with(&wanted));
        match (matches.next(), matches.next()) {
            (Some(style), None) => Some(Label::new(style.name.clone())),
            _ => None,
        }
    }
}

impl Default for LabelPalette {
    fn default() -> Self {
        Self::new(default_label_styles(), "green", 0.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_colors() {
        let palette = LabelPalette::default();
        assert_eq!(palette.color_for(&Label::from("nothing")), "blue");
        assert_eq!(palette.color_for(&Label::from("talking")), "red");
        assert_eq!(palette.color_for(&Label::from("eating")), "green");
        assert!((palette.alpha() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_label_uses_fallback() {
        let palette = LabelPalette::new(default_label_styles(), "gray", 0.5);
        assert_eq!(palette.color_for(&Label::from("drinking")), "gray");
    }

    #[test]
    fn test_palette_is_extensible() {
        let mut styles = default_label_styles();
        styles.push(LabelStyle::new("drinking", "purple"));
        let palette = LabelPalette::new(styles, "green", 0.3);
        assert_eq!(palette.color_for(&Label::from("drinking")), "purple");
    }

    #[test]
    fn test_resolve_by_name_and_prefix() {
        let palette = LabelPalette::default();
        assert_eq!(palette.resolve("Eating"), Some(Label::from("eating")));
        assert_eq!(palette.resolve("t"), Some(Label::from("talking")));
        assert_eq!(palette.resolve(" n \n"), Some(Label::from("nothing")));
        assert_eq!(palette.resolve("x"), None);
        assert_eq!(palette.resolve(""), None);
    }

    #[test]
    fn test_resolve_rejects_ambiguous_prefix() {
        let mut styles = default_label_styles();
        styles.push(LabelStyle::new("typing", "orange"));
        styles.push(LabelStyle::new("talking fast", "pink"));
        let palette = LabelPalette::new(styles, "green", 0.3);
        assert_eq!(palette.resolve("ta"), None);
        assert_eq!(palette.resolve("talking"), Some(Label::from("talking")));
    }

    #[test]
    fn test_label_serializes_as_plain_string() {
        let json = serde_json::to_string(&Label::from("eating")).unwrap();
        assert_eq!(json, "\"eating\"");
    }
}
