//! Configuration for the activity recorder.

use crate::core::labels::{default_label_styles, Label, LabelPalette, LabelStyle};
use crate::error::ConfigError;
use crate::sensor::SensorKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interval between sampling ticks
    #[serde(with = "duration_millis")]
    pub tick_interval: Duration,

    /// Directory that receives one sub-directory per recorded session
    pub output_dir: PathBuf,

    /// Maximum number of proximity sensors per session
    pub max_proximity: usize,

    /// Maximum number of orientation sensors per session
    pub max_orientation: usize,

    /// Selectable labels and their band colors
    pub labels: Vec<LabelStyle>,

    /// Label selected when a recording starts
    pub default_label: String,

    /// Band color for labels not listed in `labels`
    pub fallback_color: String,

    /// Opacity of category bands (0-1)
    pub band_alpha: f64,

    /// Fusion filter slerp power for orientation sensors
    pub fusion_slerp_power: f64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("activity-recorder");

        Self {
            tick_interval: Duration::from_millis(10),
            output_dir: data_dir.join("sessions"),
            max_proximity: 4,
            max_orientation: 2,
            labels: default_label_styles(),
            default_label: "nothing".to_string(),
            fallback_color: "green".to_string(),
            band_alpha: 0.3,
            fusion_slerp_power: 0.02,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("activity-recorder")
            .join("config.json")
    }

    /// Ensure the output directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Label → color lookup built from this configuration.
    pub fn palette(&self) -> LabelPalette {
        LabelPalette::new(self.labels.clone(), self.fallback_color.clone(), self.band_alpha)
    }

    pub fn default_label(&self) -> Label {
        Label::new(self.default_label.clone())
    }
}

/// The data sources requested for one recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub proximity: usize,
    pub orientation: usize,
    pub camera: bool,
}

impl SessionRequest {
    pub fn new(proximity: usize, orientation: usize, camera: bool) -> Self {
        Self {
            proximity,
            orientation,
            camera,
        }
    }

    /// Parse a comma-separated request such as `proximity=2,orientation=1,camera`.
    ///
    /// A bare sensor kind counts as one unit.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let mut request = Self::default();

        for item in s.split(',').map(|s| s.trim().to_lowercase()) {
            if item.is_empty() {
                continue;
            }
            let (key, count) = match item.split_once('=') {
                Some((key, value)) => {
                    let count = value.trim().parse::<usize>().map_err(|_| {
                        ConfigError::Parse(format!("invalid sensor count in '{item}'"))
                    })?;
                    (key.trim().to_string(), count)
                }
                None => (item.clone(), 1),
            };

            match key.as_str() {
                "proximity" | "prox" => request.proximity = count,
                "orientation" | "imu" => request.orientation = count,
                "camera" => request.camera = count > 0,
                other => {
                    return Err(ConfigError::Parse(format!("unknown data source '{other}'")));
                }
            }
        }

        Ok(request)
    }

    /// Number of requested sensors of `kind`.
    pub fn count(&self, kind: SensorKind) -> usize {
        match kind {
            SensorKind::Proximity => self.proximity,
            SensorKind::Orientation => self.orientation,
        }
    }

    /// Check if no data source at all was requested.
    pub fn is_empty(&self) -> bool {
        self.proximity == 0 && self.orientation == 0 && !self.camera
    }
}

/// Serde support for Duration as milliseconds.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tick_interval, Duration::from_millis(10));
        assert_eq!(config.max_proximity, 4);
        assert_eq!(config.max_orientation, 2);
        assert_eq!(config.default_label(), Label::from("nothing"));
        assert_eq!(config.labels.len(), 3);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"tick_interval\":10"));

        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.tick_interval, config.tick_interval);
        assert_eq!(parsed.labels, config.labels);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = serde_json::from_str(r#"{"max_proximity": 2}"#).unwrap();
        assert_eq!(parsed.max_proximity, 2);
        assert_eq!(parsed.max_orientation, 2);
        assert_eq!(parsed.default_label, "nothing");
    }

    #[test]
    fn test_palette_from_config() {
        let mut config = Config::default();
        config.fallback_color = "gray".to_string();
        let palette = config.palette();
        assert_eq!(palette.color_for(&Label::from("talking")), "red");
        assert_eq!(palette.color_for(&Label::from("walking")), "gray");
    }

    #[test]
    fn test_session_request_parsing() {
        let request = SessionRequest::parse("proximity=2, orientation=1").unwrap();
        assert_eq!(request, SessionRequest::new(2, 1, false));

        let request = SessionRequest::parse("imu,camera").unwrap();
        assert_eq!(request, SessionRequest::new(0, 1, true));

        assert!(SessionRequest::parse("").unwrap().is_empty());
        assert!(SessionRequest::parse("lidar=1").is_err());
        assert!(SessionRequest::parse("proximity=many").is_err());
    }

    #[test]
    fn test_camera_alone_is_not_empty() {
        assert!(!SessionRequest::new(0, 0, true).is_empty());
        assert!(SessionRequest::new(0, 0, false).is_empty());
    }
}
