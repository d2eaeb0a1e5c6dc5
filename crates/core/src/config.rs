use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::LayoutConfig;
use crate::viewport::ZoomConfig;
use crate::views::SceneStyle;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("zoom bounds must satisfy 0 < min_zoom <= max_zoom (got {min}..{max})")]
    ZoomBounds { min: f64, max: f64 },
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
}

/// Everything tunable about the viewer. Every field has a default, so a
/// partial JSON object (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub layout: LayoutConfig,
    pub scene: SceneStyle,
    pub zoom: ZoomConfig,
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        if !(zoom.min_zoom > 0.0 && zoom.min_zoom <= zoom.max_zoom) {
            return Err(ConfigError::ZoomBounds {
                min: zoom.min_zoom,
                max: zoom.max_zoom,
            });
        }
        for (field, value) in [
            ("zoom.wheel_damping", zoom.wheel_damping),
            ("zoom.wheel_sensitivity", zoom.wheel_sensitivity),
            ("layout.breadth_per_canvas_height", self.layout.breadth_per_canvas_height),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.zoom.min_zoom, 0.1);
        assert_eq!(config.zoom.max_zoom, 4.0);
        assert_eq!(config.scene.marker_radius, 10.0);
        assert_eq!(config.layout.breadth_per_canvas_height, 300.0);
    }

    #[test]
    fn partial_override() {
        let config =
            ViewerConfig::from_json(r#"{"zoom":{"max_zoom":8.0},"scene":{"font_size":18.0}}"#)
                .unwrap();
        assert_eq!(config.zoom.max_zoom, 8.0);
        assert_eq!(config.zoom.min_zoom, 0.1);
        assert_eq!(config.scene.font_size, 18.0);
        assert_eq!(config.scene.label_offset, 25.0);
    }

    #[test]
    fn rejects_inverted_zoom_bounds() {
        let err = ViewerConfig::from_json(r#"{"zoom":{"min_zoom":5.0,"max_zoom":1.0}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZoomBounds { .. }));
        assert!(ViewerConfig::from_json(r#"{"zoom":{"min_zoom":0.0}}"#).is_err());
    }

    #[test]
    fn rejects_zero_sensitivity() {
        let err = ViewerConfig::from_json(r#"{"zoom":{"wheel_sensitivity":0.0}}"#).unwrap_err();
        assert!(err.to_string().contains("wheel_sensitivity"));
    }
}
