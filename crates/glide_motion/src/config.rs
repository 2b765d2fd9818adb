//! Motion configuration file handling
//!
//! Glide reads one optional TOML file. Every section and every key has a
//! default, so an empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! [engine]
//! ease = "power2.out"
//! duration_ms = 600
//! force_3d = true
//! debug_markers = false
//! refresh_on_history = true
//!
//! [reveal]
//! margin_px = -50.0
//! threshold = 0.0
//!
//! [route]
//! overlap = "wait"
//!
//! [accessibility]
//! reduced_motion = "system"
//! ```

use std::fs;
use std::path::Path;

use glide_animation::Easing;
use serde::{Deserialize, Serialize};

use crate::engine::EngineDefaults;
use crate::error::{MotionError, Result};
use crate::preference::ReducedMotionOverride;
use crate::reveal::ViewportTrigger;
use crate::route::OverlapPolicy;

/// Longest duration accepted for engine defaults
const MAX_DURATION_MS: u32 = 10_000;

/// Top-level motion configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MotionConfig {
    #[serde(default)]
    pub engine: EngineDefaults,
    #[serde(default)]
    pub reveal: ViewportTrigger,
    #[serde(default)]
    pub route: RouteConfig,
    #[serde(default)]
    pub accessibility: AccessibilityConfig,
}

/// Route transition settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

/// Accessibility settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessibilityConfig {
    #[serde(default)]
    pub reduced_motion: ReducedMotionOverride,
}

impl MotionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MotionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MotionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading motion config");
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Override the engine's default easing by name
    pub fn with_ease(mut self, name: &str) -> Result<Self> {
        self.engine.ease = name.parse::<Easing>()?;
        Ok(self)
    }

    /// Check ranges serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.engine.duration_ms > MAX_DURATION_MS {
            return Err(MotionError::InvalidValue {
                field: "engine.duration_ms",
                reason: format!(
                    "{} exceeds the {MAX_DURATION_MS} ms limit",
                    self.engine.duration_ms
                ),
            });
        }
        if !self.reveal.margin_px.is_finite() {
            return Err(MotionError::InvalidValue {
                field: "reveal.margin_px",
                reason: "must be a finite number".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(MotionError::InvalidValue {
                field: "reveal.threshold",
                reason: format!("{} is outside 0.0..=1.0", self.reveal.threshold),
            });
        }
        if self.reveal.margin_px > 0.0 {
            tracing::warn!(
                margin_px = self.reveal.margin_px,
                "positive reveal margin fires reveals before elements are visible"
            );
        }
        Ok(())
    }

    /// Engine defaults to pass to `TimelineEngine::configure`
    pub fn engine_defaults(&self) -> EngineDefaults {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MotionConfig::from_toml_str("").unwrap();
        assert_eq!(config, MotionConfig::default());
        assert_eq!(config.reveal.margin_px, -50.0);
        assert_eq!(config.route.overlap, OverlapPolicy::Wait);
        assert_eq!(config.accessibility.reduced_motion, ReducedMotionOverride::System);
    }

    #[test]
    fn test_full_config() {
        let config = MotionConfig::from_toml_str(
            r#"
            [engine]
            ease = "power2.out"
            duration_ms = 600
            force_3d = false
            refresh_on_history = false

            [reveal]
            margin_px = -80.0
            threshold = 0.25

            [route]
            overlap = "simultaneous"

            [accessibility]
            reduced_motion = "always"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.ease, Easing::EaseOutCubic);
        assert_eq!(config.engine.duration_ms, 600);
        assert!(!config.engine.force_3d);
        assert!(!config.engine.debug_markers);
        assert!(!config.engine.refresh_on_history);
        assert_eq!(config.reveal.threshold, 0.25);
        assert_eq!(config.route.overlap, OverlapPolicy::Simultaneous);
        assert_eq!(config.accessibility.reduced_motion, ReducedMotionOverride::Always);
    }

    #[test]
    fn test_cubic_bezier_ease() {
        let config = MotionConfig::from_toml_str(
            r#"
            [engine]
            ease = "cubic-bezier(0.22, 1, 0.36, 1)"
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.ease, Easing::CubicBezier(0.22, 1.0, 0.36, 1.0));
    }

    #[test]
    fn test_unknown_ease_is_parse_error() {
        let err = MotionConfig::from_toml_str("[engine]\nease = \"wobbly\"").unwrap_err();
        assert!(matches!(err, MotionError::Parse(_)));
        assert!(err.to_string().contains("wobbly"));
    }

    #[test]
    fn test_with_ease_reports_invalid_easing() {
        let err = MotionConfig::default().with_ease("bounce.out").unwrap_err();
        assert!(matches!(err, MotionError::InvalidEasing(_)));

        let config = MotionConfig::default().with_ease("power3.inOut").unwrap();
        assert_eq!(config.engine.ease, Easing::EaseInOutQuart);
    }

    #[test]
    fn test_out_of_range_values() {
        let err = MotionConfig::from_toml_str("[reveal]\nthreshold = 1.5").unwrap_err();
        assert!(matches!(
            err,
            MotionError::InvalidValue {
                field: "reveal.threshold",
                ..
            }
        ));

        let err = MotionConfig::from_toml_str("[engine]\nduration_ms = 60000").unwrap_err();
        assert!(matches!(
            err,
            MotionError::InvalidValue {
                field: "engine.duration_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_overlap_is_rejected() {
        let err = MotionConfig::from_toml_str("[route]\noverlap = \"later\"").unwrap_err();
        assert!(matches!(err, MotionError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MotionConfig::default().with_ease("power2.out").unwrap();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("ease = \"power2.out\""));
        assert_eq!(MotionConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = MotionConfig::load("/nonexistent/glide.toml").unwrap_err();
        assert!(matches!(err, MotionError::Io { .. }));
    }
}
