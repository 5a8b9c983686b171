//! INI configuration.
//!
//! [`GeocamConfig`] groups the tunables of every component. Values not
//! present in the file keep their defaults and unknown keys are ignored, so
//! an empty file is a valid configuration.
//!
//! # Example Configuration (INI)
//!
//! ```ini
//! [camera]
//! min_distance_m = 10
//! min_interval_ms = 700
//! fast_distance_m = 50
//! default_animation_ms = 600
//! max_zoom = 22
//!
//! [crosshair]
//! frame_interval_ms = 16
//! hide_after_ms = 2000
//!
//! [cog]
//! min_interval_ms = 500
//!
//! [location]
//! max_age_ms = 300000
//! low_accuracy_timeout_ms = 5000
//! high_accuracy_timeout_ms = 20000
//!
//! [logging]
//! level = info
//! file = /tmp/geocam.log
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, Properties};
use thiserror::Error;

use crate::camera::CameraConfig;
use crate::location::LocatorConfig;
use crate::navigation::CogConfig;
use crate::region::CrosshairConfig;

/// Default log filter when neither the file nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value '{value}' for [{section}] {key}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `geocam=debug`.
    pub level: String,
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// All tunables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocamConfig {
    pub camera: CameraConfig,
    pub crosshair: CrosshairConfig,
    pub cog: CogConfig,
    pub location: LocatorConfig,
    pub logging: LoggingConfig,
}

impl GeocamConfig {
    /// Read a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ini_str(&text)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        if let Some(props) = ini.section(Some("camera")) {
            let camera = &mut config.camera;
            read_non_negative(props, "camera", "min_distance_m", &mut camera.min_distance_m)?;
            read(props, "camera", "min_interval_ms", &mut camera.min_interval_ms)?;
            read_non_negative(props, "camera", "fast_distance_m", &mut camera.fast_distance_m)?;
            read(props, "camera", "default_animation_ms", &mut camera.default_animation_ms)?;
            read(props, "camera", "fly_animation_ms", &mut camera.fly_animation_ms)?;
            read(props, "camera", "pitch_animation_ms", &mut camera.pitch_animation_ms)?;
            read_non_negative(props, "camera", "max_zoom", &mut camera.max_zoom)?;
            read_non_negative(props, "camera", "navigate_zoom", &mut camera.navigate_zoom)?;
            read_non_negative(props, "camera", "focus_zoom", &mut camera.focus_zoom)?;
            read_non_negative(props, "camera", "locate_zoom", &mut camera.locate_zoom)?;
            read_non_negative(props, "camera", "cluster_zoom_step", &mut camera.cluster_zoom_step)?;
            read(props, "camera", "distance_memo_capacity", &mut camera.distance_memo_capacity)?;
            read(props, "camera", "distance_memo_ttl_ms", &mut camera.distance_memo_ttl_ms)?;
        }

        if let Some(props) = ini.section(Some("crosshair")) {
            let crosshair = &mut config.crosshair;
            read(props, "crosshair", "frame_interval_ms", &mut crosshair.frame_interval_ms)?;
            read(props, "crosshair", "hide_after_ms", &mut crosshair.hide_after_ms)?;
        }

        if let Some(props) = ini.section(Some("cog")) {
            read(props, "cog", "min_interval_ms", &mut config.cog.min_interval_ms)?;
        }

        if let Some(props) = ini.section(Some("location")) {
            let location = &mut config.location;
            read(props, "location", "max_age_ms", &mut location.max_age_ms)?;
            read(props, "location", "low_accuracy_timeout_ms", &mut location.low_accuracy_timeout_ms)?;
            read(props, "location", "high_accuracy_timeout_ms", &mut location.high_accuracy_timeout_ms)?;
        }

        if let Some(props) = ini.section(Some("logging")) {
            if let Some(level) = props.get("level").map(str::trim).filter(|s| !s.is_empty()) {
                config.logging.level = level.to_string();
            }
            if let Some(file) = props.get("file").map(str::trim).filter(|s| !s.is_empty()) {
                config.logging.file = Some(PathBuf::from(file));
            }
        }

        Ok(config)
    }
}

/// Overwrite `target` with `section.key` if present.
fn read<T: FromStr>(
    props: &Properties,
    section: &'static str,
    key: &'static str,
    target: &mut T,
) -> Result<(), ConfigError> {
    let Some(raw) = props.get(key) else {
        return Ok(());
    };
    *target = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        section,
        key,
        value: raw.to_string(),
    })?;
    Ok(())
}

/// Like [`read`], for thresholds that must be finite and not negative.
fn read_non_negative(
    props: &Properties,
    section: &'static str,
    key: &'static str,
    target: &mut f64,
) -> Result<(), ConfigError> {
    let mut value = *target;
    read(props, section, key, &mut value)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue {
            section,
            key,
            value: props.get(key).unwrap_or_default().to_string(),
        });
    }
    *target = value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_is_default() {
        let config = GeocamConfig::from_ini_str("").unwrap();
        assert_eq!(config, GeocamConfig::default());
        assert_eq!(config.camera.min_interval_ms, 700);
        assert_eq!(config.crosshair.frame_interval_ms, 16);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_overrides_and_unknown_keys() {
        let text = "\
[camera]
min_distance_m = 25.5
max_zoom = 20
shiny = yes

[crosshair]
hide_after_ms = 1500

[cog]
min_interval_ms = 250

[location]
max_age_ms = 60000

[logging]
level = geocam=debug
file = /tmp/geocam.log

[unrelated]
anything = goes
";
        let config = GeocamConfig::from_ini_str(text).unwrap();
        assert_eq!(config.camera.min_distance_m, 25.5);
        assert_eq!(config.camera.max_zoom, 20.0);
        assert_eq!(config.camera.min_interval_ms, 700);
        assert_eq!(config.crosshair.hide_after_ms, 1_500);
        assert_eq!(config.cog.min_interval_ms, 250);
        assert_eq!(config.location.max_age_ms, 60_000);
        assert_eq!(config.location.low_accuracy_timeout_ms, 5_000);
        assert_eq!(config.logging.level, "geocam=debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/geocam.log")));
    }

    #[test]
    fn test_malformed_number_names_key() {
        let err = GeocamConfig::from_ini_str("[camera]\nmin_interval_ms = soon\n").unwrap_err();
        match err {
            ConfigError::InvalidValue {
                section,
                key,
                value,
            } => {
                assert_eq!(section, "camera");
                assert_eq!(key, "min_interval_ms");
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_interval_rejected() {
        let err = GeocamConfig::from_ini_str("[crosshair]\nframe_interval_ms = -16\n").unwrap_err();
        assert!(err.to_string().contains("[crosshair] frame_interval_ms"));
    }

    #[test]
    fn test_nan_distance_rejected() {
        let err = GeocamConfig::from_ini_str("[camera]\nmin_distance_m = NaN\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                section: "camera",
                key: "min_distance_m",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_and_infinite_thresholds_rejected() {
        for text in [
            "[camera]\nmin_distance_m = -5\n",
            "[camera]\nfast_distance_m = inf\n",
            "[camera]\nmax_zoom = -1\n",
        ] {
            assert!(
                matches!(
                    GeocamConfig::from_ini_str(text),
                    Err(ConfigError::InvalidValue { .. })
                ),
                "accepted {text:?}"
            );
        }
        let config = GeocamConfig::from_ini_str("[camera]\nmin_distance_m = 0\n").unwrap();
        assert_eq!(config.camera.min_distance_m, 0.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[camera]\nfast_distance_m = 80").unwrap();

        let config = GeocamConfig::load(file.path()).unwrap();
        assert_eq!(config.camera.fast_distance_m, 80.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = GeocamConfig::load("/nonexistent/geocam.ini").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
