use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::math::{EARTH_RADIUS_KM, GLOBE_RADIUS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GEOPULSE_CONFIG";

/// Engine configuration root. Every section and field is optional in TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub globe: GlobeConfig,
    #[serde(default)]
    pub arcs: ArcConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Inline)
    }

    /// Loads configuration from an explicit path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `GEOPULSE_CONFIG` if set, else `./config/geopulse.toml` if present,
    /// else defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("geopulse.toml"))
            .map_err(|source| ConfigError::Io {
                path: PathBuf::from("."),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeConfig {
    /// Globe radius in render units.
    #[serde(default = "GlobeConfig::default_radius")]
    pub radius: f64,
    /// Earth radius used for metre-denominated sizes.
    #[serde(default = "GlobeConfig::default_earth_radius_km")]
    pub earth_radius_km: f64,
}

impl GlobeConfig {
    fn default_radius() -> f64 {
        GLOBE_RADIUS
    }

    fn default_earth_radius_km() -> f64 {
        EARTH_RADIUS_KM
    }

    /// Render units per metre on the globe surface.
    pub fn units_per_metre(&self) -> f64 {
        self.radius / (self.earth_radius_km * 1000.0)
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: Self::default_radius(),
            earth_radius_km: Self::default_earth_radius_km(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcConfig {
    /// Default apex height above the surface, in render units.
    #[serde(default = "ArcConfig::default_height")]
    pub height: f64,
    /// Default number of polyline segments per arc.
    #[serde(default = "ArcConfig::default_segments")]
    pub segments: usize,
}

impl ArcConfig {
    fn default_height() -> f64 {
        15.0
    }

    fn default_segments() -> usize {
        64
    }
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            height: Self::default_height(),
            segments: Self::default_segments(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse config: {0}")]
    Inline(#[source] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.globe.radius, 100.0);
        assert_eq!(cfg.arcs.segments, 64);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [arcs]
            height = 30.0

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.arcs.height, 30.0);
        assert_eq!(cfg.arcs.segments, 64);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.globe, GlobeConfig::default());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[globe]\nradius = 1.0").unwrap();
        let cfg = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.globe.radius, 1.0);
        assert!((cfg.globe.units_per_metre() - 1.0 / 6_371_000.0).abs() < 1e-15);
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            EngineConfig::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[arcs\nheight = ").unwrap();
        assert!(matches!(
            EngineConfig::from_file(&bad),
            Err(ConfigError::Parse { .. })
        ));
    }
}
