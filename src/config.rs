use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::comparison::OverlayAlignment;
use crate::format::TimestampZone;
use crate::logging::LogConfig;
use crate::metric::{CoordinateMode, Locale};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Defaults for how comparisons are presented
    #[serde(default)]
    pub display: DisplaySettings,

    /// Batch decoding preferences
    #[serde(default)]
    pub import: ImportSettings,

    /// Chart rendering
    #[serde(default)]
    pub chart: ChartSettings,

    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub coordinate_mode: CoordinateMode,
    pub locale: Locale,
    pub timestamp_zone: TimestampZone,
    pub alignment: OverlayAlignment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Worker threads for batch decoding (None = one per CPU)
    pub threads: Option<usize>,

    pub show_progress: bool,

    /// Skip CRC validation while decoding
    pub lenient: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            display: DisplaySettings::default(),
            import: ImportSettings::default(),
            chart: ChartSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            threads: None,
            show_progress: true,
            lenient: true,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            width: 1200,
            height: 500,
            output_dir: PathBuf::from("./charts"),
        }
    }
}

/// Keys accepted by [`AppConfig::get_value`] and [`AppConfig::set_value`]
pub const CONFIG_KEYS: [&str; 12] = [
    "display.coordinate_mode",
    "display.locale",
    "display.timestamp_zone",
    "display.alignment",
    "import.threads",
    "import.show_progress",
    "import.lenient",
    "chart.width",
    "chart.height",
    "chart.output_dir",
    "logging.level",
    "logging.format",
];

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fitcompare")
            .join("config.toml")
    }

    /// Load from `path` (or the default path) and fall back to defaults when
    /// the file is absent. A file that exists but fails to parse is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            tracing::debug!("Config file not found, using defaults: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from_file(&config_path)
    }

    /// Current value of a dotted key, as text
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            "display.coordinate_mode" => self.display.coordinate_mode.to_string(),
            "display.locale" => self.display.locale.to_string(),
            "display.timestamp_zone" => self.display.timestamp_zone.to_string(),
            "display.alignment" => self.display.alignment.to_string(),
            "import.threads" => self
                .import
                .threads
                .map(|t| t.to_string())
                .unwrap_or_else(|| "auto".to_string()),
            "import.show_progress" => self.import.show_progress.to_string(),
            "import.lenient" => self.import.lenient.to_string(),
            "chart.width" => self.chart.width.to_string(),
            "chart.height" => self.chart.height.to_string(),
            "chart.output_dir" => self.chart.output_dir.display().to_string(),
            "logging.level" => self.logging.level.to_string(),
            "logging.format" => self.logging.format.to_string(),
            _ => bail!("Unknown configuration key: {}", key),
        };
        Ok(value)
    }

    /// Parse `value` and store it under a dotted key
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || format!("Invalid value for {}: {}", key, value);

        match key {
            "display.coordinate_mode" => {
                self.display.coordinate_mode = value.parse().map_err(anyhow::Error::msg).with_context(invalid)?
            }
            "display.locale" => {
                self.display.locale = value.parse().map_err(anyhow::Error::msg).with_context(invalid)?
            }
            "display.timestamp_zone" => {
                self.display.timestamp_zone = value.parse().map_err(anyhow::Error::msg).with_context(invalid)?
            }
            "display.alignment" => {
                self.display.alignment = value.parse().map_err(anyhow::Error::msg).with_context(invalid)?
            }
            "import.threads" => {
                self.import.threads = match value {
                    "auto" | "" => None,
                    n => {
                        let threads: usize = n.parse().with_context(invalid)?;
                        if threads == 0 {
                            bail!("import.threads must be at least 1");
                        }
                        Some(threads)
                    }
                }
            }
            "import.show_progress" => self.import.show_progress = value.parse().with_context(invalid)?,
            "import.lenient" => self.import.lenient = value.parse().with_context(invalid)?,
            "chart.width" => self.chart.width = value.parse().with_context(invalid)?,
            "chart.height" => self.chart.height = value.parse().with_context(invalid)?,
            "chart.output_dir" => self.chart.output_dir = PathBuf::from(value),
            "logging.level" => {
                self.logging.level = value.parse().map_err(anyhow::Error::msg).with_context(invalid)?
            }
            "logging.format" => {
                self.logging.format = value.parse().map_err(anyhow::Error::msg).with_context(invalid)?
            }
            _ => bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }

    /// All keys with their current values
    pub fn list_values(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get_value(key).ok().map(|v| (*key, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.display, deserialized.display);
        assert_eq!(config.import, deserialized.import);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let toml_str = r#"
            [metadata]
            version = "1.0"
            created_at = "2024-01-01T00:00:00Z"
            updated_at = "2024-01-01T00:00:00Z"

            [display]
            locale = "zh"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.display.locale, Locale::Zh);
        assert_eq!(config.display.coordinate_mode, CoordinateMode::Time);
        assert_eq!(config.chart.width, 1200);
        assert!(config.import.lenient);
    }

    #[test]
    fn test_get_and_set_values() {
        let mut config = AppConfig::default();

        config.set_value("display.coordinate_mode", "distance").unwrap();
        config.set_value("import.threads", "4").unwrap();
        config.set_value("display.alignment", "pad").unwrap();
        config.set_value("logging.level", "debug").unwrap();

        assert_eq!(config.get_value("display.coordinate_mode").unwrap(), "distance");
        assert_eq!(config.get_value("import.threads").unwrap(), "4");
        assert_eq!(config.display.alignment, OverlayAlignment::PadWithGaps);

        config.set_value("import.threads", "auto").unwrap();
        assert_eq!(config.import.threads, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = AppConfig::default();
        assert!(config.set_value("display.locale", "fr").is_err());
        assert!(config.set_value("import.threads", "0").is_err());
        assert!(config.set_value("chart.width", "wide").is_err());
        assert!(config.set_value("no.such.key", "1").is_err());
        assert!(config.get_value("no.such.key").is_err());
        assert_eq!(config, {
            let mut fresh = AppConfig::default();
            fresh.metadata = config.metadata.clone();
            fresh
        });
    }

    #[test]
    fn test_list_covers_every_key() {
        let config = AppConfig::default();
        assert_eq!(config.list_values().len(), CONFIG_KEYS.len());
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = AppConfig::default();
        original.set_value("chart.height", "720").unwrap();
        original.save_to_file(&config_path).unwrap();

        let loaded = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.chart.height, 720);
        assert_eq!(loaded.logging, original.logging);
    }

    #[test]
    fn test_load_or_default() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        let config = AppConfig::load_or_default(Some(&missing)).unwrap();
        assert_eq!(config.display, DisplaySettings::default());

        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "not = [valid").unwrap();
        assert!(AppConfig::load_or_default(Some(&broken)).is_err());
    }
}
