use anyhow::{anyhow, Context, Result};
use jsonc_parser::{parse_to_serde_value, ParseOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::wav::FormatDescriptor;

/// Conversion settings. Signed fields so a negative value in the file is
/// reported as invalid configuration rather than a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_channels")]
    pub channels: i64,

    #[serde(default = "default_sample_width")]
    pub sample_width: i64,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: i64,

    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_channels() -> i64 {
    1
}

fn default_sample_width() -> i64 {
    1 // 8-bit, as written by the LTC encoder
}

fn default_sample_rate() -> i64 {
    48_000
}

fn default_input_path() -> PathBuf {
    PathBuf::from("timecode.raw")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("timecode.wav")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            sample_width: default_sample_width(),
            sample_rate: default_sample_rate(),
            input_path: default_input_path(),
            output_path: default_output_path(),
        }
    }
}

impl Config {
    /// Validated format descriptor for the configured fields.
    pub fn format(&self) -> Result<FormatDescriptor, ConvertError> {
        FormatDescriptor::new(
            positive("channels", self.channels)?,
            positive("sample_width", self.sample_width)?,
            positive("sample_rate", self.sample_rate)?,
        )
    }
}

fn positive(field: &str, value: i64) -> Result<u32, ConvertError> {
    if value <= 0 {
        return Err(ConvertError::invalid(format!(
            "{field} must be greater than zero, got {value}"
        )));
    }
    u32::try_from(value)
        .map_err(|_| ConvertError::invalid(format!("{field} value {value} is out of range")))
}

#[derive(Debug)]
pub struct ConfigManager {
    config: Config,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Loads the per-user config, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_dir = directories::ProjectDirs::from("", "", "pcmwrap")
            .context("Failed to get config directory")?
            .config_dir()
            .to_path_buf();

        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        Self::load_from_dir(&config_dir)
    }

    fn load_from_dir(config_dir: &Path) -> Result<Self> {
        let jsonc_path = config_dir.join("config.jsonc");
        let legacy_path = config_dir.join("config.json");

        let (config_path, config) = if jsonc_path.exists() {
            let config = Self::read_config_from_disk(&jsonc_path)?;
            (jsonc_path, config)
        } else if legacy_path.exists() {
            let config = Self::read_config_from_disk(&legacy_path)?;
            Self::write_config_file(&jsonc_path, &config)?;
            tracing::info!(
                "Migrated legacy config to JSONC: {:?} -> {:?}",
                legacy_path,
                jsonc_path
            );
            (jsonc_path, config)
        } else {
            let default_config = Config::default();
            Self::write_config_file(&jsonc_path, &default_config)?;
            tracing::info!("Created default config at: {:?}", jsonc_path);
            (jsonc_path, default_config)
        };

        tracing::info!("Loaded config from: {:?}", config_path);
        Ok(Self {
            config,
            config_path,
        })
    }

    /// Loads an explicitly named config file, which must already exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::read_config_from_disk(path)?;
        tracing::info!("Loaded config from: {:?}", path);
        Ok(Self {
            config,
            config_path: path.to_path_buf(),
        })
    }

    pub fn get(&self) -> Config {
        self.config.clone()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn read_config_from_disk(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {:?}", path))?;
        Self::parse_config(&content)
    }

    fn write_config_file(path: &Path, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("Failed to write config file at {:?}", path))
    }

    fn parse_config(content: &str) -> Result<Config> {
        let value = parse_to_serde_value(content, &ParseOptions::default())
            .context("Failed to parse config as JSONC")?
            .ok_or_else(|| anyhow!("Config file did not contain a JSON value"))?;
        serde_json::from_value(value).context("Failed to deserialize config")
    }
}
