// Runtime configuration
//
// Layers, lowest to highest precedence:
//   1. built-in defaults
//   2. TOML file (explicit --config path, else the platform config dir)
//   3. DISK_CLEANER_* environment variables

use crate::ui::progress::DEFAULT_BAR_WIDTH;
use crate::{CleanerError, CleanerResult};
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "DISK_CLEANER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Directory that receives the overwrite scratch files
    pub scratch_dir: PathBuf,
    pub bar_width: usize,
    /// Multiplier applied to every inter-pass delay; 0 disables the delays
    pub delay_scale: f64,
    /// Upper bound on scratch file size, in MiB
    pub max_scratch_mb: Option<u64>,
    /// Let command stdout/stderr through instead of discarding it
    pub show_command_output: bool,
    /// Path whose filesystem is checked for free space
    pub space_probe_path: PathBuf,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            bar_width: DEFAULT_BAR_WIDTH,
            delay_scale: 1.0,
            max_scratch_mb: None,
            show_command_output: false,
            space_probe_path: PathBuf::from("/"),
        }
    }
}

impl CleanerConfig {
    /// `~/.config/disk-cleaner/config.toml` on Linux
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "disk-cleaner").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the layered configuration.
    ///
    /// An explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> CleanerResult<Self> {
        let mut builder = Config::builder();

        match explicit {
            Some(path) => {
                let file = File::from(path).format(FileFormat::Toml);
                builder = builder.add_source(file.required(true));
            }
            None => {
                if let Some(path) = Self::default_config_path() {
                    tracing::debug!(path = %path.display(), "Looking for config file");
                    let file = File::from(path.as_path()).format(FileFormat::Toml);
                    builder = builder.add_source(file.required(false));
                }
            }
        }

        let config: CleanerConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CleanerResult<()> {
        if self.bar_width == 0 {
            return Err(CleanerError::Configuration(
                "bar_width must be at least 1".to_string(),
            ));
        }
        if !self.delay_scale.is_finite() || self.delay_scale < 0.0 {
            return Err(CleanerError::Configuration(format!(
                "delay_scale must be a non-negative number, got {}",
                self.delay_scale
            )));
        }
        if self.max_scratch_mb == Some(0) {
            return Err(CleanerError::Configuration(
                "max_scratch_mb must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
