mod init;
mod schema;

pub use init::write_starter_config;
pub use schema::{Config, DisplayConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::marksheet::validate_marksheet;

/// Get the config directory path (~/.config/marksheet/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("marksheet"))
}

/// Get the default config file path (~/.config/marksheet/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Ensure the directory holding `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/marksheet/config.yaml), falling back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                log::debug!(
                    "No config at {}, using defaults",
                    default_path.display()
                );
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    log::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// Validate the whole config file: engine settings plus display settings.
/// Returns all validation errors at once.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = match validate_marksheet(&config.marksheet) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.into_iter().map(|e| format!("marksheet.{}", e)).collect(),
    };

    if let Some(target) = config.display.rescale_total {
        if target.is_nan() || target <= 0.0 {
            errors.push(format!("display.rescale_total: must be positive, got {}", target));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
