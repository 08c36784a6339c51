use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::schema::{Config, DisplayConfig};
use super::{ensure_parent_dir, get_config_path};
use crate::marksheet::{
    default_bands, CombinedGroup, ExclusionConfig, GradingConfig, MarksheetConfig, SubjectSpec,
};

const HEADER: &str = "\
# Marksheet configuration.
# Every section is optional: absent keys mean grading disabled, no exclusions,
# ranking by total, and every subject out of 100.
";

/// Starter configuration: graded with the default bands, one combined group.
pub fn starter_config() -> Config {
    Config {
        marksheet: MarksheetConfig {
            subjects: vec![
                SubjectSpec {
                    name: "Biology".to_string(),
                    out_of: 50.0,
                },
                SubjectSpec {
                    name: "Chemistry".to_string(),
                    out_of: 50.0,
                },
            ],
            combined: vec![CombinedGroup {
                name: "Sciences".to_string(),
                components: vec!["Biology".to_string(), "Chemistry".to_string()],
                header: None,
                hide_components: true,
            }],
            grading: GradingConfig {
                enabled: true,
                bands: default_bands(),
                ..Default::default()
            },
            exclusion: ExclusionConfig::default(),
            ..Default::default()
        },
        display: DisplayConfig::default(),
    }
}

/// Write the starter config to `path` (or the default config path).
///
/// Refuses to overwrite an existing file unless `force` is set.
/// Returns the path written.
pub fn write_starter_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    write_config(&path, &starter_config())?;
    Ok(path)
}

fn write_config(path: &Path, config: &Config) -> Result<()> {
    ensure_parent_dir(path)?;

    let yaml = serde_saphyr::to_string(config).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .and_then(|_| file.write_all(yaml.as_bytes()))
        .with_context(|| format!("Failed to write config at {}", path.display()))?;
    file.commit().context("Failed to save config")?;

    Ok(())
}
