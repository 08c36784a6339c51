use super::types::{Snapshot, SNAPSHOT_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::Path;

use crate::config::ensure_parent_dir;

/// Load a saved snapshot from a JSON file
///
/// Fails if the file is missing or carries an unsupported version.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot at {}", path.display()))?;

    let snapshot: Snapshot = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load snapshot from {}", path.display()))?;

    if snapshot.version != SNAPSHOT_VERSION {
        anyhow::bail!("Unsupported snapshot version: {}", snapshot.version);
    }

    Ok(snapshot)
}

/// Save a snapshot to a JSON file atomically
///
/// The file is never left half-written. Parent directories are created.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, snapshot).context("Failed to serialize snapshot")?;

    file.commit().context("Failed to save snapshot")?;

    log::debug!("Saved snapshot to {}", path.display());
    Ok(())
}
