//! Pre-merge working-tree backup.
//!
//! A merge can rewrite history in ways that are painful to undo by
//! hand, so the collaboration loop copies the whole working tree to a
//! timestamped sibling directory first. The `.git` directory and any
//! prior backup directories are left out of the copy.

use anyhow::{anyhow, Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Marker in backup directory names, also used to exclude prior
/// backups from later copies.
const BACKUP_INFIX: &str = "-backup-";

/// Copy the working tree at `workdir` to a fresh timestamped sibling
/// directory and return its path.
pub fn create_backup(workdir: &Path) -> Result<PathBuf> {
    let workdir = workdir
        .canonicalize()
        .with_context(|| format!("Cannot resolve '{}'", workdir.display()))?;

    let name = workdir
        .file_name()
        .ok_or_else(|| anyhow!("Cannot back up '{}': no directory name", workdir.display()))?
        .to_string_lossy()
        .to_string();
    let parent = workdir
        .parent()
        .ok_or_else(|| anyhow!("Cannot back up '{}': no parent directory", workdir.display()))?;

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let mut dest = parent.join(format!("{name}{BACKUP_INFIX}{stamp}"));
    let mut counter = 1;
    while dest.exists() {
        counter += 1;
        dest = parent.join(format!("{name}{BACKUP_INFIX}{stamp}-{counter}"));
    }

    for entry in WalkDir::new(&workdir)
        .into_iter()
        .filter_entry(|e| !is_excluded(e))
    {
        let entry = entry.context("Failed to walk the working tree")?;
        let rel = entry
            .path()
            .strip_prefix(&workdir)
            .context("Walked entry outside the working tree")?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create '{}'", target.display()))?;
        } else if entry.file_type().is_file() {
            if let Some(dir) = target.parent() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create '{}'", dir.display()))?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy '{}' to '{}'",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
        // symlinks and other special files are skipped
    }

    info!("working tree backed up to {}", dest.display());
    Ok(dest)
}

fn is_excluded(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == ".git" || name.contains(BACKUP_INFIX)
}
