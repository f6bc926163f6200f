//! Recursive component copy

use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

/// Copy a component directory tree from the mirror into the target path.
///
/// Parent directories are created as needed and existing files are
/// overwritten. Returns the number of files copied.
pub fn copy_component(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        anyhow::bail!("Component source is not a directory: {}", src.display());
    }
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry =
            entry.with_context(|| format!("Failed to walk component: {}", src.display()))?;
        let rel_path = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("Failed to strip prefix from: {}", entry.path().display()))?;
        let target = dest.join(rel_path);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy {} to {}", entry.path().display(), target.display())
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}
