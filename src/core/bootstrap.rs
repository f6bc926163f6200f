//! One-time project bootstrap
//!
//! Keeps dependency caches, editor settings and the catalog mirrors out of
//! the host project's version control.

use crate::core::catalog::Project;
use crate::core::output;
use anyhow::{Context, Result};

/// Ignore-list entries the host project must carry
pub fn ignore_entries(project: &Project) -> [String; 3] {
    [
        "node_modules".to_string(),
        ".vscode".to_string(),
        project.mirror_root.trim_end_matches('/').to_string(),
    ]
}

/// Create the ignore file if needed and append any missing entry.
///
/// Returns the entries that were added.
pub fn ensure_ignore_list(project: &Project) -> Result<Vec<String>> {
    let path = project.resolve(&project.ignore_file);
    let mut content = if path.exists() {
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        output::detail(&format!("created {}", project.ignore_file));
        String::new()
    };

    let mut added = Vec::new();
    for entry in ignore_entries(project) {
        if content.contains(&entry) {
            continue;
        }
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&entry);
        content.push('\n');
        output::detail(&format!("added \"{}\" to {}", entry, project.ignore_file));
        added.push(entry);
    }

    if !added.is_empty() || !path.exists() {
        std::fs::write(&path, &content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(added)
}
