//! Mirror cleanup
//!
//! Setup hooks can ask for the downloaded catalog to be thrown away once a
//! component is installed. The operator has the last word.

use crate::core::output;
use crate::core::prompt::Prompter;
use anyhow::{Context, Result};
use std::path::Path;

/// Offer to delete a catalog mirror if the setup hook asked for it.
///
/// Returns `true` if the mirror was deleted. Does nothing, without
/// prompting, when `signal` is false.
pub fn maybe_clean_mirror(prompter: &mut dyn Prompter, mirror: &Path, signal: bool) -> Result<bool> {
    if !signal {
        return Ok(false);
    }
    let yes = prompter
        .confirm("Install complete. Do you want to clean up the temporary folder?")?;
    if !yes {
        output::skip("keeping catalog mirror");
        return Ok(false);
    }
    remove_tree(mirror)?;
    output::success(&format!("removed {}", mirror.display()));
    Ok(true)
}

/// Delete every catalog mirror. A missing mirror root is not an error.
pub fn clean_all(mirror_root: &Path) -> Result<bool> {
    let removed = remove_tree(mirror_root)?;
    if removed {
        output::success("Cleaned up repository cache");
    } else {
        output::skip("repository cache already clean");
    }
    Ok(removed)
}

fn remove_tree(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(path)
        .with_context(|| format!("Failed to remove {}", path.display()))?;
    Ok(true)
}
