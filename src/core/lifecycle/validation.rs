//! Component name validation
//!
//! Names become directory names and ledger path segments, so they are kept to
//! simple identifiers. This also rules out path traversal like `../../wp-admin`.

use crate::core::error::SetupError;
use std::path::Path;

/// Trim and check a component name.
pub fn validate_component_name(raw: &str) -> Result<String, SetupError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SetupError::EmptyName);
    }
    if name.starts_with('.')
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(SetupError::InvalidName(name.to_string()));
    }
    Ok(name.to_string())
}

/// Check a rename before anything on disk changes.
///
/// Renaming onto an existing directory is refused rather than merged or
/// overwritten.
pub fn validate_rename(old: &str, raw_new: &str, target_dir: &Path) -> Result<String, SetupError> {
    let new = validate_component_name(raw_new)?;
    if new == old {
        return Err(SetupError::SameName(new));
    }
    let dest = target_dir.join(&new);
    if dest.exists() {
        return Err(SetupError::RenameCollision { name: new, path: dest });
    }
    Ok(new)
}
