//! Ledger synchronization
//!
//! A ledger is the generated PHP file that pulls in every installed component
//! of one catalog:
//!
//! ```php
//! <?php // This is the resources/qntm-blocks.php file
//! include_once 'resources/blocks/hero-banner/index.php';
//! include_once 'resources/blocks/faq/index.php';
//! ```
//!
//! Every mutation reads the whole file, transforms its lines and writes it
//! back through a temp file + rename. There is no locking: one operator, one
//! process.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directive statement prefix used for both ledger lines and host registration
const INCLUDE: &str = "include_once";

/// Include-directive file for one catalog.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    /// Project-relative path, as written into the header and the host file
    relative: String,
    host_file: PathBuf,
    entry_point: String,
}

impl Ledger {
    pub fn new(path: PathBuf, relative: String, host_file: PathBuf, entry_point: String) -> Self {
        Self {
            path,
            relative,
            host_file,
            entry_point,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full directive line for a component
    /// Example: `include_once 'resources/blocks/hero-banner/index.php';`
    pub fn directive(&self, component_path: &str) -> String {
        format!("{} {};", INCLUDE, self.quoted(component_path))
    }

    fn quoted(&self, component_path: &str) -> String {
        format!("'{}/{}'", component_path, self.entry_point)
    }

    fn registration(&self) -> String {
        format!("{} '{}';", INCLUDE, self.relative)
    }

    /// Create the ledger if it is missing and make sure the host file includes it.
    ///
    /// Registration is checked every time, so a host file that lost its line
    /// gets it back without duplicating one that is already there.
    pub fn ensure_exists(&self) -> Result<()> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            let header = format!("<?php // This is the {} file\n", self.relative);
            write_atomic(&self.path, &header)?;
            crate::core::output::detail(&format!("created {}", self.relative));
        }

        let host = if self.host_file.exists() {
            read(&self.host_file)?
        } else {
            String::from("<?php\n")
        };
        let registration = self.registration();
        if !host.contains(&registration) {
            write_atomic(&self.host_file, &append_line(&host, &registration))?;
            crate::core::output::detail(&format!(
                "registered {} in {}",
                self.relative,
                self.host_file.display()
            ));
        }
        Ok(())
    }

    /// Append the component's directive unless a line already carries it.
    ///
    /// Returns `true` if the ledger changed.
    pub fn add_directive(&self, component_path: &str) -> Result<bool> {
        let content = read(&self.path)?;
        let directive = self.directive(component_path);
        if content.lines().any(|line| line.contains(&directive)) {
            return Ok(false);
        }
        write_atomic(&self.path, &append_line(&content, &directive))?;
        Ok(true)
    }

    /// Drop every line referencing the component's entry point.
    ///
    /// Returns the number of lines removed. A missing ledger has nothing to
    /// remove.
    pub fn remove_directive(&self, component_path: &str) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let content = read(&self.path)?;
        let needle = self.quoted(component_path);
        let mut removed = 0;
        let kept: Vec<&str> = content
            .lines()
            .filter(|line| {
                let hit = line.contains(&needle);
                if hit {
                    removed += 1;
                }
                !hit
            })
            .collect();
        if removed > 0 {
            write_atomic(&self.path, &rejoin(&kept, &content))?;
        }
        Ok(removed)
    }

    /// Point the component's directive at its new path, leaving other lines alone.
    ///
    /// Stale directives already pointing at `new_path` are dropped, so the
    /// new path ends up referenced once. Returns the number of lines rewritten.
    pub fn rename_directive(&self, old_path: &str, new_path: &str) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let content = read(&self.path)?;
        let needle = self.quoted(old_path);
        if !content.lines().any(|line| line.contains(&needle)) {
            return Ok(0);
        }
        let stale = self.quoted(new_path);
        let old_prefix = format!("'{}/", old_path);
        let new_prefix = format!("'{}/", new_path);
        let mut rewritten = 0;
        let lines: Vec<String> = content
            .lines()
            .filter(|line| !line.contains(&stale))
            .map(|line| {
                if line.contains(&needle) {
                    rewritten += 1;
                    line.replacen(&old_prefix, &new_prefix, 1)
                } else {
                    line.to_string()
                }
            })
            .collect();
        if rewritten > 0 {
            write_atomic(&self.path, &rejoin(&lines, &content))?;
        }
        Ok(rewritten)
    }

    /// Component paths referenced by directives, in ledger order
    pub fn directives(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = read(&self.path)?;
        let suffix = format!("/{}", self.entry_point);
        Ok(content
            .lines()
            .filter_map(|line| {
                let rest = line.trim().strip_prefix(INCLUDE)?.trim_start();
                let quoted = rest.strip_suffix(';')?.trim_end();
                let inner = quoted.strip_prefix('\'')?.strip_suffix('\'')?;
                inner.strip_suffix(&suffix).map(str::to_string)
            })
            .collect())
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Append a line, making sure it starts on a fresh line.
fn append_line(content: &str, line: &str) -> String {
    let mut out = String::with_capacity(content.len() + line.len() + 2);
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(line);
    out.push('\n');
    out
}

/// Join transformed lines, keeping the original's trailing newline.
fn rejoin<S: AsRef<str>>(lines: &[S], original: &str) -> String {
    let mut out = lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<&str>>()
        .join("\n");
    if original.ends_with('\n') && !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Write via temp file + rename so the file is never left half written
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let temp_path = parent.join(format!(
        ".{}.tmp.{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id()
    ));

    let mut temp_file = std::fs::File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
    temp_file
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
    temp_file
        .sync_all()
        .with_context(|| format!("Failed to sync temp file: {}", temp_path.display()))?;
    drop(temp_file);

    std::fs::rename(&temp_path, path).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!("Failed to write {}", path.display())
    })
}
