//! Component setup hooks
//!
//! A component may ship a setup script (`init.js` by default) that runs once
//! after install. The script can ask for the catalog mirror to be cleaned up
//! in two ways:
//!
//! - print the marker token (`cleanup`) on stdout, or
//! - write the marker as a line of the file named by `$QNTM_SIGNAL_FILE`.
//!
//! Stdout scanning is kept for existing hooks. It is a plain substring match
//! against everything the script prints, so a log line that happens to
//! contain the token also counts. New hooks should use the signal file.
//!
//! The runner never answers before the process has exited and both of its
//! output streams are drained.

use crate::core::catalog::ComponentLayout;
use crate::core::error::SetupError;
use crate::core::output;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::io::AsyncReadExt;

/// Environment variable pointing a hook at its signal file
pub const SIGNAL_FILE_ENV: &str = "QNTM_SIGNAL_FILE";

fn runtime() -> &'static tokio::runtime::Runtime {
    static RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RT.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_io()
            .build()
            .expect("failed to build tokio runtime for setup hooks")
    })
}

/// Finds a marker in a byte stream that arrives in arbitrary chunks.
#[derive(Debug, Clone)]
pub struct MarkerScanner {
    marker: Vec<u8>,
    /// Last `marker.len() - 1` bytes seen, to catch a marker split across chunks
    tail: Vec<u8>,
    seen: bool,
}

impl MarkerScanner {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.as_bytes().to_vec(),
            tail: Vec::new(),
            seen: false,
        }
    }

    /// Feed the next chunk. Returns whether the marker has been seen so far.
    pub fn feed(&mut self, chunk: &[u8]) -> bool {
        if self.seen || self.marker.is_empty() {
            return self.seen;
        }

        let mut window = std::mem::take(&mut self.tail);
        window.extend_from_slice(chunk);
        if window.windows(self.marker.len()).any(|w| w == self.marker.as_slice()) {
            self.seen = true;
            return true;
        }

        let keep = self.marker.len() - 1;
        let start = window.len().saturating_sub(keep);
        self.tail = window.split_off(start);
        false
    }

    pub fn seen(&self) -> bool {
        self.seen
    }
}

/// Runs a component's setup hook and reports whether it asked for cleanup.
#[derive(Debug, Clone)]
pub struct SetupHookRunner {
    hook_file: String,
    interpreter: String,
    marker: String,
}

impl SetupHookRunner {
    pub fn new(layout: &ComponentLayout) -> Self {
        Self {
            hook_file: layout.setup_hook.clone(),
            interpreter: layout.interpreter.clone(),
            marker: layout.cleanup_marker.clone(),
        }
    }

    pub fn hook_path(&self, component_dir: &Path) -> PathBuf {
        component_dir.join(&self.hook_file)
    }

    pub fn has_hook(&self, component_dir: &Path) -> bool {
        self.hook_path(component_dir).is_file()
    }

    /// Run the hook in `component_dir`, blocking until it has exited.
    ///
    /// Returns `false` without spawning anything when the component has no
    /// hook. A non-zero exit is reported but is not an error.
    pub fn run(&self, component_dir: &Path) -> Result<bool> {
        if !self.has_hook(component_dir) {
            output::skip(&format!("{} does not exist, skipping setup", self.hook_file));
            return Ok(false);
        }
        output::sub_action(&format!("setup ({} {})", self.interpreter, self.hook_file));
        runtime().block_on(self.run_async(component_dir))
    }

    async fn run_async(&self, component_dir: &Path) -> Result<bool> {
        let signal_dir = tempfile::tempdir().context("Failed to create signal directory")?;
        let signal_file = signal_dir.path().join("signal");

        let mut cmd = tokio::process::Command::new(&self.interpreter);
        cmd.arg(&self.hook_file)
            .current_dir(component_dir)
            .env(SIGNAL_FILE_ENV, &signal_file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| SetupError::HookSpawn {
            path: self.hook_path(component_dir),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to open setup hook stdout")?;
        let stderr = child
            .stderr
            .take()
            .context("Failed to open setup hook stderr")?;

        let stdout_task = tokio::spawn(scan_stdout(
            stdout,
            self.hook_file.clone(),
            MarkerScanner::new(&self.marker),
        ));
        let stderr_task = tokio::spawn(forward_stderr(stderr, self.hook_file.clone()));

        let status = child
            .wait()
            .await
            .context("Failed waiting for setup hook")?;

        // Readers finish at EOF, which can trail the exit event.
        let marker_seen = stdout_task
            .await
            .context("Failed joining setup hook stdout reader")??;
        stderr_task
            .await
            .context("Failed joining setup hook stderr reader")??;

        match status.code() {
            Some(code) => output::detail(&format!("{} exited with code {}", self.hook_file, code)),
            None => output::detail(&format!("{} was terminated by a signal", self.hook_file)),
        }
        if !status.success() {
            output::warning(&format!("{} did not exit cleanly", self.hook_file));
        }

        let file_requested = read_signal_file(&signal_file, &self.marker)?;
        Ok(marker_seen || file_requested)
    }
}

async fn scan_stdout(
    mut reader: tokio::process::ChildStdout,
    label: String,
    mut scanner: MarkerScanner,
) -> Result<bool> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader
            .read(&mut chunk)
            .await
            .context("Failed to read setup hook stdout")?;
        if n == 0 {
            break;
        }
        output::hook_stdout(&label, &String::from_utf8_lossy(&chunk[..n]));
        scanner.feed(&chunk[..n]);
    }
    Ok(scanner.seen())
}

async fn forward_stderr(mut reader: tokio::process::ChildStderr, label: String) -> Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader
            .read(&mut chunk)
            .await
            .context("Failed to read setup hook stderr")?;
        if n == 0 {
            return Ok(());
        }
        output::hook_stderr(&label, &String::from_utf8_lossy(&chunk[..n]));
    }
}

/// Whether the hook left a signal file with the marker on a line of its own
fn read_signal_file(path: &Path, marker: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read signal file: {}", path.display()))?;
    Ok(content.lines().any(|line| line.trim() == marker))
}
