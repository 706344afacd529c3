//! chrony.conf directive editing — full-file read-modify-write of the
//! `allow` directive.
//!
//! The conf file is the single persisted state this crate touches. Every read
//! recomputes the directive state from disk; every write rewrites the whole
//! file, keeping all unrelated lines byte-for-byte in their original order.
//! I/O failures are swallowed into boolean results: callers treat `false` as
//! "state unknown/unchanged" and never get a reason. There is no lock around
//! the read-modify-write, so concurrent writers race and the later full
//! rewrite wins; accepted and documented rather than fixed.

use std::path::{Path, PathBuf};

/// The directive line appended when enabling server mode on a file that has
/// no `allow` line. Allow-all is the only policy applied in that case.
const DEFAULT_ALLOW_LINE: &str = "allow 0.0.0.0/0";

/// Reads and toggles the `allow` directive in the daemon's config file.
#[derive(Debug, Clone)]
pub struct ConfEditor {
    path: PathBuf,
}

impl ConfEditor {
    /// Create an editor for the given conf file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The conf file path this editor operates on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff any line of the conf file starts (after trimming) with the
    /// `allow` directive. An unreadable file reads as disabled, not as an
    /// error.
    pub async fn server_mode_enabled(&self) -> bool {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content
                .lines()
                .any(|line| line.trim().starts_with("allow")),
            Err(e) => {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "conf file unreadable, reporting server mode disabled"
                );
                false
            }
        }
    }

    /// Rewrite the conf file so the `allow` directive matches `enabled`.
    ///
    /// Disabling drops every `allow` line; enabling keeps existing ones
    /// unchanged, or appends `allow 0.0.0.0/0` when none exist. All other
    /// lines are copied through with their original terminators. Returns
    /// `false` on any read or write failure. Idempotent.
    pub async fn set_server_mode(&self, enabled: bool) -> bool {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to read conf file for directive update"
                );
                return false;
            }
        };

        let mut found = false;
        let mut new_content = String::with_capacity(content.len() + DEFAULT_ALLOW_LINE.len() + 1);
        // split_inclusive keeps each line's terminator, so kept lines are
        // written back byte-for-byte.
        for line in content.split_inclusive('\n') {
            if line.trim().starts_with("allow") {
                found = true;
                if enabled {
                    new_content.push_str(line);
                }
            } else {
                new_content.push_str(line);
            }
        }

        if enabled && !found {
            if !new_content.is_empty() && !new_content.ends_with('\n') {
                new_content.push('\n');
            }
            new_content.push_str(DEFAULT_ALLOW_LINE);
            new_content.push('\n');
        }

        match tokio::fs::write(&self.path, &new_content).await {
            Ok(()) => {
                tracing::info!(
                    path = %self.path.display(),
                    enabled = enabled,
                    "server mode directive updated"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to write conf file for directive update"
                );
                false
            }
        }
    }
}
