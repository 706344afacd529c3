//! ChronyManager — composes the runner, the report parsers, and the conf
//! editor into the operations the HTTP surface exposes.

use std::collections::HashMap;

use serde::Serialize;

use crate::conf::ConfEditor;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::parse::sources::{parse_clients, parse_sources, ClientRecord, SourceRecord};
use crate::parse::tracking::{parse_activity, parse_tracking};
use crate::runner::{ChronycRunner, CommandOutput};

/// Per-server outcome of a replace-servers workflow.
#[derive(Debug, Clone, Serialize)]
pub struct ServerOutcome {
    pub server: String,
    pub output: String,
    pub error: Option<String>,
}

/// Aggregated daemon status snapshot.
///
/// Each section is fetched independently; a failing `tracking` query does not
/// prevent `sources` from being reported, and vice versa. Every field is
/// always present, with errors surfaced next to the (then empty) data.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub server_mode_enabled: bool,
    pub tracking: HashMap<String, String>,
    pub tracking_error: Option<String>,
    pub sources: Vec<SourceRecord>,
    pub sources_error: Option<String>,
    pub activity: HashMap<String, String>,
    pub activity_error: Option<String>,
    pub clients: Vec<ClientRecord>,
    pub clients_error: Option<String>,
}

/// Orchestrates chronyc invocations and conf edits for the HTTP handlers.
pub struct ChronyManager {
    runner: ChronycRunner,
    conf: ConfEditor,
    default_servers: Vec<String>,
}

impl ChronyManager {
    /// Build a manager from validated bridge configuration.
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            runner: ChronycRunner::new(config.chronyc_command.clone()),
            conf: ConfEditor::new(config.conf_path.clone()),
            default_servers: config.default_servers.clone(),
        }
    }

    /// The conf editor, for the server-mode endpoints.
    pub fn conf(&self) -> &ConfEditor {
        &self.conf
    }

    /// Raw `sources` report, unparsed.
    pub async fn list_sources(&self) -> CommandOutput {
        self.runner.run(&["sources"]).await
    }

    /// Delete every configured source.
    pub async fn delete_sources(&self) -> CommandOutput {
        self.runner.run(&["delete", "sources"]).await
    }

    /// The control utility's own version string.
    pub async fn version(&self) -> CommandOutput {
        self.runner.run(&["--version"]).await
    }

    /// Replace all configured sources with `servers`, in order.
    ///
    /// Rejects an empty list before any process is spawned. Otherwise runs
    /// delete-then-add and reports every per-server outcome; a failed add
    /// does not stop later adds and nothing is rolled back.
    pub async fn replace_servers(&self, servers: &[String]) -> crate::Result<Vec<ServerOutcome>> {
        if servers.is_empty() {
            return Err(BridgeError::EmptyServerList);
        }
        Ok(self.apply_server_set(servers).await)
    }

    /// Replace all configured sources with the configured default list.
    ///
    /// Same workflow as `replace_servers`; the default list is non-empty by
    /// construction (config validation), so no input check is needed.
    pub async fn restore_defaults(&self) -> Vec<ServerOutcome> {
        self.apply_server_set(&self.default_servers).await
    }

    async fn apply_server_set(&self, servers: &[String]) -> Vec<ServerOutcome> {
        // Deleting an already-empty source list fails harmlessly on some
        // daemon versions, so the result is not inspected.
        let _ = self.delete_sources().await;

        let mut outcomes = Vec::with_capacity(servers.len());
        for server in servers {
            let result = self.runner.run(&["add", "server", server]).await;
            if !result.succeeded {
                tracing::warn!(server = %server, error = %result.stderr, "failed to add source");
            }
            outcomes.push(ServerOutcome {
                server: server.clone(),
                error: result.error(),
                output: result.stdout,
            });
        }
        outcomes
    }

    /// Collect the consolidated status snapshot.
    ///
    /// Runs the directive read plus the `tracking`, `sources`, `activity`,
    /// and `clients` queries independently. Each report is parsed only when
    /// its stdout is non-empty; otherwise the field stays empty while the
    /// error text is still surfaced.
    pub async fn status(&self) -> StatusReport {
        let server_mode_enabled = self.conf.server_mode_enabled().await;

        let tracking_out = self.runner.run(&["tracking"]).await;
        let tracking = if tracking_out.stdout.is_empty() {
            HashMap::new()
        } else {
            parse_tracking(&tracking_out.stdout)
        };

        let sources_out = self.runner.run(&["sources"]).await;
        let sources = if sources_out.stdout.is_empty() {
            Vec::new()
        } else {
            parse_sources(&sources_out.stdout)
        };

        let activity_out = self.runner.run(&["activity"]).await;
        let activity = if activity_out.stdout.is_empty() {
            HashMap::new()
        } else {
            parse_activity(&activity_out.stdout)
        };

        let clients_out = self.runner.run(&["clients"]).await;
        let clients = if clients_out.stdout.is_empty() {
            Vec::new()
        } else {
            parse_clients(&clients_out.stdout)
        };

        StatusReport {
            server_mode_enabled,
            tracking,
            tracking_error: tracking_out.error(),
            sources,
            sources_error: sources_out.error(),
            activity,
            activity_error: activity_out.error(),
            clients,
            clients_error: clients_out.error(),
        }
    }
}
