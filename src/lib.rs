//! chrony-bridge — HTTP control plane for a chronyd instance.
//!
//! Exposes REST endpoints that inspect and configure a chrony NTP daemon by
//! invoking its `chronyc` control utility and editing its config file. All
//! actual NTP behavior (clock selection, polling, offset computation) lives
//! in the daemon; this crate is the command-execution, output-parsing, and
//! config-editing shim in front of it.

pub mod conf;
pub mod config;
pub mod error;
pub mod http;
pub mod manager;
pub mod parse;
pub mod runner;

pub use conf::ConfEditor;
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use http::{router, serve};
pub use manager::{ChronyManager, ServerOutcome, StatusReport};
pub use parse::sources::{parse_clients, parse_sources, ClientRecord, SourceRecord};
pub use parse::tracking::{parse_activity, parse_tracking};
pub use runner::{ChronycRunner, CommandOutput};
