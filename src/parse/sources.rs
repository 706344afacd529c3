//! Parsers for chronyc's tabular reports (`sources` and `clients`).
//!
//! Both reports share the same shape: a human-readable preamble, a separator
//! line of `=` characters, then whitespace-aligned data rows. Everything
//! before and including the separator is discarded; rows are split on
//! whitespace runs and extracted best-effort, with the full trimmed line kept
//! in `raw` for display.

use serde::Serialize;

/// One upstream time source from a `sources` report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    /// Best-effort source name: the second column (the first is a one/two
    /// character state-flag symbol).
    pub name: String,
    /// The full trimmed row, preserved for operators and debugging.
    pub raw: String,
}

/// One NTP client from a `clients` report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    /// First column: the client's address or hostname.
    pub address: String,
    /// The full trimmed row.
    pub raw: String,
}

/// Parse a `sources` report into records, preserving the report's row order.
///
/// Rows with fewer than two whitespace-separated tokens are skipped. If the
/// `=` separator never appears the report carries no data rows and the result
/// is empty, which is not an error.
pub fn parse_sources(report: &str) -> Vec<SourceRecord> {
    data_rows(report)
        .filter_map(|row| {
            let mut tokens = row.split_whitespace();
            let _state = tokens.next()?;
            let name = tokens.next()?;
            Some(SourceRecord {
                name: name.to_string(),
                raw: row.to_string(),
            })
        })
        .collect()
}

/// Parse a `clients` report into records, preserving the report's row order.
///
/// Same separator discipline as `parse_sources`; a row needs at least two
/// tokens to count as a client entry.
pub fn parse_clients(report: &str) -> Vec<ClientRecord> {
    data_rows(report)
        .filter_map(|row| {
            let mut tokens = row.split_whitespace();
            let address = tokens.next()?;
            tokens.next()?;
            Some(ClientRecord {
                address: address.to_string(),
                raw: row.to_string(),
            })
        })
        .collect()
}

/// Iterate the trimmed data rows of a tabular report.
///
/// Skips every line up to and including the first whose trimmed form starts
/// with `=`, then skips blank lines and any repeated separator lines.
fn data_rows(report: &str) -> impl Iterator<Item = &str> {
    let mut header_found = false;
    report.lines().filter_map(move |line| {
        let trimmed = line.trim();
        if !header_found {
            if trimmed.starts_with('=') {
                header_found = true;
            }
            return None;
        }
        if trimmed.is_empty() || trimmed.starts_with('=') {
            return None;
        }
        Some(trimmed)
    })
}
