//! Parsers for chronyc's free-form text reports.
//!
//! The output format of the control utility is not versioned, so every parser
//! here is permissive: unparseable lines are skipped, never fatal, and absence
//! of data is valid output.

pub mod sources;
pub mod tracking;
