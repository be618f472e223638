//! Error types for the collection pipeline.

use std::io;

use thiserror::Error;

/// Result type alias for collector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a collection run.
///
/// All variants collapse to exit code 1 in `main`; the display text goes
/// to stderr so stdout stays clean for the collectd exec plugin.
#[derive(Error, Debug)]
pub enum Error {
    /// The connect attempt did not complete within the dial timeout.
    #[error("connect to {addr} timed out")]
    ConnectTimeout { addr: String },

    /// The connect attempt failed outright (refused, unreachable, ...).
    #[error("connect to {addr} failed: {source}")]
    Connect { addr: String, source: io::Error },

    /// Socket I/O failed after the connection was established.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
