//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// A format or speed name that is not part of the closed selector set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSelectorError {
    /// Not one of the four time format names.
    #[error("unknown time format `{0}`")]
    Format(String),
    /// Not one of the speed names.
    #[error("unknown speed `{0}`")]
    Speed(String),
}

/// Failures inside a [`StateStore`](crate::store::StateStore).
///
/// These never reach the user. The store logs them and carries on with
/// defaults or without writing.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The state file exists but could not be read.
    #[error("failed to read state file {path}")]
    Read {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The state file or its directory could not be written.
    #[error("failed to write state file {path}")]
    Write {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The stored record is not a valid state object.
    #[error("stored state is not valid JSON")]
    Malformed(#[from] serde_json::Error),
}
