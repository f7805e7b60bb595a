//! Crate-level error types.

use thiserror::Error;

use crate::loader::LoadKind;

/// Failures of the bundle loading pipeline.
///
/// Every variant is recoverable: the action that triggered the load reports
/// it as a status message and becomes available again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The collaborator endpoint answered with a zero-length payload.
    #[error("empty response from model service")]
    EmptyResponse,
    /// The archive could not be opened or holds no geometry entry.
    #[error("invalid model archive: {0}")]
    ArchiveFormat(String),
    /// The geometry or material text could not be parsed.
    #[error("failed to load model asset: {0}")]
    AssetLoad(String),
    /// The collaborator answered with a JSON error body. Message verbatim.
    #[error("{0}")]
    Remote(String),
    /// The request never produced a response (connection, DNS, I/O).
    #[error("request failed: {0}")]
    Transport(String),
}

/// Errors produced by the atomlens crate outside the load pipeline.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// A load of this kind is already in flight.
    #[error("a {0} load is already in progress")]
    Busy(LoadKind),
    /// The atom detail view was requested with no atom selected.
    #[error("no atom selected")]
    NoSelection,
    /// An empty formula was submitted.
    #[error("formula is empty")]
    EmptyFormula,
    /// Load pipeline failure.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Generic I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to spawn the background load thread.
    #[error("failed to spawn thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),
    /// TOML options parsing/serialization failure.
    #[error("options parse error: {0}")]
    OptionsParse(String),
}
