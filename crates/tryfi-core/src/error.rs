use thiserror::Error;

use crate::client::ClientError;

/// Failures surfaced to the host by entity actions.
///
/// Reads never produce these; only lost-mode writes and entity lookups do.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("invalid option {0:?}, expected \"Safe\" or \"Lost\"")]
    InvalidOption(String),
    #[error("pet {0} is not present in the current snapshot")]
    PetUnavailable(String),
    #[error("entity {0} does not accept options")]
    NotSelectable(String),
    #[error("no entity registered as {0}")]
    UnknownEntity(String),
    #[error("upstream rejected the change: {0}")]
    Upstream(#[from] ClientError),
}
