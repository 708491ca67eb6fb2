//! errors - the failure kinds the slice manager reports northbound

use thiserror::Error;

/// Every failure the core can report.  The display string of a variant is
/// copied verbatim into the northbound reply's `cause` field, so variants
/// carry the full human-readable diagnostic rather than a bare code.
#[derive(Debug, Error)]
pub enum RsmError {
    /// A request field failed to parse or a required field is missing.
    #[error("{0}")]
    InvalidArgument(String),

    /// A slice or UE the request refers to is absent from the inventories.
    #[error("{0}")]
    NotFound(String),

    /// Create collided with an existing slice, or a duplicate UE attach.
    #[error("{0}")]
    AlreadyExists(String),

    /// An enum value outside the set the service model can carry.
    #[error("{0}")]
    NotSupported(String),

    /// The dispatched control message was not acknowledged in time.
    #[error("timeout happens: E2 SBI could not send ACK until timer expired")]
    AckTimeout,

    /// The E2 transport failed to deliver, or returned a negative ACK.
    #[error("{0}")]
    Transport(String),

    /// An inventory write failed, possibly after the RAN was already mutated.
    #[error("{0}")]
    Internal(String),
}

pub type Result<T, E = RsmError> = std::result::Result<T, E>;
