//! Error type for this crate

use thiserror::Error;

/// Errors that can occur while selecting an applet or parsing its response
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A lower-level APDU error occurred
    #[error(transparent)]
    Core(#[from] apdu_core::Error),

    /// A response or command error occurred
    #[error(transparent)]
    Response(#[from] apdu_core::ResponseError),

    /// A TLV structure could not be parsed
    #[error("TLV parse error: {0}")]
    Tlv(String),

    /// Generic failure with a message
    #[error("{0}")]
    Message(String),
}

/// Convenience result alias
pub type Result<T> = core::result::Result<T, Error>;
