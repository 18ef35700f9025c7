//! Errors related to parsing and interpreting APDU responses

use cfg_if::cfg_if;

use super::status::StatusWord;

cfg_if! {
    if #[cfg(feature = "std")] {
        use thiserror::Error;
        use std::string::String;
    } else {
        use alloc::string::String;
        use core::fmt;
    }
}

/// Error parsing or interpreting a response
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum ResponseError {
    /// Response is shorter than the minimum two status bytes
    #[cfg_attr(feature = "std", error("Response too short to contain a status word"))]
    Incomplete,

    /// Response carried a status word that the caller did not expect
    #[cfg_attr(feature = "std", error("Unexpected status word: {0}"))]
    Status(StatusWord),

    /// Payload could not be parsed into the requested type
    #[cfg_attr(feature = "std", error("Failed to parse response payload: {0}"))]
    Parse(&'static str),

    /// Generic error with a message
    #[cfg(feature = "std")]
    #[cfg_attr(feature = "std", error("{0}"))]
    Message(String),
}

#[cfg(not(feature = "std"))]
impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete => write!(f, "Response too short to contain a status word"),
            Self::Status(sw) => write!(f, "Unexpected status word: {}", sw),
            Self::Parse(msg) => write!(f, "Failed to parse response payload: {}", msg),
        }
    }
}

impl ResponseError {
    /// Build a status error from raw SW1/SW2 bytes
    pub const fn status(sw1: u8, sw2: u8) -> Self {
        Self::Status(StatusWord::new(sw1, sw2))
    }

    /// Status word carried by this error, if any
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status(sw) => Some(*sw),
            _ => None,
        }
    }
}

/// Error interpreting a raw status word outside of a typed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Error))]
#[cfg_attr(feature = "std", error("Card returned error status word: {0}"))]
pub struct StatusError(StatusWord);

impl StatusError {
    /// Create a new status error
    pub const fn new(sw: StatusWord) -> Self {
        Self(sw)
    }

    /// The status word carried by this error
    pub const fn status_word(&self) -> StatusWord {
        self.0
    }
}
