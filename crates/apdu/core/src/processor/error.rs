//! Errors produced by [`super::CommandProcessor`] implementations

use crate::response::ResponseError;
use crate::transport::TransportError;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use thiserror::Error;
        use std::string::String;
    } else {
        use alloc::string::String;
        use core::fmt;
    }
}

/// Error produced while a [`super::CommandProcessor`] transforms a command or response
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum ProcessorError {
    /// The underlying transport failed
    #[cfg_attr(feature = "std", error("Transport error: {0}"))]
    Transport(#[cfg_attr(feature = "std", from)] TransportError),

    /// The response could not be parsed
    #[cfg_attr(feature = "std", error("Response error: {0}"))]
    Response(#[cfg_attr(feature = "std", from)] ResponseError),

    /// A secure channel is required but not established
    #[cfg_attr(feature = "std", error("Secure channel required but not established"))]
    SecureChannelRequired,

    /// The response failed a MAC or integrity check
    #[cfg_attr(feature = "std", error("Response failed integrity check"))]
    IntegrityCheckFailed,

    /// A cryptographic operation failed
    #[cfg_attr(feature = "std", error("Cryptographic operation failed: {0}"))]
    Crypto(&'static str),

    /// Generic processor failure, carrying a message
    #[cfg(feature = "std")]
    #[cfg_attr(feature = "std", error("{0}"))]
    Message(String),
}

#[cfg(not(feature = "std"))]
impl fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Response(e) => write!(f, "Response error: {}", e),
            Self::SecureChannelRequired => write!(f, "Secure channel required but not established"),
            Self::IntegrityCheckFailed => write!(f, "Response failed integrity check"),
            Self::Crypto(msg) => write!(f, "Cryptographic operation failed: {}", msg),
        }
    }
}

#[cfg(not(feature = "std"))]
impl From<TransportError> for ProcessorError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

#[cfg(not(feature = "std"))]
impl From<ResponseError> for ProcessorError {
    fn from(e: ResponseError) -> Self {
        Self::Response(e)
    }
}

impl ProcessorError {
    /// Build a generic processor error from a message
    #[cfg(feature = "std")]
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}
