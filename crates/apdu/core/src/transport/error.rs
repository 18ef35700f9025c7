//! Errors produced by [`super::CardTransport`] implementations

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use thiserror::Error;
        use std::string::String;
    } else {
        use alloc::string::String;
        use core::fmt;
    }
}

/// Error transmitting a command or reading a response over a physical or logical transport
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum TransportError {
    /// No card is present in the reader
    #[cfg_attr(feature = "std", error("No card present"))]
    NoCardPresent,

    /// The connection to the card or reader was lost
    #[cfg_attr(feature = "std", error("Connection lost"))]
    ConnectionLost,

    /// The transport does not support the requested operation
    #[cfg_attr(feature = "std", error("Transport does not support this operation"))]
    Unsupported,

    /// The underlying transport timed out
    #[cfg_attr(feature = "std", error("Transport timed out"))]
    Timeout,

    /// Generic transport-level failure, carrying a message
    #[cfg(feature = "std")]
    #[cfg_attr(feature = "std", error("Transport error: {0}"))]
    Message(String),
}

#[cfg(not(feature = "std"))]
impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCardPresent => write!(f, "No card present"),
            Self::ConnectionLost => write!(f, "Connection lost"),
            Self::Unsupported => write!(f, "Transport does not support this operation"),
            Self::Timeout => write!(f, "Transport timed out"),
        }
    }
}

impl TransportError {
    /// Build a generic transport error from a message
    #[cfg(feature = "std")]
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}
