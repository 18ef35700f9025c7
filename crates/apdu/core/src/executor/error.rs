//! Errors produced by [`super::Executor`] implementations

use crate::command::CommandError;
use crate::processor::ProcessorError;
use crate::response::{ResponseError, StatusWord};
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

/// Error executing a command end-to-end: transport, chain of processors, and parsing
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum ExecutionError {
    /// The underlying transport failed
    #[cfg_attr(feature = "std", error("Transport error: {0}"))]
    Transport(#[cfg_attr(feature = "std", from)] TransportError),

    /// The response could not be parsed
    #[cfg_attr(feature = "std", error("Response error: {0}"))]
    Response(#[cfg_attr(feature = "std", from)] ResponseError),

    /// The command could not be serialized or parsed
    #[cfg_attr(feature = "std", error("Command error: {0}"))]
    Command(#[cfg_attr(feature = "std", from)] CommandError),

    /// A processor in the chain failed
    #[cfg_attr(feature = "std", error("Processor error: {0}"))]
    Processor(#[cfg_attr(feature = "std", from)] ProcessorError),

    /// The card returned a status word the caller treated as an error
    #[cfg_attr(feature = "std", error("Card returned status word {0}"))]
    Status(StatusWord),

    /// A secure channel is required for this command but none is established
    #[cfg_attr(feature = "std", error("Secure channel required but not established"))]
    SecureChannelRequired,

    /// A processor chain invariant was violated
    #[cfg_attr(feature = "std", error("Processor chain error: {0}"))]
    Chain(&'static str),

    /// The response did not have the shape the caller expected
    #[cfg_attr(feature = "std", error("Invalid response format"))]
    InvalidResponseFormat,

    /// A command-specific failure with a static description
    #[cfg_attr(feature = "std", error("{0}"))]
    CommandSpecific(&'static str),

    /// The operation was cancelled before completion
    #[cfg_attr(feature = "std", error("Operation cancelled"))]
    Cancelled,

    /// The operation timed out
    #[cfg_attr(feature = "std", error("Operation timed out"))]
    Timeout,

    /// Generic failure, carrying a message
    #[cfg(feature = "std")]
    #[cfg_attr(feature = "std", error("{0}"))]
    Other(String),
}

#[cfg(not(feature = "std"))]
impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Response(e) => write!(f, "Response error: {}", e),
            Self::Command(e) => write!(f, "Command error: {}", e),
            Self::Processor(e) => write!(f, "Processor error: {}", e),
            Self::Status(sw) => write!(f, "Card returned status word {}", sw),
            Self::SecureChannelRequired => write!(f, "Secure channel required but not established"),
            Self::Chain(msg) => write!(f, "Processor chain error: {}", msg),
            Self::InvalidResponseFormat => write!(f, "Invalid response format"),
            Self::CommandSpecific(msg) => write!(f, "{}", msg),
            Self::Cancelled => write!(f, "Operation cancelled"),
            Self::Timeout => write!(f, "Operation timed out"),
        }
    }
}

impl ExecutionError {
    /// Build a command-specific error from a static description
    pub const fn command_error(msg: &'static str) -> Self {
        Self::CommandSpecific(msg)
    }

    /// Build a processor chain error from a static description
    pub const fn chain_error(msg: &'static str) -> Self {
        Self::Chain(msg)
    }

    /// Whether this error carries the given status word
    pub fn has_status(&self, sw: StatusWord) -> bool {
        self.status_word() == Some(sw)
    }

    /// The status word carried by this error, if any
    pub fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status(sw) => Some(*sw),
            Self::Response(ResponseError::Status(sw)) => Some(*sw),
            _ => None,
        }
    }

    /// Whether this error carries the given raw SW1/SW2 pair
    pub fn has_status_code(&self, sw1: u8, sw2: u8) -> bool {
        self.has_status(StatusWord::new(sw1, sw2))
    }

    /// Build a generic error from a message
    #[cfg(feature = "std")]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
