//! Top-level error type aggregating every layer of the crate

use crate::command::CommandError;
use crate::executor::ExecutionError;
use crate::processor::ProcessorError;
use crate::response::{ResponseError, StatusWord};
use crate::transport::TransportError;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use thiserror::Error;
    } else {
        use core::fmt;
    }
}

/// Umbrella error type returned across transport, processor, and execution layers
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum Error {
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

    /// A full command execution failed
    #[cfg_attr(feature = "std", error("Execution error: {0}"))]
    Execution(#[cfg_attr(feature = "std", from)] ExecutionError),

    /// The card returned a status word the caller treated as an error
    #[cfg_attr(feature = "std", error("Card returned status word {0}"))]
    Status(StatusWord),
}

#[cfg(not(feature = "std"))]
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Response(e) => write!(f, "Response error: {}", e),
            Self::Command(e) => write!(f, "Command error: {}", e),
            Self::Processor(e) => write!(f, "Processor error: {}", e),
            Self::Execution(e) => write!(f, "Execution error: {}", e),
            Self::Status(sw) => write!(f, "Card returned status word {}", sw),
        }
    }
}

impl Error {
    /// The status word carried by this error, if any
    pub fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status(sw) => Some(*sw),
            Self::Response(ResponseError::Status(sw)) => Some(*sw),
            Self::Execution(e) => e.status_word(),
            _ => None,
        }
    }
}
