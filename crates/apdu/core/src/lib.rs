//! Core types and traits for building ISO/IEC 7816-4 APDU command/response pairs
//! and driving them through a transport and processor chain.
//!
//! This crate is transport- and application-agnostic: it knows nothing about
//! PC/SC, GlobalPlatform, or Keycard specifically. Those live in their own
//! crates built on top of the traits defined here ([`command::ApduCommand`],
//! [`transport::CardTransport`], [`processor::CommandProcessor`], [`executor::Executor`]).

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod command;
pub mod error;
pub mod executor;
pub mod processor;
pub mod response;
pub mod transport;

pub use bytes::Bytes;
pub use command::{ApduCommand, Command, CommandError, ExpectedLength};
pub use error::Error;
pub use executor::{CardExecutor, ExecutionError, Executor, ResponseAwareExecutor, SecureChannelExecutor};
pub use processor::{
    BaseSecureChannel, CommandProcessor, IdentityProcessor, ProcessorError, SecureChannel, SecureChannelProvider,
    SecurityLevel,
};
pub use response::{ApduResponse, FromApduResponse, Response, ResponseError, StatusWord};
pub use transport::{CardTransport, TransportError};

/// Convenience result alias using the crate's umbrella [`Error`]
pub type Result<T> = core::result::Result<T, Error>;

/// Re-exports for glob-importing the most commonly used names
pub mod prelude {
    pub use crate::command::{ApduCommand, Command};
    pub use crate::executor::{CardExecutor, Executor};
    pub use crate::processor::{CommandProcessor, SecureChannel, SecureChannelProvider, SecurityLevel};
    pub use crate::response::{ApduResponse, Response, StatusWord};
    pub use crate::transport::CardTransport;
    pub use crate::Error;
}
