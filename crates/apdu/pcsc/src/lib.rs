//! [`apdu_core::CardTransport`] backed by a PC/SC reader connection
//!
//! This crate only establishes and drives a connection to a reader already
//! known to the PC/SC resource manager. Discovering readers as they are
//! plugged or unplugged, and any policy around which reader to prefer, is
//! left to the caller.

mod config;
mod error;
mod reader;
mod transport;

pub use config::{PcscConfig, ShareMode};
pub use error::PcscError;
pub use reader::{establish_context, list_readers};
pub use transport::PcscTransport;

pub use pcsc::Context;
