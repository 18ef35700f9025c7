//! GlobalPlatform SELECT command and the status-word vocabulary that applet
//! protocols built on top of `apdu-core` (such as Keycard) share.
//!
//! This crate deliberately does not implement the rest of the GlobalPlatform
//! card-management suite (INSTALL, LOAD, DELETE, PUT KEY, or its own Secure
//! Channel Protocol) — Keycard only ever needs to SELECT an applet before
//! negotiating its own secure channel.

pub mod commands;
pub mod constants;
pub mod error;

pub use commands::{SelectCommand, SelectError, SelectOk};
pub use error::{Error, Result};
