//! GlobalPlatform-level commands

mod select;

pub use select::{SelectCommand, SelectError, SelectOk};
