//! Client library for the Keycard secure element: ISO 7816-4 APDU commands,
//! the Keycard Secure Channel Protocol (SCP), and a typed command-set API
//! covering pairing, PIN/PUK management, key management, and signing.
//!
//! Talking to a card starts with [`commands::ParsedSelectOk`] (via SELECT),
//! then either [`commands::InitCommand`] for a factory-fresh card or
//! [`session::Session::open`] plus [`secure_channel::KeycardSecureChannelProvider`]
//! for an already-initialized one. [`application::Keycard`] wraps the whole
//! flow behind one typed client.

mod application;
pub mod commands;
pub mod constants;
mod crypto;
mod error;
pub mod path;
mod secrets;
mod secure_channel;
mod session;
pub mod types;
mod validation;

pub use application::Keycard;
pub use commands::*;
pub use constants::{CASHCARD_AID, KEYCARD_AID};
pub use crypto::Challenge;
pub use error::{CoreResultExt, Error, GpResultExt, Result, ResultExt};
pub use secrets::Secrets;
pub use secure_channel::{KeycardSecureChannel, KeycardSecureChannelProvider};
pub use session::Session;
pub use types::{ApplicationInfo, ApplicationStatus, Capabilities, Capability, ExportedKey, Keypair, PairingInfo, Signature, Version};
pub use validation::{validate_and_decode_hex, validate_pairing_index, validate_pin, validate_puk, ValidationError};

/// The applet generation in use, which determines INIT's wire format and a
/// handful of capability defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppletVersion {
    /// Versions before 3.1: PIN, PUK, and pairing password only
    Legacy,
    /// Version 3.1 and above: adds configurable attempt limits and a duress PIN
    V3_1,
}

/// Build the AID for Keycard applet instance `index` (`index >= 1`).
///
/// Multiple instances of the applet can coexist on one card, each selected by
/// appending its one-byte index to the base [`KEYCARD_AID`].
pub fn keycard_instance_aid(index: u8) -> Vec<u8> {
    assert!(index >= 1, "instance index must be at least 1");
    let mut aid = Vec::from(KEYCARD_AID);
    aid.push(index);
    aid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycard_instance_aid() {
        let aid = keycard_instance_aid(1);
        assert_eq!(aid.len(), KEYCARD_AID.len() + 1);
        assert_eq!(aid.last(), Some(&1));
    }

    #[test]
    #[should_panic(expected = "instance index must be at least 1")]
    fn test_keycard_instance_aid_rejects_zero() {
        keycard_instance_aid(0);
    }
}
