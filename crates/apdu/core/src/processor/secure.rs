//! Security level negotiation and the secure channel processor interface

use core::cmp::Ordering;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use std::boxed::Box;
    } else {
        use alloc::boxed::Box;
    }
}

use crate::transport::{CardTransport, TransportError};

use super::{CommandProcessor, ProcessorError};

/// The protections a command processor chain currently provides
///
/// Ordered by a weighted sum (authentication=1, MAC=2, encryption=4) so that
/// `a >= b` means "a provides at least everything b provides".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecurityLevel {
    /// The session has authenticated to the card (e.g. MUTUALLY AUTHENTICATE succeeded)
    pub authenticated: bool,
    /// Commands and responses are integrity-protected with a MAC
    pub mac_protection: bool,
    /// Commands and responses are encrypted
    pub encrypted: bool,
}

impl SecurityLevel {
    /// No protection at all
    pub const fn none() -> Self {
        Self {
            authenticated: false,
            mac_protection: false,
            encrypted: false,
        }
    }

    /// MAC protection only
    pub const fn mac_protected() -> Self {
        Self {
            authenticated: false,
            mac_protection: true,
            encrypted: false,
        }
    }

    /// Authenticated and MAC-protected
    pub const fn auth_mac() -> Self {
        Self {
            authenticated: true,
            mac_protection: true,
            encrypted: false,
        }
    }

    /// Authenticated and MAC-protected, data in the clear
    pub const fn authenticated_mac() -> Self {
        Self::auth_mac()
    }

    /// Encrypted and MAC-protected
    pub const fn enc_mac() -> Self {
        Self {
            authenticated: false,
            mac_protection: true,
            encrypted: true,
        }
    }

    /// Encrypted, not necessarily authenticated
    pub const fn encrypted() -> Self {
        Self {
            authenticated: false,
            mac_protection: false,
            encrypted: true,
        }
    }

    /// Authenticated and encrypted, without a separate MAC flag
    pub const fn authenticated_encrypted() -> Self {
        Self {
            authenticated: true,
            mac_protection: false,
            encrypted: true,
        }
    }

    /// Every protection: authenticated, MAC-protected, and encrypted
    pub const fn full() -> Self {
        Self {
            authenticated: true,
            mac_protection: true,
            encrypted: true,
        }
    }

    /// Whether this level provides at least everything `required` asks for
    pub fn satisfies(&self, required: SecurityLevel) -> bool {
        (self.authenticated || !required.authenticated)
            && (self.mac_protection || !required.mac_protection)
            && (self.encrypted || !required.encrypted)
    }

    /// Whether no protection is provided at all
    pub fn is_none(&self) -> bool {
        !self.authenticated && !self.mac_protection && !self.encrypted
    }

    /// Whether the session has authenticated to the card
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether MAC protection is in effect
    pub fn has_mac_protection(&self) -> bool {
        self.mac_protection
    }

    /// Whether encryption is in effect
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    fn weight(&self) -> u8 {
        self.authenticated as u8 + 2 * self.mac_protection as u8 + 4 * self.encrypted as u8
    }

    /// Builder: set the authenticated flag
    pub fn with_authentication(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    /// Builder: set the MAC-protection flag
    pub fn with_mac_protection(mut self, mac_protection: bool) -> Self {
        self.mac_protection = mac_protection;
        self
    }

    /// Builder: set the encryption flag
    pub fn with_encryption(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }
}

impl PartialOrd for SecurityLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SecurityLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight().cmp(&other.weight())
    }
}

/// Produces a [`CommandProcessor`] implementing a secure channel over a transport
///
/// Implemented by each secure-channel protocol (e.g. Keycard's SCP). The
/// resulting boxed processor is pushed onto an executor's processor stack.
pub trait SecureChannelProvider {
    /// Error produced establishing the secure channel
    type Error: Into<ProcessorError> + core::fmt::Debug;

    /// Perform whatever handshake is required and return an active processor
    fn create_secure_channel(
        &self,
        transport: &mut dyn CardTransport<Error = TransportError>,
    ) -> Result<Box<dyn CommandProcessor>, Self::Error>;
}

/// A command processor that is itself a secure channel: it can be closed and reopened
pub trait SecureChannel: CommandProcessor {
    /// Whether the channel handshake has completed
    fn is_established(&self) -> bool;

    /// Tear down the channel, reverting to passthrough behavior
    fn close(&mut self);
}

dyn_clone::clone_trait_object!(SecureChannel);

/// A [`CommandProcessor`]/[`SecureChannel`] that applies no protection at all
///
/// Used as a placeholder before a real secure channel has been opened.
#[derive(Debug, Clone, Default)]
pub struct BaseSecureChannel {
    established: bool,
}

impl BaseSecureChannel {
    /// Construct an unestablished base channel
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommandProcessor for BaseSecureChannel {
    fn process_command(&mut self, command: &crate::command::Command) -> Result<crate::command::Command, ProcessorError> {
        Ok(command.clone())
    }

    fn process_response(&mut self, response: crate::response::Response) -> Result<crate::response::Response, ProcessorError> {
        Ok(response)
    }

    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::none()
    }

    fn is_active(&self) -> bool {
        self.established
    }
}

impl SecureChannel for BaseSecureChannel {
    fn is_established(&self) -> bool {
        self.established
    }

    fn close(&mut self) {
        self.established = false;
    }
}
