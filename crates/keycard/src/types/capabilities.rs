use std::fmt;

use iso7816_tlv::ber::{Tlv, Value};

/// A single capability flag advertised by the card's applet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Capability {
    /// Secure channel (pairing, OPEN SECURE CHANNEL, MUTUALLY AUTHENTICATE)
    SecureChannel = 0x01,
    /// Key management (GENERATE/LOAD/DERIVE/REMOVE KEY, SIGN, EXPORT KEY)
    KeyManagement = 0x02,
    /// Credentials management (VERIFY/CHANGE/UNBLOCK PIN, pairing password change)
    CredentialsManagement = 0x04,
    /// NDEF applet support
    Ndef = 0x08,
}

/// Bitmask of the [`Capability`] flags a card's applet advertises
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capabilities(u8);

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut capabilities = Vec::new();
        if self.has_capability(Capability::SecureChannel) {
            capabilities.push("Secure Channel");
        }
        if self.has_capability(Capability::KeyManagement) {
            capabilities.push("Key Management");
        }
        if self.has_capability(Capability::CredentialsManagement) {
            capabilities.push("Credentials Management");
        }
        if self.has_capability(Capability::Ndef) {
            capabilities.push("NDEF");
        }
        write!(f, "{}", capabilities.join(", "))
    }
}

impl Capabilities {
    /// Build a capability set from a list of flags
    pub fn new(capabilities: &[Capability]) -> Self {
        Self(capabilities.iter().fold(0, |flags, &cap| flags | cap as u8))
    }

    /// An empty capability set, supporting nothing
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether `capability` is present in this set
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.0 & capability as u8 != 0
    }

    /// Return an error naming the missing capability if it is not present
    pub fn require_capability(&self, capability: Capability) -> crate::Result<()> {
        if !self.has_capability(capability) {
            let error_message = match capability {
                Capability::SecureChannel => "This card does not support the secure channel protocol",
                Capability::KeyManagement => "This card does not support key management operations",
                Capability::CredentialsManagement => "This card does not support credentials management operations",
                Capability::Ndef => "This card does not support NDEF operations",
            };
            Err(crate::Error::CapabilityNotSupported(error_message))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<&Tlv> for Capabilities {
    type Error = crate::Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        match tlv.value() {
            Value::Primitive(data) => Ok(data[0].into()),
            _ => Err(Self::Error::InvalidData("Invalid TLV for Capabilities")),
        }
    }
}

impl From<u8> for Capabilities {
    fn from(value: u8) -> Self {
        Self(value)
    }
}
