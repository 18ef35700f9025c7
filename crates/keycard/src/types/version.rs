use derive_more::{Display, From, Into};
use iso7816_tlv::ber::{Tag, Tlv, Value};

use crate::constants::tags;

/// Applet version, `major.minor`
#[derive(Debug, Clone, Copy, PartialEq, Display, From, Into)]
#[display("{}.{}", major, minor)]
pub struct Version {
    /// Major version component
    pub major: u8,
    /// Minor version component
    pub minor: u8,
}

impl TryFrom<&Tlv> for Version {
    type Error = crate::Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        if tlv.tag() != &Tag::try_from(tags::OTHER)? {
            return Err(Self::Error::InvalidData("Invalid tag"));
        }

        let (major, minor) = match tlv.value() {
            Value::Primitive(bytes) => (bytes[0], bytes[1]),
            _ => return Err(Self::Error::InvalidData("Invalid value")),
        };

        Ok(Self { major, minor })
    }
}
