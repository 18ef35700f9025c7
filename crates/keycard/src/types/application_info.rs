use std::fmt;

use iso7816_tlv::ber::{Tag, Tlv, Value};

use crate::constants::tags;

use super::{get_primitive_value, known_siblings, signature::PublicKey, Capabilities, Version};

/// Application info returned by SELECT
#[derive(Debug, Clone)]
pub struct ApplicationInfo {
    /// Instance UID (16 bytes)
    pub instance_uid: [u8; 16],
    /// Secure channel ECC public key (65 bytes, or absent)
    pub public_key: Option<k256::PublicKey>,
    /// Applet version
    pub version: Version,
    /// Remaining pairing slots
    pub remaining_slots: u8,
    /// SHA-256 of the master public key, or `None` if no key is loaded
    pub key_uid: Option<[u8; 32]>,
    /// Supported capabilities
    pub capabilities: Capabilities,
}

impl TryFrom<&Tlv> for ApplicationInfo {
    type Error = crate::Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        if tlv.tag() != &Tag::try_from(tags::TEMPLATE_APPLICATION_INFO)? {
            return Err(Self::Error::InvalidData("TLV tag was not application info template tag"));
        }

        match tlv.value() {
            Value::Constructed(tlvs) => {
                // Two siblings share the generic `OTHER` tag (version, remaining slots); order
                // among same-tagged siblings is preserved by `known_siblings`, so positional
                // indexing within the filtered list is still correct. Capabilities is the only
                // optional child — older applet versions omit it entirely.
                let known = known_siblings(tlvs, &[tags::INSTANCE_UID, tags::ECC_PUBLIC_KEY, tags::OTHER, tags::KEY_UID, tags::CAPABILITIES])?;
                if known.len() < 5 {
                    return Err(Self::Error::InvalidData("application info template missing required fields"));
                }

                let instance_uid: [u8; 16] = get_primitive_value(&Tag::try_from(tags::INSTANCE_UID)?, known[0])?
                    .try_into()
                    .map_err(|_| Self::Error::InvalidData("invalid instance UID length"))?;
                let public_key = PublicKey::try_from(known[1])?;
                let version = Version::try_from(known[2])?;
                let remaining_slots = get_primitive_value(&Tag::try_from(tags::OTHER)?, known[3])?[0];
                let key_uid: Option<[u8; 32]> = {
                    let raw_key_uid = get_primitive_value(&Tag::try_from(tags::KEY_UID)?, known[4])?;
                    match raw_key_uid.len() {
                        32 => Some(raw_key_uid.try_into().map_err(|_| Self::Error::InvalidData("invalid key UID length"))?),
                        0 => None,
                        _ => return Err(Self::Error::InvalidData("Invalid key UID length")),
                    }
                };
                let capabilities = match known.get(5) {
                    Some(tlv) => Capabilities::try_from(*tlv)?,
                    None => Capabilities::new(&[
                        crate::types::Capability::SecureChannel,
                        crate::types::Capability::KeyManagement,
                        crate::types::Capability::CredentialsManagement,
                    ]),
                };

                Ok(Self {
                    instance_uid,
                    public_key: (*public_key).clone(),
                    version,
                    remaining_slots,
                    key_uid,
                    capabilities,
                })
            }
            _ => Err(Self::Error::InvalidData("TLV value was not constructed")),
        }
    }
}

impl fmt::Display for ApplicationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Application Info:")?;
        writeln!(f, "  Instance UID: {}", hex::encode(self.instance_uid))?;

        writeln!(f, "  Version: {}", self.version)?;
        writeln!(f, "  Remaining pairing slots: {}", self.remaining_slots)?;

        if let Some(ref key_uid) = self.key_uid {
            writeln!(f, "  Key UID: 0x{}", hex::encode(key_uid))?;
        } else {
            writeln!(f, "  Key UID: None (Use GENERATE KEY)")?;
        }

        writeln!(f, "  Capabilities: {}", self.capabilities)?;

        write!(f, "  Secure channel public key: ")?;
        if let Some(ref public_key) = self.public_key {
            write!(f, "0x{}", hex::encode(public_key.to_sec1_bytes()))
        } else {
            write!(f, "None")
        }
    }
}
