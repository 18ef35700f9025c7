use std::fmt;

use iso7816_tlv::ber::{Tag, Tlv, Value};

use crate::constants::tags;

use super::{get_primitive_value, known_siblings};

/// Application status returned by GET STATUS P1=0x00
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationStatus {
    /// PIN retries remaining
    pub pin_retry_count: u8,
    /// PUK retries remaining
    pub puk_retry_count: u8,
    /// Whether a key has been loaded/generated on the card
    pub key_initialized: bool,
}

impl TryFrom<Tlv> for ApplicationStatus {
    type Error = crate::Error;

    fn try_from(tlv: Tlv) -> Result<Self, Self::Error> {
        if tlv.tag() != &Tag::try_from(tags::TEMPLATE_APPLICATION_STATUS)? {
            return Err(Self::Error::InvalidData("TLV tag was not application status template tag"));
        }

        match tlv.value() {
            Value::Primitive(_) => Err(Self::Error::InvalidData("TLV value was not constructed")),
            Value::Constructed(tlvs) => {
                let known = known_siblings(tlvs, &[tags::OTHER, tags::KEY_INITIALIZED])?;
                if known.len() < 3 {
                    return Err(Self::Error::InvalidData("application status template missing required fields"));
                }
                Ok(Self {
                    pin_retry_count: get_primitive_value(&Tag::try_from(tags::OTHER)?, known[0])?[0],
                    puk_retry_count: get_primitive_value(&Tag::try_from(tags::OTHER)?, known[1])?[0],
                    key_initialized: get_primitive_value(&Tag::try_from(tags::KEY_INITIALIZED)?, known[2])?[0] == 0xFF,
                })
            }
        }
    }
}

impl TryFrom<&[u8]> for ApplicationStatus {
    type Error = crate::Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let (tlv, _) = Tlv::parse(bytes);
        Self::try_from(tlv?)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Application Status:")?;
        writeln!(f, "  PIN retries remaining: {}", self.pin_retry_count)?;
        writeln!(f, "  PUK retries remaining: {}", self.puk_retry_count)?;
        write!(f, "  Key initialized: {}", self.key_initialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitive(tag: u8, data: &[u8]) -> Tlv {
        Tlv::new(Tag::try_from(tag).unwrap(), Value::Primitive(data.to_vec())).unwrap()
    }

    fn template(children: Vec<Tlv>) -> Tlv {
        Tlv::new(Tag::try_from(tags::TEMPLATE_APPLICATION_STATUS).unwrap(), Value::Constructed(children)).unwrap()
    }

    #[test]
    fn test_parse_application_status() {
        let tlv = template(vec![primitive(tags::OTHER, &[3]), primitive(tags::OTHER, &[5]), primitive(tags::KEY_INITIALIZED, &[0xFF])]);
        let status = ApplicationStatus::try_from(tlv).unwrap();
        assert_eq!(status.pin_retry_count, 3);
        assert_eq!(status.puk_retry_count, 5);
        assert!(status.key_initialized);
    }

    #[test]
    fn test_parse_tolerates_unknown_sibling_tags() {
        // An unrecognized sibling (e.g. a future applet field) interleaved between the
        // known fields must not shift pin/puk/key_initialized out of position.
        let with_unknown = template(vec![
            primitive(tags::OTHER, &[3]),
            primitive(0x99, b"future field"),
            primitive(tags::OTHER, &[5]),
            primitive(0x9A, b"another future field"),
            primitive(tags::KEY_INITIALIZED, &[0xFF]),
        ]);
        let without_unknown = template(vec![primitive(tags::OTHER, &[3]), primitive(tags::OTHER, &[5]), primitive(tags::KEY_INITIALIZED, &[0xFF])]);

        assert_eq!(ApplicationStatus::try_from(with_unknown).unwrap(), ApplicationStatus::try_from(without_unknown).unwrap());
    }

    #[test]
    fn test_parse_key_not_initialized() {
        let tlv = template(vec![primitive(tags::OTHER, &[0]), primitive(tags::OTHER, &[0]), primitive(tags::KEY_INITIALIZED, &[0x00])]);
        assert!(!ApplicationStatus::try_from(tlv).unwrap().key_initialized);
    }
}
