//! Typed representations of the card's TLV-encoded response payloads

mod application_info;
mod application_status;
mod capabilities;
mod exported_key;
mod keypair;
mod pairing_info;
mod signature;
mod version;

pub use application_info::ApplicationInfo;
pub use application_status::ApplicationStatus;
pub use capabilities::{Capabilities, Capability};
pub use exported_key::ExportedKey;
use iso7816_tlv::ber::{Tag, Tlv, Value};
pub use keypair::Keypair;
pub use pairing_info::PairingInfo;
pub use signature::{EcdsaSignature, PublicKey, Signature};
pub use version::Version;

use crate::Error;

pub(crate) fn get_primitive_value(tag: &Tag, tlv: &Tlv) -> Result<Vec<u8>, Error> {
    if tag != tlv.tag() {
        return Err(Error::InvalidData("Invalid tag"));
    }
    match tlv.value() {
        Value::Primitive(bytes) => Ok(bytes.to_vec()),
        _ => Err(Error::InvalidData("Invalid value type")),
    }
}

/// Filter `tlvs` down to the siblings whose tag appears in `known_tags`, preserving order.
///
/// This is how composite-tag parsers (SELECT's application info, GET STATUS's
/// application status, ...) tolerate unknown sibling tags the applet might add in a
/// future version: an unrecognized child is simply dropped instead of shifting every
/// positional field that follows it out of alignment.
pub(crate) fn known_siblings<'a>(tlvs: &'a [Tlv], known_tags: &[u8]) -> Result<Vec<&'a Tlv>, Error> {
    let known_tags: Vec<Tag> = known_tags.iter().map(|&t| Tag::try_from(t)).collect::<Result<_, _>>()?;
    Ok(tlvs.iter().filter(|tlv| known_tags.contains(tlv.tag())).collect())
}
