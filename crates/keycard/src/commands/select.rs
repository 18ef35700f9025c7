//! SELECT: chooses the Keycard applet by AID and parses its FCI
//!
//! SELECT itself is the generic ISO 7816-4 command already defined in
//! [`apdu_globalplatform`]; only the FCI parsing is Keycard-specific, so this
//! module adds a thin [`ParsedSelectOk`] layer on top instead of a fresh
//! `apdu_pair!`.

use std::fmt;

use iso7816_tlv::ber::{Tag, Tlv};
use k256::PublicKey;

use apdu_globalplatform::commands::select::SelectOk;

use crate::constants::tags;
use crate::types::ApplicationInfo;

/// The two shapes a Keycard applet's FCI can take, depending on whether it has been INIT'd
#[derive(Debug, Clone)]
pub enum ParsedSelectOk {
    /// The applet has been initialized: full application info, including its secure channel key
    ApplicationInfo(ApplicationInfo),
    /// The applet has not been initialized yet. Carries the applet's secure channel public key
    /// when one is available (needed to INIT), or `None` for an applet that has none at all.
    PreInitialized(Option<PublicKey>),
}

impl fmt::Display for ParsedSelectOk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplicationInfo(info) => write!(f, "{info}"),
            Self::PreInitialized(Some(key)) => write!(f, "Pre-initialized (public key: 0x{})", hex::encode(key.to_sec1_bytes())),
            Self::PreInitialized(None) => write!(f, "Pre-initialized (no public key)"),
        }
    }
}

impl TryFrom<SelectOk> for ParsedSelectOk {
    type Error = crate::Error;

    fn try_from(select_ok: SelectOk) -> Result<Self, Self::Error> {
        let SelectOk::Selected { fci } = select_ok;
        let fci = fci.ok_or(Self::Error::InvalidData("SELECT response carried no FCI"))?;
        Self::try_from(fci.as_slice())
    }
}

impl TryFrom<&[u8]> for ParsedSelectOk {
    type Error = crate::Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let (tlv, _) = Tlv::parse(bytes);
        let tlv = tlv.map_err(crate::Error::from)?;

        if tlv.tag() == &Tag::try_from(tags::TEMPLATE_APPLICATION_INFO)? {
            return Ok(Self::ApplicationInfo(ApplicationInfo::try_from(&tlv)?));
        }

        if tlv.tag() == &Tag::try_from(tags::ECC_PUBLIC_KEY)? {
            let key_bytes = match tlv.value() {
                iso7816_tlv::ber::Value::Primitive(data) => data.clone(),
                _ => return Err(Self::Error::InvalidData("expected primitive TLV for pre-initialized public key")),
            };
            return Ok(Self::PreInitialized(match key_bytes.len() {
                0 => None,
                65 => Some(PublicKey::from_sec1_bytes(&key_bytes)?),
                _ => return Err(Self::Error::InvalidData("invalid public key length in FCI")),
            }));
        }

        Err(Self::Error::InvalidData("unrecognized FCI tag in SELECT response"))
    }
}
