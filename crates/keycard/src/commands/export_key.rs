//! EXPORT KEY: reveals key material for the current or a derived path

use apdu_macros::apdu_pair;

use crate::constants::status::*;
use crate::path::{prepare_derivation_parameters, DeriveMode, KeyPath};
use crate::types::Keypair;

use super::CLA_GP;

/// What EXPORT KEY should reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportOption {
    /// Private key, plus the public key when the card includes it
    PrivateAndPublic = 0x00,
    /// Public key only
    PublicKeyOnly = 0x01,
    /// Public key plus chain code (an extended public key)
    ExtendedPublicKey = 0x02,
}

apdu_pair! {
    /// EXPORT KEY command
    pub struct ExportKey {
        command {
            cla: CLA_GP,
            ins: 0xC2,
            required_security_level: SecurityLevel::full(),

            builders {
                /// Export the card's current key without deriving
                pub fn from_current(what: ExportOption) -> Result<Self, crate::Error> {
                    Self::with(what, &KeyPath::Current, None)
                }

                /// Export a key derived from the master key
                pub fn from_master(what: ExportOption, key_path: &KeyPath, make_current: bool) -> Result<Self, crate::Error> {
                    Self::with(what, key_path, Some(derive_mode(make_current)))
                }

                /// Export a key derived relative to the current key's parent
                pub fn from_parent(what: ExportOption, key_path: &KeyPath, make_current: bool) -> Result<Self, crate::Error> {
                    Self::with(what, key_path, Some(derive_mode(make_current)))
                }

                /// Export a key derived relative to the current key
                pub fn from_current_with_derivation(what: ExportOption, key_path: &KeyPath, make_current: bool) -> Result<Self, crate::Error> {
                    Self::with(what, key_path, Some(derive_mode(make_current)))
                }

                /// General-purpose builder; prefer the specific helpers above
                pub fn with(what: ExportOption, key_path: &KeyPath, derive_mode: Option<DeriveMode>) -> Result<Self, crate::Error> {
                    let (p1, path_data) = prepare_derivation_parameters(key_path, derive_mode)?;
                    let command = Self::new(p1, what as u8).with_le(0);
                    Ok(match path_data {
                        Some(path_data) => command.with_data(path_data),
                        None => command,
                    })
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success {
                    /// The exported keypair, shaped according to the requested [`ExportOption`]
                    keypair: Keypair,
                }
            }

            errors {
                /// Secure channel and a verified PIN are both required
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: requires secure channel and verified PIN")]
                ConditionsNotSatisfied,

                #[sw(SW_INCORRECT_P1P2)]
                #[error("Incorrect P1/P2: invalid export option")]
                IncorrectP1P2,

                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data: invalid derivation path format")]
                WrongData,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<ExportKeyOk, ExportKeyError> {
                use apdu_core::ApduResponse;

                match response.status() {
                    SW_NO_ERROR => match response.payload() {
                        Some(payload) => Ok(ExportKeyOk::Success {
                            keypair: Keypair::try_from(payload.as_ref()).map_err(|_| ExportKeyError::WrongData)?,
                        }),
                        None => Err(ExportKeyError::WrongData),
                    },
                    SW_CONDITIONS_NOT_SATISFIED => Err(ExportKeyError::ConditionsNotSatisfied),
                    SW_INCORRECT_P1P2 => Err(ExportKeyError::IncorrectP1P2),
                    SW_WRONG_DATA => Err(ExportKeyError::WrongData),
                    sw => Err(ExportKeyError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}

const fn derive_mode(make_current: bool) -> DeriveMode {
    if make_current {
        DeriveMode::Persistent
    } else {
        DeriveMode::Temporary
    }
}
