//! DERIVE KEY: changes the card's current BIP32 key path without exporting anything

use bytes::Bytes;
use apdu_macros::apdu_pair;

use crate::constants::status::*;
use crate::path::{prepare_derivation_parameters, DeriveMode, KeyPath};

use super::CLA_GP;

apdu_pair! {
    /// DERIVE KEY command
    pub struct DeriveKey {
        command {
            cla: CLA_GP,
            ins: 0xD5,
            required_security_level: SecurityLevel::mac_protected(),

            builders {
                /// Derive `key_path`, optionally making it the card's new current path
                pub fn with(key_path: &KeyPath, derive_mode: Option<DeriveMode>) -> Result<Self, crate::Error> {
                    let (p1, data) = prepare_derivation_parameters(key_path, derive_mode)?;
                    let command = Self::new(p1, 0x00);
                    Ok(match data {
                        Some(data) => command.with_data(Bytes::from(data)),
                        None => command,
                    })
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success
            }

            errors {
                /// Previous derivation's source path isn't available for relative derivation
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied")]
                ConditionsNotSatisfied,

                /// Invalid derivation sequence (e.g. parent-relative derivation with no current path)
                #[sw(SW_WRONG_P1P2)]
                #[error("Wrong P1/P2: invalid derivation sequence")]
                WrongP1P2,

                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data: derivation sequence is invalid")]
                WrongData,
            }
        }
    }
}
