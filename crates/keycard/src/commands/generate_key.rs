//! GENERATE KEY: has the card generate a fresh random master seed on-card

use apdu_macros::apdu_pair;

use crate::constants::status::*;

use super::CLA_GP;

apdu_pair! {
    /// GENERATE KEY command
    ///
    /// The wire protocol table this crate follows never assigns GENERATE KEY
    /// its own instruction byte; `0xD3` is free of every other assignment in
    /// that table and is used here.
    pub struct GenerateKey {
        command {
            cla: CLA_GP,
            ins: 0xD3,
            required_security_level: SecurityLevel::auth_mac(),

            builders {
                /// Build the GENERATE KEY command
                pub fn create() -> Self {
                    Self::new(0x00, 0x00).with_le(0)
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success {
                    /// SHA-256 hash of the generated seed, identifying this key going forward
                    key_uid: [u8; 32],
                },
            }

            errors {
                #[sw(SW_SECURITY_STATUS_NOT_SATISFIED)]
                #[error("Security status not satisfied: secure channel required")]
                SecurityStatusNotSatisfied,

                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: PIN is not verified")]
                ConditionsNotSatisfied,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<GenerateKeyOk, GenerateKeyError> {
                use apdu_core::ApduResponse;

                match response.status() {
                    SW_NO_ERROR => match response.payload() {
                        Some(payload) => Ok(GenerateKeyOk::Success {
                            key_uid: payload.to_vec().try_into().map_err(|_| GenerateKeyError::ParseError("key UID was not 32 bytes long"))?,
                        }),
                        None => Err(GenerateKeyError::ParseError("no payload in response")),
                    },
                    SW_SECURITY_STATUS_NOT_SATISFIED => Err(GenerateKeyError::SecurityStatusNotSatisfied),
                    SW_CONDITIONS_NOT_SATISFIED => Err(GenerateKeyError::ConditionsNotSatisfied),
                    sw => Err(GenerateKeyError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
