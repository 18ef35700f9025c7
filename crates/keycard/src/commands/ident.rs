//! IDENTIFY: proves possession of the card's identity key without a secure channel

use apdu_macros::apdu_pair;
use rand::RngCore;

use crate::constants::status::*;
use crate::types::Signature;

apdu_pair! {
    /// IDENTIFY command
    pub struct Ident {
        command {
            cla: 0x00,
            ins: 0x14,

            builders {
                /// Build an IDENTIFY command for the given challenge
                pub fn with_challenge(challenge: &[u8; 32]) -> Self {
                    Self::new(0x00, 0x00).with_data(challenge.to_vec()).with_le(0)
                }

                /// Build an IDENTIFY command with a fresh random challenge
                pub fn with_random_challenge() -> Self {
                    let mut rng = rand::rng();
                    let mut challenge = [0u8; 32];
                    rng.fill_bytes(&mut challenge);
                    Self::with_challenge(&challenge)
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success {
                    /// The card's identity public key and its signature over the challenge
                    signature: Signature,
                }
            }

            errors {
                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data")]
                WrongData,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<IdentOk, IdentError> {
                use apdu_core::ApduResponse;

                match response.status() {
                    SW_NO_ERROR => match response.payload() {
                        Some(payload) => Ok(IdentOk::Success {
                            signature: Signature::try_from(payload.as_ref()).map_err(|_| IdentError::WrongData)?,
                        }),
                        None => Err(IdentError::ParseError("no payload data")),
                    },
                    SW_WRONG_DATA => Err(IdentError::WrongData),
                    sw => Err(IdentError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
