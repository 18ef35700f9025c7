//! MUTUALLY AUTHENTICATE: completes the secure channel handshake begun by OPEN SECURE CHANNEL

use apdu_macros::apdu_pair;

use crate::constants::status::*;
use crate::crypto::Cryptogram;
use crate::Challenge;

use super::CLA_GP;

apdu_pair! {
    /// MUTUALLY AUTHENTICATE command
    pub struct MutuallyAuthenticate {
        command {
            cla: CLA_GP,
            ins: 0x11,

            builders {
                /// Build a MUTUALLY AUTHENTICATE command carrying the client cryptogram
                pub fn with_challenge(challenge: &Challenge) -> Self {
                    Self::new(0x00, 0x00).with_data(challenge.to_vec()).with_le(0)
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success {
                    /// The card's cryptogram, verified against the expected value
                    cryptogram: Cryptogram,
                },
            }

            errors {
                /// Previous command was not OPEN SECURE CHANNEL
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: previous command was not OPEN SECURE CHANNEL")]
                ConditionsNotSatisfied,

                /// Client cryptogram verification failed
                #[sw(SW_SECURITY_STATUS_NOT_SATISFIED)]
                #[error("Security status not satisfied: client cryptogram verification failed")]
                SecurityStatusNotSatisfied,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<MutuallyAuthenticateOk, MutuallyAuthenticateError> {
                use apdu_core::ApduResponse;

                match response.status() {
                    SW_NO_ERROR => match response.payload() {
                        Some(payload) if payload.len() == 32 => Ok(MutuallyAuthenticateOk::Success {
                            cryptogram: *Cryptogram::from_slice(payload),
                        }),
                        Some(_) => Err(MutuallyAuthenticateError::ParseError("invalid payload length")),
                        None => Err(MutuallyAuthenticateError::ParseError("no payload")),
                    },
                    SW_CONDITIONS_NOT_SATISFIED => Err(MutuallyAuthenticateError::ConditionsNotSatisfied),
                    SW_SECURITY_STATUS_NOT_SATISFIED => Err(MutuallyAuthenticateError::SecurityStatusNotSatisfied),
                    sw => Err(MutuallyAuthenticateError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
