//! PAIR: establishes a long-lived pairing (and its derived pairing key) with the card

use apdu_macros::apdu_pair;

use crate::constants::status::*;
use crate::crypto::{Challenge, Cryptogram};

apdu_pair! {
    /// PAIR command
    pub struct Pair {
        command {
            cla: 0x00,
            ins: 0x12,

            builders {
                /// Build the first-stage PAIR command, carrying the client challenge
                pub fn with_first_stage(challenge: &Challenge) -> Self {
                    Self::new(0x00, 0x00).with_data(challenge.to_vec())
                }

                /// Build the final-stage PAIR command, carrying the client cryptogram hash
                pub fn with_final_stage(cryptogram_hash: &Cryptogram) -> Self {
                    Self::new(0x01, 0x00).with_data(cryptogram_hash.to_vec())
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                FirstStageSuccess {
                    /// The card's cryptogram, verified against the expected value
                    cryptogram: Cryptogram,
                    /// The card's challenge, used to derive the final-stage cryptogram
                    challenge: Challenge,
                },

                #[sw(SW_NO_ERROR)]
                FinalStageSuccess {
                    /// The pairing slot index assigned to this pairing
                    pairing_index: u8,
                    /// Salt used to derive this pairing's long-lived pairing key
                    salt: Challenge,
                }
            }

            errors {
                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data")]
                WrongData,

                /// Client cryptogram verification failed
                #[sw(SW_SECURITY_STATUS_NOT_SATISFIED)]
                #[error("Security status not satisfied: client cryptogram verification failed")]
                SecurityStatusNotSatisfied,

                /// All available pairing slots are taken
                #[sw(SW_FILE_FULL)]
                #[error("File full: all available pairing slots are taken")]
                FileFull,

                /// P1 is invalid, or is 0x01 but the first stage was never completed
                #[sw(SW_INCORRECT_P1P2)]
                #[error("Incorrect P1/P2: P1 is invalid or the first stage was not completed")]
                IncorrectP1P2,

                /// A secure channel is already open
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: secure channel is open")]
                ConditionsNotSatisfied,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<PairOk, PairError> {
                use apdu_core::ApduResponse;

                match response.status() {
                    SW_NO_ERROR => {
                        if let Some(payload) = response.payload() {
                            match payload.len() {
                                64 => {
                                    let cryptogram = Cryptogram::from_slice(&payload[..32]);
                                    let challenge = Challenge::from_slice(&payload[32..]);
                                    return Ok(PairOk::FirstStageSuccess { cryptogram: *cryptogram, challenge: *challenge });
                                }
                                33 => {
                                    let pairing_index = payload[0];
                                    let salt = Challenge::from_slice(&payload[1..]);
                                    return Ok(PairOk::FinalStageSuccess { pairing_index, salt: *salt });
                                }
                                _ => {}
                            }
                        }

                        Err(PairError::ParseError("invalid payload length"))
                    }
                    SW_SECURITY_STATUS_NOT_SATISFIED => Err(PairError::SecurityStatusNotSatisfied),
                    SW_FILE_FULL => Err(PairError::FileFull),
                    SW_INCORRECT_P1P2 => Err(PairError::IncorrectP1P2),
                    SW_CONDITIONS_NOT_SATISFIED => Err(PairError::ConditionsNotSatisfied),
                    sw => Err(PairError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
