//! OPEN SECURE CHANNEL: seeds session key derivation with a fresh card challenge

use apdu_macros::apdu_pair;
use k256::elliptic_curve::sec1::ToEncodedPoint;

apdu_pair! {
    /// OPEN SECURE CHANNEL command
    pub struct OpenSecureChannel {
        command {
            cla: 0x00,
            ins: 0x10,
            required_security_level: SecurityLevel::none(),

            builders {
                /// Open a channel against the pairing at `pairing_index`, offering the host's ephemeral public key
                pub fn with_pairing_index_and_pubkey(pairing_index: u8, public_key: &k256::PublicKey) -> Self {
                    Self::new(pairing_index, 0x00)
                        .with_data(public_key.to_encoded_point(false).to_bytes())
                        .with_le(0)
                }
            }
        }

        response {
            ok {
                /// Card challenge and IV seed, input to session key derivation
                #[sw(SW_NO_ERROR)]
                Success {
                    challenge: crate::crypto::Challenge,
                    iv: cipher::Iv<crate::crypto::KeycardScp>,
                }
            }

            errors {
                #[sw(0x6A, 0x86)]
                #[error("Incorrect P1/P2 (unknown pairing index)")]
                IncorrectP1P2,

                #[sw(0x6A, 0x80)]
                #[error("Wrong data")]
                WrongData,

                #[sw(0x69, 0x82)]
                #[error("Security status not satisfied")]
                SecurityStatusNotSatisfied,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<OpenSecureChannelOk, OpenSecureChannelError> {
                use apdu_core::ApduResponse;
                use crate::constants::status::*;

                match response.status() {
                    SW_NO_ERROR => {
                        let payload = response.payload().ok_or(OpenSecureChannelError::ParseError("empty response"))?;
                        if payload.len() != 48 {
                            return Err(OpenSecureChannelError::ParseError("expected 48-byte challenge||iv payload"));
                        }
                        let challenge = crate::crypto::Challenge::clone_from_slice(&payload[..32]);
                        let iv = cipher::Iv::<crate::crypto::KeycardScp>::clone_from_slice(&payload[32..48]);
                        Ok(OpenSecureChannelOk::Success { challenge, iv })
                    }
                    SW_INCORRECT_P1P2 => Err(OpenSecureChannelError::IncorrectP1P2),
                    SW_WRONG_DATA => Err(OpenSecureChannelError::WrongData),
                    SW_SECURITY_STATUS_NOT_SATISFIED => Err(OpenSecureChannelError::SecurityStatusNotSatisfied),
                    sw => Err(OpenSecureChannelError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
