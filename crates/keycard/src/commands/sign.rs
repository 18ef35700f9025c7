//! SIGN: produces an ECDSA signature over caller-supplied data with a derived or pinless key

use bytes::{Bytes, BytesMut};
use apdu_macros::apdu_pair;

use crate::constants::status::*;
use crate::path::{p1, prepare_derivation_parameters, DeriveMode, KeyPath};
use crate::types::Signature;

use super::CLA_GP;

apdu_pair! {
    /// SIGN command (P1 variant; P2 is always `0x01`)
    pub struct Sign {
        command {
            cla: CLA_GP,
            ins: 0xC8,
            required_security_level: SecurityLevel::encrypted(),

            builders {
                /// Build a SIGN command over a 32-byte hash, deriving to `key_path` first
                pub fn with(data: &[u8; 32], key_path: &KeyPath, derive_mode: Option<DeriveMode>) -> Result<Self, crate::Error> {
                    let (p1, path_data) = prepare_derivation_parameters(key_path, derive_mode)?;

                    let buf = match path_data {
                        Some(path_data) => {
                            let mut buf = BytesMut::with_capacity(data.len() + path_data.len());
                            buf.extend_from_slice(data);
                            buf.extend_from_slice(&path_data);
                            buf.freeze()
                        }
                        None => Bytes::copy_from_slice(data.as_slice()),
                    };

                    Ok(Self::new(p1, 0x01).with_data(buf).with_le(0))
                }

                /// Build a SIGN command using the card's configured pinless path
                pub fn with_pinless(data: &[u8; 32]) -> Self {
                    Self::new(p1::PINLESS, 0x01).with_data(Bytes::copy_from_slice(data.as_slice())).with_le(0)
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success {
                    /// The signing public key and the raw ECDSA signature
                    signature: Signature,
                },
            }

            errors {
                /// Requires secure channel and verified PIN
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: requires secure channel and verified PIN")]
                ConditionsNotSatisfied,

                /// Data was not exactly 32 bytes
                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data: incorrect length for P1")]
                WrongData,

                /// Pinless path not set
                #[sw(SW_REFERENCED_DATA_NOT_FOUND)]
                #[error("Referenced data not found: pinless path not set")]
                ReferencedDataNotFound,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<SignOk, SignError> {
                use apdu_core::ApduResponse;

                match response.status() {
                    SW_NO_ERROR => match response.payload() {
                        Some(payload) => Ok(SignOk::Success {
                            signature: Signature::try_from(payload.as_ref()).map_err(|_| SignError::WrongData)?,
                        }),
                        None => Err(SignError::ParseError("no payload data")),
                    },
                    SW_CONDITIONS_NOT_SATISFIED => Err(SignError::ConditionsNotSatisfied),
                    SW_WRONG_DATA => Err(SignError::WrongData),
                    SW_REFERENCED_DATA_NOT_FOUND => Err(SignError::ReferencedDataNotFound),
                    sw => Err(SignError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
