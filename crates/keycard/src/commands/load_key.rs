//! LOAD KEY: installs caller-supplied key material instead of generating it on-card

use bytes::Bytes;
use apdu_macros::apdu_pair;
use k256::{PublicKey, SecretKey};

use crate::constants::status::*;
use crate::types::Keypair;

use super::CLA_GP;

apdu_pair! {
    /// LOAD KEY command
    pub struct LoadKey {
        command {
            cla: CLA_GP,
            ins: 0xD4,
            required_security_level: SecurityLevel::authenticated_encrypted(),

            builders {
                /// Build a LOAD KEY command loading an ECC secp256k1 keypair
                pub fn load_keypair(public_key: Option<PublicKey>, private_key: SecretKey) -> Result<Self, crate::Error> {
                    let keypair = match public_key {
                        Some(public_key) => Keypair::with_keypair(public_key, private_key),
                        None => Keypair::with_private_key(private_key),
                    };
                    Ok(Self::new(0x01, 0x00).with_data(Bytes::from(keypair.to_bytes()?)).with_le(0))
                }

                /// Build a LOAD KEY command loading an ECC secp256k1 extended keypair
                pub fn load_extended_keypair(public_key: PublicKey, private_key: SecretKey, chain_code: [u8; 32]) -> Result<Self, crate::Error> {
                    let keypair = Keypair::with_extended_keypair(public_key, private_key, chain_code.to_vec());
                    Ok(Self::new(0x02, 0x00).with_data(Bytes::from(keypair.to_bytes()?)).with_le(0))
                }

                /// Build a LOAD KEY command loading a BIP39 seed
                pub fn load_bip39_seed(seed: &[u8; 64]) -> Self {
                    Self::new(0x03, 0x00).with_data(Bytes::copy_from_slice(seed)).with_le(0)
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success {
                    /// SHA-256 hash of the loaded seed, identifying this key going forward
                    key_uid: [u8; 32],
                }
            }

            errors {
                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data: format is invalid")]
                WrongData,

                #[sw(SW_INCORRECT_P1P2)]
                #[error("Incorrect P1/P2: P1 is invalid")]
                IncorrectP1P2,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<LoadKeyOk, LoadKeyError> {
                use apdu_core::ApduResponse;

                match response.status() {
                    SW_NO_ERROR => match response.payload() {
                        Some(payload) => Ok(LoadKeyOk::Success {
                            key_uid: payload.to_vec().try_into().map_err(|_| LoadKeyError::WrongData)?,
                        }),
                        None => Err(LoadKeyError::WrongData),
                    },
                    SW_WRONG_DATA => Err(LoadKeyError::WrongData),
                    SW_INCORRECT_P1P2 => Err(LoadKeyError::IncorrectP1P2),
                    sw => Err(LoadKeyError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
