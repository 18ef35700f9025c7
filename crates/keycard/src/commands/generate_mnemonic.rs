//! GENERATE MNEMONIC: derives a BIP39 seed and returns it as wordlist indices

use apdu_macros::apdu_pair;
use coins_bip39::Mnemonic;

use crate::constants::status::*;
use crate::Error;

use super::CLA_GP;

apdu_pair! {
    /// GENERATE MNEMONIC command
    pub struct GenerateMnemonic {
        command {
            cla: CLA_GP,
            ins: 0xD6,
            required_security_level: SecurityLevel::encrypted(),

            builders {
                /// Build a GENERATE MNEMONIC command for a mnemonic of `words` words (12, 15, 18, 21, or 24)
                pub fn with_words(words: u8) -> Result<Self, GenerateMnemonicError> {
                    match words {
                        12 | 15 | 18 | 21 | 24 => Ok(Self::new(words / 3, 0x00).with_le(0)),
                        _ => Err(GenerateMnemonicError::IncorrectChecksumSize),
                    }
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success {
                    /// Wordlist indices, two bytes each, big-endian
                    seed: Vec<u8>,
                }
            }

            errors {
                /// Checksum size is out of range (between 4 and 8)
                #[sw(SW_INCORRECT_P1P2)]
                #[error("Incorrect P1/P2: checksum size is out of range (4-8)")]
                IncorrectChecksumSize,
            }
        }
    }
}

impl GenerateMnemonicOk {
    /// Turn the returned wordlist indices into a checked [`Mnemonic`]
    pub fn to_phrase<L>(&self) -> Result<Mnemonic<L>, Error>
    where
        L: coins_bip39::Wordlist,
    {
        match self {
            Self::Success { seed } => {
                let mut words = Vec::new();

                for chunk in seed.chunks_exact(2) {
                    let index = u16::from_be_bytes([chunk[0], chunk[1]]) as usize;
                    words.push(L::get(index)?);
                }

                Mnemonic::new_from_phrase(words.join(" ").as_str()).map_err(Into::into)
            }
        }
    }
}
