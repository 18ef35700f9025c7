//! GET STATUS: reports PIN/PUK/key-initialization state, or the current key path

use apdu_macros::apdu_pair;

use crate::constants::status::*;
use crate::types::ApplicationStatus;

use super::CLA_GP;

apdu_pair! {
    /// GET STATUS command
    pub struct GetStatus {
        command {
            cla: CLA_GP,
            ins: 0xF2,
            required_security_level: SecurityLevel::mac_protected(),

            builders {
                /// Build a GET STATUS command for the application status
                pub fn application() -> Self {
                    Self::new(0x00, 0x00).with_le(0x00)
                }

                /// Build a GET STATUS command for the current key path
                pub fn key_path() -> Self {
                    Self::new(0x01, 0x00).with_le(0x00)
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                ApplicationStatus {
                    /// The application's PIN/PUK/key-initialization status
                    status: ApplicationStatus,
                },

                #[sw(SW_NO_ERROR)]
                KeyPathStatus {
                    /// Big-endian `u32` path components, hardened components with their top bit set
                    components: Vec<u32>,
                }
            }

            errors {
                /// Undefined P1
                #[sw(SW_INCORRECT_P1P2)]
                #[error("Incorrect P1/P2: undefined P1")]
                IncorrectP1P2,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<GetStatusOk, GetStatusError> {
                use apdu_core::ApduResponse;

                match response.status() {
                    SW_NO_ERROR => match response.payload() {
                        Some(data) if !data.is_empty() && data.len() % 4 == 0 => {
                            let components = data
                                .chunks(4)
                                .map(|chunk| u32::from_be_bytes(chunk.try_into().expect("chunk is 4 bytes")))
                                .collect();
                            Ok(GetStatusOk::KeyPathStatus { components })
                        }
                        Some(data) => {
                            let status = ApplicationStatus::try_from(data.as_ref())
                                .map_err(|_| GetStatusError::ParseError("unable to parse application status"))?;
                            Ok(GetStatusOk::ApplicationStatus { status })
                        }
                        None => Ok(GetStatusOk::KeyPathStatus { components: Vec::new() }),
                    },
                    SW_INCORRECT_P1P2 => Err(GetStatusError::IncorrectP1P2),
                    sw => Err(GetStatusError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
