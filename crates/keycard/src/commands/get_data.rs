//! GET DATA: reads back a persistent record previously written by STORE DATA

use apdu_macros::apdu_pair;

use crate::constants::status::*;

use super::{PersistentRecord, CLA_GP};

apdu_pair! {
    /// GET DATA command
    pub struct GetData {
        command {
            cla: CLA_GP,
            ins: 0xCA,

            builders {
                /// Build a GET DATA command reading `record`
                pub fn get(record: PersistentRecord) -> Self {
                    Self::new(record as u8, 0x00).with_le(0)
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success {
                    /// The stored record contents, empty if nothing was ever written
                    data: Vec<u8>,
                }
            }

            errors {
                /// The record specified is not valid
                #[sw(SW_INCORRECT_P1P2)]
                #[error("Incorrect P1/P2: the record specified is not valid")]
                IncorrectP1P2,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<GetDataOk, GetDataError> {
                use apdu_core::ApduResponse;

                match response.status() {
                    SW_NO_ERROR => Ok(GetDataOk::Success {
                        data: response.payload().map(|p| p.to_vec()).unwrap_or_default(),
                    }),
                    SW_INCORRECT_P1P2 => Err(GetDataError::IncorrectP1P2),
                    sw => Err(GetDataError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
