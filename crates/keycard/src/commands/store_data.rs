//! STORE DATA: writes one of the card's persistent records

use bytes::Bytes;
use apdu_macros::apdu_pair;

use crate::constants::status::*;

use super::{PersistentRecord, CLA_GP};

apdu_pair! {
    /// STORE DATA command
    pub struct StoreData {
        command {
            cla: CLA_GP,
            ins: 0xE2,
            required_security_level: SecurityLevel::authenticated_mac(),

            builders {
                /// Build a STORE DATA command writing `data` to `record`
                pub fn put(record: PersistentRecord, data: &[u8]) -> Self {
                    Self::new(record as u8, 0x00).with_data(Bytes::copy_from_slice(data))
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success,
            }

            errors {
                /// Requires secure channel and verified PIN
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: requires secure channel and verified PIN")]
                ConditionsNotSatisfied,

                /// The record specified is not valid
                #[sw(SW_INCORRECT_P1P2)]
                #[error("Incorrect P1/P2: the record specified is not valid")]
                IncorrectP1P2,

                /// Data is too long
                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data: data is too long")]
                WrongData,
            }
        }
    }
}
