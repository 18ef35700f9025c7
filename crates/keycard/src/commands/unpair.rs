//! UNPAIR: releases a pairing slot, invalidating its pairing key

use apdu_macros::apdu_pair;

use crate::constants::status::*;
use crate::validation::{validate_pairing_index, ValidationError};

use super::CLA_GP;

apdu_pair! {
    /// UNPAIR command
    pub struct Unpair {
        command {
            cla: CLA_GP,
            ins: 0x13,
            required_security_level: SecurityLevel::full(),

            builders {
                /// Build an UNPAIR command releasing pairing slot `index`
                pub fn with_index(index: u8) -> Result<Self, ValidationError> {
                    let index = validate_pairing_index(index)?;
                    Ok(Self::new(index, 0x00))
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success
            }

            errors {
                /// Requires secure channel and a verified PIN
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: requires secure channel and verified PIN")]
                ConditionsNotSatisfied,

                /// No pairing exists at that index
                #[sw(SW_INCORRECT_P1P2)]
                #[error("Incorrect P1/P2: no pairing at that index")]
                IncorrectP1P2,
            }
        }
    }
}
