//! REMOVE KEY: wipes the card's current master key, leaving PIN/PUK/pairing state intact

use apdu_macros::apdu_pair;

use crate::constants::status::*;

use super::CLA_GP;

apdu_pair! {
    /// REMOVE KEY command
    pub struct RemoveKey {
        command {
            cla: CLA_GP,
            ins: 0xC0,
            required_security_level: SecurityLevel::auth_mac(),

            builders {
                /// Build the REMOVE KEY command
                pub fn remove() -> Self {
                    Self::new(0x00, 0x00)
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success
            }

            errors {
                #[sw(SW_SECURITY_STATUS_NOT_SATISFIED)]
                #[error("Security status not satisfied: secure channel required")]
                SecurityStatusNotSatisfied,

                /// No key is currently loaded
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: no key is loaded")]
                ConditionsNotSatisfied,
            }
        }
    }
}
