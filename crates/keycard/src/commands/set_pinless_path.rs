//! SET PINLESS PATH: designates one BIP32 path that SIGN can use without a verified PIN

use apdu_macros::apdu_pair;

use crate::constants::status::*;
use crate::path::components_to_bytes;

use super::CLA_GP;

apdu_pair! {
    /// SET PINLESS PATH command
    pub struct SetPinlessPath {
        command {
            cla: CLA_GP,
            ins: 0xC9,
            required_security_level: SecurityLevel::encrypted(),

            builders {
                /// Build a SET PINLESS PATH command for the given absolute path components.
                /// An empty slice clears the pinless path.
                pub fn with_path(components: &[u32]) -> Self {
                    Self::new(0x00, 0x00).with_data(components_to_bytes(components))
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success
            }

            errors {
                /// Requires secure channel and verified PIN
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: requires secure channel and verified PIN")]
                ConditionsNotSatisfied,

                /// Path data is not a multiple of 4 bytes
                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data: path must be a whole number of 4-byte components")]
                WrongData,
            }
        }
    }
}
