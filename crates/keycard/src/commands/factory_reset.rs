//! FACTORY RESET: irreversibly wipes the applet back to its pre-INIT state

use apdu_macros::apdu_pair;

use crate::constants::status::*;

apdu_pair! {
    /// FACTORY RESET command
    pub struct FactoryReset {
        command {
            cla: 0x00,
            ins: 0xFE,

            builders {
                /// Build the FACTORY RESET command. Irreversible; requires no authentication.
                pub fn reset() -> Self {
                    Self::new(0xAA, 0xAA)
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success
            }
        }
    }
}
