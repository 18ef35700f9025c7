//! VERIFY PIN, CHANGE PIN (PIN/PUK/pairing secret), and UNBLOCK PIN

use bytes::Bytes;
use apdu_macros::apdu_pair;

use crate::constants::status::*;
use crate::validation::{validate_pin, validate_puk, ValidationError};

use super::CLA_GP;

/// Which secret CHANGE PIN updates, selected by P1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangePinTarget {
    /// The user PIN (6 digits)
    Pin = 0x00,
    /// The PUK (12 digits)
    Puk = 0x01,
    /// The pairing secret
    PairingSecret = 0x02,
}

fn wrong_pin_remaining(sw2: u8) -> u8 {
    sw2 & 0x0F
}

apdu_pair! {
    /// VERIFY PIN command
    pub struct VerifyPin {
        command {
            cla: CLA_GP,
            ins: 0x20,
            required_security_level: SecurityLevel::mac_protected(),

            builders {
                /// Build a VERIFY PIN command for the given 6-digit PIN
                pub fn with_pin(pin: &str) -> Result<Self, ValidationError> {
                    let pin = validate_pin(pin)?;
                    Ok(Self::new(0x00, 0x00).with_data(Bytes::from(pin.into_bytes())))
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success
            }

            errors {
                /// Wrong PIN; `remaining_attempts` counts down to the PIN identifier being blocked
                #[sw(SW_WRONG_PIN_PUK_PREFIX, _)]
                #[error("Wrong PIN, {remaining_attempts} attempts remaining")]
                WrongPin {
                    /// Attempts left before the PIN identifier is blocked
                    remaining_attempts: u8,
                },
            }

            custom_parse = |response: &apdu_core::Response| -> Result<VerifyPinOk, VerifyPinError> {
                match response.status() {
                    SW_NO_ERROR => Ok(VerifyPinOk::Success),
                    sw if sw.sw1() == SW_WRONG_PIN_PUK_PREFIX => Err(VerifyPinError::WrongPin {
                        remaining_attempts: wrong_pin_remaining(sw.sw2()),
                    }),
                    sw => Err(VerifyPinError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}

apdu_pair! {
    /// CHANGE PIN command
    pub struct ChangePin {
        command {
            cla: CLA_GP,
            ins: 0x21,
            required_security_level: SecurityLevel::full(),

            builders {
                /// Build a CHANGE PIN command setting a new 6-digit PIN
                pub fn with_new_pin(pin: &str) -> Result<Self, ValidationError> {
                    let pin = validate_pin(pin)?;
                    Ok(Self::new(ChangePinTarget::Pin as u8, 0x00).with_data(Bytes::from(pin.into_bytes())))
                }

                /// Build a CHANGE PIN command setting a new 12-digit PUK
                pub fn with_new_puk(puk: &str) -> Result<Self, ValidationError> {
                    let puk = validate_puk(puk)?;
                    Ok(Self::new(ChangePinTarget::Puk as u8, 0x00).with_data(Bytes::from(puk.into_bytes())))
                }

                /// Build a CHANGE PIN command setting a new pairing secret
                pub fn with_new_pairing_secret(pairing_secret: &str) -> Self {
                    Self::new(ChangePinTarget::PairingSecret as u8, 0x00).with_data(Bytes::copy_from_slice(pairing_secret.as_bytes()))
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

                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data: invalid secret format")]
                WrongData,

                #[sw(SW_INCORRECT_P1P2)]
                #[error("Incorrect P1/P2: invalid target")]
                IncorrectP1P2,
            }
        }
    }
}

apdu_pair! {
    /// UNBLOCK PIN command
    pub struct UnblockPin {
        command {
            cla: CLA_GP,
            ins: 0x22,
            required_security_level: SecurityLevel::full(),

            builders {
                /// Build an UNBLOCK PIN command with `puk` and the `new_pin` to set once unblocked
                pub fn with_puk_and_new_pin(puk: &str, new_pin: &str) -> Result<Self, ValidationError> {
                    let puk = validate_puk(puk)?;
                    let new_pin = validate_pin(new_pin)?;

                    let mut data = puk.into_bytes();
                    data.extend(new_pin.into_bytes());

                    Ok(Self::new(0x00, 0x00).with_data(Bytes::from(data)))
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success
            }

            errors {
                /// PIN is not blocked; nothing to unblock
                #[sw(SW_CONDITIONS_NOT_SATISFIED)]
                #[error("Conditions not satisfied: PIN is not blocked")]
                ConditionsNotSatisfied,

                /// Wrong PUK; `remaining_attempts` counts down to the card becoming unusable
                #[sw(SW_WRONG_PIN_PUK_PREFIX, _)]
                #[error("Wrong PUK, {remaining_attempts} attempts remaining")]
                WrongPuk {
                    /// Attempts left before the card becomes permanently unusable
                    remaining_attempts: u8,
                },
            }

            custom_parse = |response: &apdu_core::Response| -> Result<UnblockPinOk, UnblockPinError> {
                match response.status() {
                    SW_NO_ERROR => Ok(UnblockPinOk::Success),
                    SW_CONDITIONS_NOT_SATISFIED => Err(UnblockPinError::ConditionsNotSatisfied),
                    sw if sw.sw1() == SW_WRONG_PIN_PUK_PREFIX => Err(UnblockPinError::WrongPuk {
                        remaining_attempts: wrong_pin_remaining(sw.sw2()),
                    }),
                    sw => Err(UnblockPinError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}
