//! SELECT command: chooses an applet or file by AID

use apdu_macros::apdu_pair;

use crate::constants::{cla, ins, select_p1, status::*};

apdu_pair! {
    /// SELECT command
    pub struct Select {
        command {
            cla: cla::ISO7816,
            ins: ins::SELECT,
            required_security_level: SecurityLevel::none(),

            builders {
                /// Select an applet or file by AID
                pub fn by_aid(aid: impl Into<bytes::Bytes>) -> Self {
                    Self::new(select_p1::BY_NAME, 0x00).with_data(aid.into()).with_le(0x00)
                }
            }
        }

        response {
            ok {
                /// Selection succeeded, optionally carrying File Control Information
                #[sw(SW_NO_ERROR)]
                Selected {
                    fci: Option<Vec<u8>>,
                }
            }

            errors {
                /// No applet or file with the requested AID is present
                #[sw(SW_FILE_NOT_FOUND)]
                #[error("Applet or file not found")]
                NotFound,

                /// Security condition required by the card was not satisfied
                #[sw(SW_SECURITY_STATUS_NOT_SATISFIED)]
                #[error("Security condition not satisfied")]
                SecurityConditionNotSatisfied,
            }

            custom_parse = |response: &apdu_core::Response| -> Result<SelectOk, SelectError> {
                match response.status() {
                    SW_NO_ERROR => Ok(SelectOk::Selected {
                        fci: response.payload().map(|p| p.to_vec()),
                    }),
                    SW_FILE_NOT_FOUND => Err(SelectError::NotFound),
                    SW_SECURITY_STATUS_NOT_SATISFIED => Err(SelectError::SecurityConditionNotSatisfied),
                    sw => Err(SelectError::Unknown { sw1: sw.sw1(), sw2: sw.sw2() }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apdu_core::ApduCommand;
    use hex_literal::hex;

    #[test]
    fn test_select_command_serialization() {
        let aid = hex!("A0000000030000");
        let cmd = SelectCommand::by_aid(aid.to_vec());

        assert_eq!(cmd.class(), cla::ISO7816);
        assert_eq!(cmd.instruction(), ins::SELECT);
        assert_eq!(cmd.p1(), select_p1::BY_NAME);
        assert_eq!(cmd.to_bytes().as_ref(), hex!("00A4040007A000000003000000"));
    }

    #[test]
    fn test_select_response_success() {
        let cmd = SelectCommand::by_aid(hex!("A0000000030000").to_vec());
        let fci = hex!("6F10840E315041592E5359532E4444463031A5020500");
        let mut bytes = fci.to_vec();
        bytes.extend_from_slice(&[0x90, 0x00]);

        let response = apdu_core::Response::from_bytes(&bytes).unwrap();
        match cmd.parse_response(response).unwrap() {
            SelectOk::Selected { fci: Some(data) } => assert_eq!(data, fci.to_vec()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_select_response_not_found() {
        let cmd = SelectCommand::by_aid(hex!("A0000000030000").to_vec());
        let response = apdu_core::Response::from_bytes(&[0x6A, 0x82]).unwrap();
        assert!(matches!(cmd.parse_response(response), Err(SelectError::NotFound)));
    }
}
