//! ISO/IEC 7816-4 command APDU encoding and the [`ApduCommand`] trait

use bytes::Bytes;
use core::fmt;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use std::vec::Vec;
    } else {
        use alloc::vec::Vec;
    }
}

use crate::processor::SecurityLevel;
use crate::response::{Response, ResponseError};

cfg_if::cfg_if! {
    if #[cfg(feature = "longer_payloads")] {
        /// Expected response length, Le. Extended length support allows values up to 65536.
        pub type ExpectedLength = u16;
    } else {
        /// Expected response length, Le.
        pub type ExpectedLength = u8;
    }
}

/// Error constructing or parsing a raw [`Command`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Buffer too short to contain a valid header
    InvalidLength,
    /// Declared Lc does not match the remaining buffer length
    InvalidDataLength,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength => write!(f, "command buffer too short for a header"),
            Self::InvalidDataLength => write!(f, "declared Lc does not match remaining data"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

/// A raw, untyped command APDU: CLA/INS/P1/P2 plus optional data and Le
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    data: Option<Bytes>,
    le: Option<ExpectedLength>,
}

impl Command {
    /// Construct a command with no data and no expected response length
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Construct a command with an expected response length but no data
    pub fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Construct a command carrying data but expecting no response
    pub fn new_with_data(cla: u8, ins: u8, p1: u8, p2: u8, data: impl Into<Bytes>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: None,
        }
    }

    /// Construct a command carrying both data and an expected response length
    pub fn new_with_data_and_le(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: impl Into<Bytes>,
        le: ExpectedLength,
    ) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: Some(le),
        }
    }

    /// Return a copy of this command with the given data attached
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Return a copy of this command with the given expected length attached
    pub fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Class byte
    pub fn class(&self) -> u8 {
        self.cla
    }

    /// Instruction byte
    pub fn instruction(&self) -> u8 {
        self.ins
    }

    /// Parameter 1
    pub fn p1(&self) -> u8 {
        self.p1
    }

    /// Parameter 2
    pub fn p2(&self) -> u8 {
        self.p2
    }

    /// Command data field, if any
    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Expected response length, if any
    pub fn le(&self) -> Option<ExpectedLength> {
        self.le
    }

    /// Total length of the serialized command, in bytes
    pub fn command_length(&self) -> usize {
        self.to_bytes().len()
    }

    /// Serialize to a raw command APDU
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = Vec::with_capacity(4 + self.data.as_ref().map_or(0, Bytes::len) + 3);
        buf.push(self.cla);
        buf.push(self.ins);
        buf.push(self.p1);
        buf.push(self.p2);

        if let Some(data) = &self.data {
            #[cfg(feature = "longer_payloads")]
            {
                if data.len() > 255 {
                    buf.push(0x00);
                    buf.extend_from_slice(&(data.len() as u16).to_be_bytes());
                } else {
                    buf.push(data.len() as u8);
                }
            }
            #[cfg(not(feature = "longer_payloads"))]
            {
                buf.push(data.len() as u8);
            }
            buf.extend_from_slice(data);
        }

        if let Some(le) = self.le {
            #[cfg(feature = "longer_payloads")]
            buf.extend_from_slice(&le.to_be_bytes());
            #[cfg(not(feature = "longer_payloads"))]
            buf.push(le);
        }

        Bytes::from(buf)
    }

    /// Parse a raw command APDU from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CommandError> {
        if bytes.len() < 4 {
            return Err(CommandError::InvalidLength);
        }

        let cla = bytes[0];
        let ins = bytes[1];
        let p1 = bytes[2];
        let p2 = bytes[3];
        let rest = &bytes[4..];

        if rest.is_empty() {
            return Ok(Self::new(cla, ins, p1, p2));
        }

        if rest.len() == 1 {
            return Ok(Self::new_with_le(cla, ins, p1, p2, rest[0] as ExpectedLength));
        }

        let lc = rest[0] as usize;
        let body = &rest[1..];

        if lc == 0 {
            // Lc == 0 with remaining bytes means a bare Le follows
            if body.len() == 1 {
                return Ok(Self::new_with_le(cla, ins, p1, p2, body[0] as ExpectedLength));
            }
            return Err(CommandError::InvalidDataLength);
        }

        if body.len() == lc {
            return Ok(Self::new_with_data(cla, ins, p1, p2, body.to_vec()));
        }

        if body.len() == lc + 1 {
            let (data, le) = body.split_at(lc);
            return Ok(Self::new_with_data_and_le(
                cla,
                ins,
                p1,
                p2,
                data.to_vec(),
                le[0] as ExpectedLength,
            ));
        }

        Err(CommandError::InvalidDataLength)
    }
}

/// A strongly-typed APDU command: knows how to build itself and parse its own response
pub trait ApduCommand: Sized {
    /// Successfully parsed response type
    type Success;
    /// Error type for this command
    type Error: fmt::Debug;

    /// Class byte
    fn class(&self) -> u8;
    /// Instruction byte
    fn instruction(&self) -> u8;
    /// Parameter 1
    fn p1(&self) -> u8;
    /// Parameter 2
    fn p2(&self) -> u8;
    /// Command data field, if any
    fn data(&self) -> Option<Bytes>;
    /// Expected response length, if any
    fn expected_length(&self) -> Option<ExpectedLength> {
        None
    }

    /// Security level this command requires to be transmitted
    fn required_security_level(&self) -> SecurityLevel {
        SecurityLevel::none()
    }

    /// Convert a generic response error into this command's error type
    fn convert_error(error: ResponseError) -> Self::Error;

    /// Parse a generic response into this command's success/error type
    fn parse_response(&self, response: Response) -> Result<Self::Success, Self::Error>;

    /// Serialize this command into a raw command APDU
    fn to_bytes(&self) -> Bytes {
        self.to_command().to_bytes()
    }

    /// Total length of the serialized command, in bytes
    fn command_length(&self) -> usize {
        self.to_command().command_length()
    }

    /// Build the untyped [`Command`] this type represents
    fn to_command(&self) -> Command {
        match (self.data(), self.expected_length()) {
            (Some(data), Some(le)) => {
                Command::new_with_data_and_le(self.class(), self.instruction(), self.p1(), self.p2(), data, le)
            }
            (Some(data), None) => Command::new_with_data(self.class(), self.instruction(), self.p1(), self.p2(), data),
            (None, Some(le)) => Command::new_with_le(self.class(), self.instruction(), self.p1(), self.p2(), le),
            (None, None) => Command::new(self.class(), self.instruction(), self.p1(), self.p2()),
        }
    }

    /// Parse a raw response buffer into this command's success/error type
    fn parse_response_raw(&self, bytes: Bytes) -> Result<Self::Success, Self::Error> {
        match Response::from_bytes(&bytes) {
            Ok(response) => self.parse_response(response),
            Err(err) => Err(Self::convert_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let cmd = Command::new_with_data(0x00, 0xA4, 0x04, 0x00, vec![0x01, 0x02, 0x03]);
        assert_eq!(cmd.to_bytes().as_ref(), &[0x00, 0xA4, 0x04, 0x00, 0x03, 0x01, 0x02, 0x03]);

        let cmd = Command::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(cmd.to_bytes().as_ref(), &[0x00, 0xA4, 0x04, 0x00]);
    }

    #[test]
    fn test_command_length() {
        let cmd = Command::new_with_data_and_le(0x00, 0xA4, 0x04, 0x00, vec![0x01, 0x02], 0x00);
        assert_eq!(cmd.command_length(), 4 + 1 + 2 + 1);
    }

    #[test]
    fn test_command_from_bytes() {
        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(cmd, Command::new(0x00, 0xA4, 0x04, 0x00));

        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x02, 0x01, 0x02]).unwrap();
        assert_eq!(cmd, Command::new_with_data(0x00, 0xA4, 0x04, 0x00, vec![0x01, 0x02]));

        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x02, 0x01, 0x02, 0x10]).unwrap();
        assert_eq!(
            cmd,
            Command::new_with_data_and_le(0x00, 0xA4, 0x04, 0x00, vec![0x01, 0x02], 0x10)
        );

        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x10]).unwrap();
        assert_eq!(cmd, Command::new_with_le(0x00, 0xA4, 0x04, 0x00, 0x10));

        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x00, 0x10]).unwrap();
        assert_eq!(cmd, Command::new_with_le(0x00, 0xA4, 0x04, 0x00, 0x10));
    }
}
