//! Generic APDU response type and parsing

pub mod error;
pub mod status;
pub mod utils;

use bytes::Bytes;

pub use error::ResponseError;
pub use status::StatusWord;

/// Trait for types that carry a status word and optional payload
pub trait ApduResponse {
    /// The status word this response carries
    fn status(&self) -> StatusWord;

    /// The response payload, if any (excludes the trailing status bytes)
    fn payload(&self) -> Option<&Bytes>;

    /// Whether the card is signalling more data is available via GET RESPONSE
    fn more_data_available(&self) -> bool {
        self.status().has_more_data()
    }
}

/// Trait for types parseable from a raw [`Response`]
pub trait FromApduResponse: Sized {
    /// Error produced on failure to parse
    type Error;

    /// Parse `self` from a generic response
    fn from_response(response: Response) -> Result<Self, Self::Error>;
}

/// A generic, untyped APDU response: payload plus trailing status word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Option<Bytes>,
    status: StatusWord,
}

impl Response {
    /// Construct a response from a payload and status word
    pub fn new(payload: Option<Bytes>, status: StatusWord) -> Self {
        Self { payload, status }
    }

    /// Parse a response from raw bytes (payload followed by SW1 SW2)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ResponseError> {
        let (payload, status) = utils::extract_response_parts(bytes).ok_or(ResponseError::Incomplete)?;
        let payload = if payload.is_empty() {
            None
        } else {
            Some(Bytes::copy_from_slice(payload))
        };
        Ok(Self { payload, status })
    }

    /// Serialize back to raw bytes
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = Vec::with_capacity(self.payload.as_ref().map_or(0, Bytes::len) + 2);
        if let Some(payload) = &self.payload {
            buf.extend_from_slice(payload);
        }
        buf.push(self.status.sw1);
        buf.push(self.status.sw2);
        Bytes::from(buf)
    }
}

impl ApduResponse for Response {
    fn status(&self) -> StatusWord {
        self.status
    }

    fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        response.to_bytes()
    }
}

impl TryFrom<Bytes> for Response {
    type Error = ResponseError;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_round_trip() {
        let response = Response::from_bytes(&[0xDE, 0xAD, 0xBE, 0xEF, 0x90, 0x00]).unwrap();
        assert_eq!(response.status(), StatusWord::new(0x90, 0x00));
        assert_eq!(response.payload().unwrap().as_ref(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(response.to_bytes().as_ref(), &[0xDE, 0xAD, 0xBE, 0xEF, 0x90, 0x00]);
    }

    #[test]
    fn test_response_no_payload() {
        let response = Response::from_bytes(&[0x6A, 0x82]).unwrap();
        assert_eq!(response.status(), StatusWord::new(0x6A, 0x82));
        assert!(response.payload().is_none());
    }
}
