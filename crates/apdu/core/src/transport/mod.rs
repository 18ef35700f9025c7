//! Physical/logical transports a raw command APDU can be transmitted over

pub mod error;

use bytes::Bytes;

pub use error::TransportError;

/// A channel a raw command APDU can be sent over, returning a raw response
///
/// Implementations wrap a concrete reader connection (PC/SC, USB-CCID, emulated)
/// and know nothing about command structure or secure channels — that's layered
/// on top by [`crate::processor::CommandProcessor`] and [`crate::executor::Executor`].
/// Unlike processors, a transport owns a unique underlying connection and is
/// never required to be cloneable.
pub trait CardTransport: Send {
    /// Error type produced by this transport
    type Error: Into<TransportError> + core::fmt::Debug;

    /// Send a raw command APDU and return the raw response
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error>;

    /// Whether the transport currently believes a card is present
    fn is_connected(&self) -> bool {
        true
    }

    /// Reset the underlying connection, if supported
    fn reset(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
pub use mock::MockTransport;

#[cfg(test)]
mod mock {
    use super::*;
    use std::collections::VecDeque;

    /// Transport used in unit tests: replays a canned queue of responses
    #[derive(Debug, Clone, Default)]
    pub struct MockTransport {
        responses: VecDeque<Vec<u8>>,
        pub sent: Vec<Vec<u8>>,
        connected: bool,
    }

    impl MockTransport {
        /// Construct a mock transport that will reply with `responses` in order
        pub fn with_responses(responses: Vec<Vec<u8>>) -> Self {
            Self {
                responses: responses.into(),
                sent: Vec::new(),
                connected: true,
            }
        }
    }

    impl CardTransport for MockTransport {
        type Error = TransportError;

        fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
            self.sent.push(command.to_vec());
            match self.responses.pop_front() {
                Some(bytes) => Ok(Bytes::from(bytes)),
                None => Ok(Bytes::from_static(&[0x90, 0x00])),
            }
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }
}
