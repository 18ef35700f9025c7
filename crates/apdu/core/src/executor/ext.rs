//! Extension traits layered on top of [`super::Executor`]

use bytes::Bytes;

use crate::processor::{ProcessorError, SecureChannelProvider};
use crate::transport::CardTransport;

use super::{CardExecutor, ExecutionError, Executor};

/// An executor that remembers the last raw response it received
pub trait ResponseAwareExecutor: Executor {
    /// The last raw response bytes seen, if any
    fn last_response(&self) -> Result<&Bytes, Self::Error>;
}

impl<T: CardTransport> ResponseAwareExecutor for CardExecutor<T> {
    fn last_response(&self) -> Result<&Bytes, Self::Error> {
        self.last_response.as_ref().ok_or(ExecutionError::InvalidResponseFormat)
    }
}

/// An executor capable of establishing a secure channel on top of its transport
pub trait SecureChannelExecutor: Executor {
    /// Run the handshake for `provider` and push the resulting processor onto the stack
    fn open_secure_channel(
        &mut self,
        provider: &dyn SecureChannelProvider<Error = ProcessorError>,
    ) -> Result<(), Self::Error>;
}

impl<T: CardTransport> SecureChannelExecutor for CardExecutor<T> {
    fn open_secure_channel(
        &mut self,
        provider: &dyn SecureChannelProvider<Error = ProcessorError>,
    ) -> Result<(), Self::Error> {
        CardExecutor::open_secure_channel(self, provider)
    }
}
