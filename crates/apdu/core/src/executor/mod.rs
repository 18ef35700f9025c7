//! Drives a command through a processor chain and a transport

pub mod error;
pub mod ext;

use bytes::Bytes;
use tracing::instrument;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use std::{boxed::Box, vec::Vec};
    } else {
        use alloc::{boxed::Box, vec::Vec};
    }
}

use crate::command::{ApduCommand, Command};
use crate::processor::{CommandProcessor, GetResponseProcessor, ProcessorError, SecureChannelProvider, SecurityLevel};
use crate::response::{Response, ResponseError};
use crate::transport::CardTransport;

pub use error::ExecutionError;
pub use ext::{ResponseAwareExecutor, SecureChannelExecutor};

/// Drives typed commands end-to-end: serialize, transmit through the processor
/// chain and transport, then parse the response
pub trait Executor {
    /// Error produced by this executor
    type Error: From<ExecutionError> + core::fmt::Debug;

    /// Transmit a raw command and return the raw response, applying the processor chain
    fn transmit(&mut self, command: &[u8]) -> Result<Bytes, Self::Error>;

    /// Transmit a raw command with no processor chain involvement (internal use)
    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes, Self::Error>;

    /// Serialize, transmit, and parse a typed command
    fn execute<C: ApduCommand>(&mut self, command: &C) -> Result<C::Success, C::Error>
    where
        C::Error: From<Self::Error>;

    /// The strongest security level currently active across the processor chain
    fn security_level(&self) -> SecurityLevel;

    /// Tear down the transport connection and clear all processors
    fn reset(&mut self) -> Result<(), Self::Error>;
}

/// A concrete [`Executor`] driving commands over a [`CardTransport`] through a
/// stack of [`CommandProcessor`]s
pub struct CardExecutor<T: CardTransport> {
    transport: T,
    processors: Vec<Box<dyn CommandProcessor>>,
    last_response: Option<Bytes>,
}

impl<T: CardTransport> CardExecutor<T> {
    /// Construct an executor over `transport` with no processors installed
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            processors: Vec::new(),
            last_response: None,
        }
    }

    /// Construct an executor with the default processor chain (GET RESPONSE chaining)
    pub fn new_with_defaults(transport: T) -> Self {
        let mut executor = Self::new(transport);
        executor.add_processor(Box::new(GetResponseProcessor::default()));
        executor
    }

    /// Borrow the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the executor and return its transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Push a processor onto the top of the chain
    pub fn add_processor(&mut self, processor: Box<dyn CommandProcessor>) {
        self.processors.push(processor);
    }

    /// The current processor chain, outermost last
    pub fn processors(&self) -> &[Box<dyn CommandProcessor>] {
        &self.processors
    }

    /// Mutably borrow the processor chain
    pub fn processors_mut(&mut self) -> &mut Vec<Box<dyn CommandProcessor>> {
        &mut self.processors
    }

    /// Remove all processors from the chain
    pub fn clear_processors(&mut self) {
        self.processors.clear();
    }

    /// The last raw response received, if any
    pub fn last_response(&self) -> Option<&Bytes> {
        self.last_response.as_ref()
    }

    /// Run `provider`'s handshake over the transport and install the resulting processor
    pub fn open_secure_channel(
        &mut self,
        provider: &dyn SecureChannelProvider<Error = ProcessorError>,
    ) -> Result<(), ExecutionError> {
        let boxed_transport: &mut dyn CardTransport<Error = _> = &mut TransportErased(&mut self.transport);
        let processor = provider
            .create_secure_channel(boxed_transport)
            .map_err(|e| ExecutionError::Processor(e.into()))?;
        self.add_processor(processor);
        Ok(())
    }
}

/// Adapts a concrete [`CardTransport`] to the trait-object transport expected
/// by [`SecureChannelProvider::create_secure_channel`], erasing its error type
struct TransportErased<'a, T: CardTransport>(&'a mut T);

impl<'a, T: CardTransport> CardTransport for TransportErased<'a, T> {
    type Error = crate::transport::TransportError;

    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        self.0.transmit_raw(command).map_err(Into::into)
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.0.reset().map_err(Into::into)
    }
}

impl<T: CardTransport> Executor for CardExecutor<T> {
    type Error = ExecutionError;

    #[instrument(level = "debug", skip(self, command), fields(len = command.len()))]
    fn transmit(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        let mut command = Command::from_bytes(command)?;

        for processor in self.processors.iter_mut().rev() {
            if processor.is_active() {
                command = processor.process_command(&command)?;
                break;
            }
        }

        let response_bytes = self.do_transmit(&command.to_bytes())?;
        let mut response = Response::from_bytes(&response_bytes)?;

        for processor in self.processors.iter_mut().rev() {
            if processor.is_active() {
                response = processor.process_response(response)?;
                break;
            }
        }

        self.last_response = Some(response.to_bytes());
        Ok(response.to_bytes())
    }

    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        let mut response_bytes = self
            .transport
            .transmit_raw(command)
            .map_err(|e| ExecutionError::Transport(e.into()))?;

        // Transparently chain GET RESPONSE while the card signals more data (SW1=0x61)
        let mut accumulated = Vec::new();
        loop {
            let (payload, status) =
                crate::response::utils::extract_response_parts(&response_bytes).ok_or(ResponseError::Incomplete)?;
            if status.has_more_data() {
                accumulated.extend_from_slice(payload);
                let get_response = Command::new_with_le(0x00, 0xC0, 0x00, 0x00, status.sw2());
                response_bytes = self
                    .transport
                    .transmit_raw(&get_response.to_bytes())
                    .map_err(|e| ExecutionError::Transport(e.into()))?;
                continue;
            }
            accumulated.extend_from_slice(payload);
            accumulated.push(status.sw1());
            accumulated.push(status.sw2());
            break;
        }

        self.last_response = Some(Bytes::from(accumulated.clone()));
        Ok(Bytes::from(accumulated))
    }

    fn execute<C: ApduCommand>(&mut self, command: &C) -> Result<C::Success, C::Error>
    where
        C::Error: From<Self::Error>,
    {
        let raw = command.to_bytes();
        let response_bytes = self.transmit(&raw)?;
        command.parse_response_raw(response_bytes)
    }

    fn security_level(&self) -> SecurityLevel {
        self.processors
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.security_level())
            .max()
            .unwrap_or_default()
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.transport.reset().map_err(|e| ExecutionError::Transport(e.into()))?;
        self.clear_processors();
        self.last_response = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    #[test]
    fn test_executor_basic_transmit() {
        let transport = MockTransport::with_responses(vec![vec![0x90, 0x00]]);
        let mut executor = CardExecutor::new(transport);
        let response = executor.transmit(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0x90, 0x00]);
    }

    #[test]
    fn test_executor_with_processor() {
        let transport = MockTransport::with_responses(vec![vec![0x90, 0x00]]);
        let mut executor = CardExecutor::new(transport);
        executor.add_processor(Box::new(crate::processor::IdentityProcessor));
        let response = executor.transmit(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0x90, 0x00]);
    }

    #[test]
    fn test_executor_get_response_chaining() {
        let transport = MockTransport::with_responses(vec![vec![0x61, 0x02], vec![0xDE, 0xAD, 0x90, 0x00]]);
        let mut executor = CardExecutor::new(transport);
        let response = executor.transmit(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0xDE, 0xAD, 0x90, 0x00]);
    }
}
