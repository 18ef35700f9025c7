//! Processors that sit between an [`crate::executor::Executor`] and a [`crate::transport::CardTransport`]
//!
//! Each processor may rewrite an outgoing command (e.g. encrypt/MAC it under a
//! secure channel) and/or an incoming response (e.g. decrypt it, or transparently
//! chain GET RESPONSE calls). An executor holds a stack of processors and applies
//! the most specific active one.

pub mod error;
pub mod secure;

use crate::command::Command;
use crate::response::Response;

pub use error::ProcessorError;
pub use secure::{BaseSecureChannel, SecureChannel, SecureChannelProvider, SecurityLevel};

/// A single link in the command/response processing chain
pub trait CommandProcessor: dyn_clone::DynClone + Send {
    /// Error produced while processing a command or response
    fn process_command(&mut self, command: &Command) -> Result<Command, ProcessorError>;

    /// Transform a raw response before it reaches the caller
    fn process_response(&mut self, response: Response) -> Result<Response, ProcessorError>;

    /// Security level this processor currently provides
    fn security_level(&self) -> SecurityLevel {
        SecurityLevel::none()
    }

    /// Whether this processor should currently be applied
    ///
    /// An [`crate::executor::CardExecutor`] walks its processor stack from the
    /// most recently added and uses the first one where this returns `true`.
    fn is_active(&self) -> bool {
        true
    }
}

dyn_clone::clone_trait_object!(CommandProcessor);

/// A processor that passes commands and responses through unchanged
#[derive(Debug, Clone, Default)]
pub struct IdentityProcessor;

impl CommandProcessor for IdentityProcessor {
    fn process_command(&mut self, command: &Command) -> Result<Command, ProcessorError> {
        Ok(command.clone())
    }

    fn process_response(&mut self, response: Response) -> Result<Response, ProcessorError> {
        Ok(response)
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// A processor that transparently chains GET RESPONSE (INS 0xC0) calls
///
/// When a response carries SW1=0x61, more data is waiting on the card; this
/// state is tracked so the executor knows a follow-up GET RESPONSE is needed.
/// The processor itself does not own a transport, so the chaining loop lives
/// in [`crate::executor::CardExecutor::do_transmit`]; this type exists to mark
/// the security level contributed (none) and to be explicit in the stack about
/// which processor is responsible for the behavior.
#[derive(Debug, Clone, Default)]
pub struct GetResponseProcessor {
    class: u8,
}

impl GetResponseProcessor {
    /// Class byte to use for synthesized GET RESPONSE commands (usually 0x00)
    pub fn new(class: u8) -> Self {
        Self { class }
    }

    /// Build the GET RESPONSE command for `length` remaining bytes
    pub fn get_response_command(&self, length: u8) -> Command {
        Command::new_with_le(self.class, 0xC0, 0x00, 0x00, length)
    }
}

impl CommandProcessor for GetResponseProcessor {
    fn process_command(&mut self, command: &Command) -> Result<Command, ProcessorError> {
        Ok(command.clone())
    }

    fn process_response(&mut self, response: Response) -> Result<Response, ProcessorError> {
        Ok(response)
    }

    fn is_active(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_processor_passthrough() {
        let mut processor = IdentityProcessor;
        let command = Command::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(processor.process_command(&command).unwrap(), command);
    }

    #[test]
    fn test_get_response_command() {
        let processor = GetResponseProcessor::new(0x00);
        let cmd = processor.get_response_command(0x10);
        assert_eq!(cmd.instruction(), 0xC0);
        assert_eq!(cmd.le(), Some(0x10));
    }
}
