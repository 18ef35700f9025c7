//! [`apdu_core::CardTransport`] implementation over a PC/SC reader connection

use std::ffi::CString;
use std::fmt;

use apdu_core::{Bytes, CardTransport, TransportError};
use pcsc::{Card, Context, Disposition};

use crate::config::PcscConfig;
use crate::error::PcscError;

/// A transport connected to a single reader via PC/SC
pub struct PcscTransport {
    context: Context,
    card: Option<Card>,
    reader_name: String,
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Connect to `reader_name` using `context`, attempting to establish a card
    /// connection immediately (a missing card is not an error here — it's
    /// retried lazily on the next transmit)
    pub fn connect(context: Context, reader_name: &str, config: PcscConfig) -> Result<Self, PcscError> {
        let mut transport = Self {
            context,
            card: None,
            reader_name: reader_name.to_string(),
            config,
        };
        let _ = transport.connect_card();
        Ok(transport)
    }

    fn connect_card(&mut self) -> Result<(), PcscError> {
        if self.card.is_some() {
            return Ok(());
        }

        let reader_cstr =
            CString::new(self.reader_name.clone()).map_err(|_| PcscError::ReaderNotFound(self.reader_name.clone()))?;

        match self.context.connect(&reader_cstr, self.config.share_mode.into(), self.config.protocols) {
            Ok(card) => {
                self.card = Some(card);
                Ok(())
            }
            Err(pcsc::Error::NoSmartcard) => Err(PcscError::NoCard(self.reader_name.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// The ATR of the currently connected card
    pub fn atr(&self) -> Result<Vec<u8>, PcscError> {
        let card = self.card.as_ref().ok_or_else(|| PcscError::NoCard(self.reader_name.clone()))?;
        card.get_attribute_owned(pcsc::Attribute::AtrString).map_err(PcscError::from)
    }

    /// The name of the reader this transport is connected to
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        self.connect_card()?;

        let card = self.card.as_mut().ok_or_else(|| PcscError::NoCard(self.reader_name.clone()))?;
        let mut response_buffer = [0u8; 258];

        match card.transmit(command, &mut response_buffer) {
            Ok(response) => Ok(Bytes::copy_from_slice(response)),
            Err(e) => {
                if matches!(e, pcsc::Error::ResetCard | pcsc::Error::RemovedCard) {
                    self.card = None;
                    if self.config.auto_reconnect && e == pcsc::Error::ResetCard && self.connect_card().is_ok() {
                        return self.transmit_command(command);
                    }
                }
                Err(e.into())
            }
        }
    }
}

impl CardTransport for PcscTransport {
    type Error = PcscError;

    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        self.transmit_command(command)
    }

    fn is_connected(&self) -> bool {
        self.card.is_some()
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::ResetCard);
        }
        self.connect_card()
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::LeaveCard);
        }
    }
}
