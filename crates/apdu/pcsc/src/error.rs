//! Errors specific to the PC/SC transport

use apdu_core::TransportError;
use thiserror::Error;

/// Errors from establishing or using a PC/SC connection
#[derive(Debug, Error)]
pub enum PcscError {
    /// The underlying `pcsc` library returned an error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers are connected to the system
    #[error("No readers available")]
    NoReadersAvailable,

    /// The named reader does not exist
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// No card is present in the selected reader
    #[error("No card present in reader: {0}")]
    NoCard(String),
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::Pcsc(pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard) => TransportError::NoCardPresent,
            PcscError::Pcsc(pcsc::Error::ResetCard) => TransportError::ConnectionLost,
            PcscError::Pcsc(pcsc::Error::Timeout) => TransportError::Timeout,
            PcscError::Pcsc(e) => TransportError::message(e.to_string()),
            PcscError::NoReadersAvailable | PcscError::ReaderNotFound(_) => TransportError::message(error.to_string()),
            PcscError::NoCard(_) => TransportError::NoCardPresent,
        }
    }
}
