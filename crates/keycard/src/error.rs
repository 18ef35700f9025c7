//! Error types for Keycard operations
//!
//! Centralizes every error variant a Keycard operation can produce: APDU/transport
//! failures, TLV/BIP32/BIP39 parsing errors, cryptographic failures, and one
//! `#[from]` variant per command's generated error enum.

use coins_bip39::{MnemonicError, WordlistError};
use iso7816_tlv::TlvError;
use thiserror::Error;

use crate::commands::*;
use crate::validation::ValidationError;

/// Result type for Keycard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Keycard operations
#[derive(Debug, Error)]
pub enum Error {
    //
    // Core and external dependency errors
    //
    /// Core error from apdu-core
    #[error(transparent)]
    Core(#[from] apdu_core::Error),

    /// GlobalPlatform error
    #[error(transparent)]
    GlobalPlatform(#[from] apdu_globalplatform::error::Error),

    /// TLV encoding/decoding error
    #[error("TLV error: {0}")]
    Tlv(TlvError),

    /// BIP39 mnemonic error
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    /// BIP39 wordlist error
    #[error(transparent)]
    Wordlist(#[from] WordlistError),

    /// BIP32 derivation error
    #[error(transparent)]
    Bip32(#[from] coins_bip32::Bip32Error),

    /// Caller-supplied PIN/PUK/pairing-index input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    //
    // Cryptographic errors
    //
    /// Elliptic curve cryptography error
    #[error(transparent)]
    EllipticCurve(#[from] k256::elliptic_curve::Error),

    /// ECDSA signature error
    #[error(transparent)]
    EcdsaSignature(#[from] k256::ecdsa::Error),

    /// Padding error when encrypting
    #[error("padding error when encrypting")]
    PadError(#[from] cipher::inout::PadError),

    /// Unpadding error when decrypting
    #[error("unpadding error when decrypting")]
    UnpadError(#[from] cipher::block_padding::UnpadError),

    //
    // Keycard-specific errors
    //
    /// Capability not supported by this card
    #[error("capability not supported: {0}")]
    CapabilityNotSupported(&'static str),

    /// Card is already initialized; INIT cannot be run again
    #[error("card is already initialized")]
    AlreadyInitialized,

    /// No available pairing slots on the card
    #[error("no available pairing slots")]
    NoAvailablePairingSlots,

    /// PIN verification is required before this operation
    #[error("PIN verification required")]
    PinVerificationRequired,

    /// Pairing with the card failed
    #[error("pairing failed: cryptogram mismatch")]
    PairingFailed,

    /// Pairing information is required but was not supplied
    #[error("pairing information required")]
    PairingRequired,

    /// Mutual authentication failed
    #[error("mutual authentication failed")]
    MutualAuthenticationFailed,

    /// Wrong PIN; `remaining_attempts` counts down to the PIN being blocked
    #[error("wrong PIN, {remaining_attempts} attempts remaining")]
    WrongPin {
        /// Attempts left before the PIN identifier is blocked
        remaining_attempts: u8,
    },

    /// Wrong PUK; `remaining_attempts` counts down to the card being unusable
    #[error("wrong PUK, {remaining_attempts} attempts remaining")]
    WrongPuk {
        /// Attempts left before the PUK identifier is blocked
        remaining_attempts: u8,
    },

    /// BIP32 path parsing error
    #[error("BIP32 path parsing error: {0}")]
    Bip32PathParsingError(coins_bip32::Bip32Error),

    /// Invalid derivation path length
    #[error("invalid derivation path length")]
    InvalidDerivationPathLength,

    /// Invalid data format
    #[error("invalid data: {0}")]
    InvalidData(&'static str),

    /// Invalid arguments for key derivation
    #[error("invalid derivation arguments: {0}")]
    InvalidDerivationArguments(String),

    /// A secret (PIN, PUK, pairing password) failed validation
    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    /// Operation cancelled by the caller
    #[error("operation cancelled")]
    UserCancelled,

    //
    // Command-specific errors
    //
    /// Error from DERIVE KEY
    #[error(transparent)]
    DeriveKeyError(#[from] DeriveKeyError),

    /// Error from EXPORT KEY
    #[error(transparent)]
    ExportKeyError(#[from] ExportKeyError),

    /// Error from FACTORY RESET
    #[error(transparent)]
    FactoryResetError(#[from] FactoryResetError),

    /// Error from GENERATE KEY
    #[error(transparent)]
    GenerateKeyError(#[from] GenerateKeyError),

    /// Error from GENERATE MNEMONIC
    #[error(transparent)]
    GenerateMnemonicError(#[from] GenerateMnemonicError),

    /// Error from GET DATA
    #[error(transparent)]
    GetDataError(#[from] GetDataError),

    /// Error from GET STATUS
    #[error(transparent)]
    GetStatusError(#[from] GetStatusError),

    /// Error from IDENT
    #[error(transparent)]
    IdentError(#[from] IdentError),

    /// Error from INIT
    #[error(transparent)]
    InitError(#[from] InitError),

    /// Error from LOAD KEY
    #[error(transparent)]
    LoadKeyError(#[from] LoadKeyError),

    /// Error from MUTUALLY AUTHENTICATE
    #[error(transparent)]
    MutuallyAuthenticateError(#[from] MutuallyAuthenticateError),

    /// Error from OPEN SECURE CHANNEL
    #[error(transparent)]
    OpenSecureChannelError(#[from] OpenSecureChannelError),

    /// Error from PAIR
    #[error(transparent)]
    PairError(#[from] PairError),

    /// Error from VERIFY PIN
    #[error(transparent)]
    VerifyPinError(#[from] VerifyPinError),

    /// Error from CHANGE PIN
    #[error(transparent)]
    ChangePinError(#[from] ChangePinError),

    /// Error from UNBLOCK PIN
    #[error(transparent)]
    UnblockPinError(#[from] UnblockPinError),

    /// Error from REMOVE KEY
    #[error(transparent)]
    RemoveKeyError(#[from] RemoveKeyError),

    /// Error from SELECT
    #[error(transparent)]
    SelectError(#[from] apdu_globalplatform::commands::select::SelectError),

    /// Error from SET PINLESS PATH
    #[error(transparent)]
    SetPinlessPathError(#[from] SetPinlessPathError),

    /// Error from SIGN
    #[error(transparent)]
    SignError(#[from] SignError),

    /// Error from STORE DATA
    #[error(transparent)]
    StoreDataError(#[from] StoreDataError),

    /// Error from UNPAIR
    #[error(transparent)]
    UnpairError(#[from] UnpairError),

    //
    // General error handling
    //
    /// Context wrapping a source error with a human-readable description
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },

    /// Other error with a static message
    #[error("{0}")]
    Other(&'static str),

    /// Other error with a dynamic message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Wrap this error with additional context
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Build an error from a static message
    pub const fn other(message: &'static str) -> Self {
        Self::Other(message)
    }

    /// Build an error from a dynamic message
    pub fn message<S: Into<String>>(message: S) -> Self {
        Self::Message(message.into())
    }

    /// Build an invalid-data error
    pub const fn invalid_data(message: &'static str) -> Self {
        Self::InvalidData(message)
    }

    /// The raw status word carried by this error, if any
    pub fn status_word(&self) -> Option<apdu_core::StatusWord> {
        match self {
            Self::Core(e) => e.status_word(),
            _ => None,
        }
    }
}

/// Extension trait adding context to a [`Result`]
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<S: Into<String>>(self, context: S) -> Self {
        self.map_err(|e| e.with_context(context))
    }
}

/// Extension trait converting an `apdu_core::Result` into a Keycard [`Result`]
pub trait CoreResultExt<T> {
    /// Convert a core result into a Keycard result
    fn to_keycard(self) -> Result<T>;
}

impl<T> CoreResultExt<T> for std::result::Result<T, apdu_core::Error> {
    fn to_keycard(self) -> Result<T> {
        self.map_err(Error::from)
    }
}

/// Extension trait converting an `apdu_globalplatform::Result` into a Keycard [`Result`]
pub trait GpResultExt<T> {
    /// Convert a GlobalPlatform result into a Keycard result
    fn to_keycard(self) -> Result<T>;
}

impl<T> GpResultExt<T> for std::result::Result<T, apdu_globalplatform::error::Error> {
    fn to_keycard(self) -> Result<T> {
        self.map_err(Error::from)
    }
}

impl From<TlvError> for Error {
    fn from(error: TlvError) -> Self {
        Self::Tlv(error)
    }
}
