//! Keycard APDU command/response pairs
//!
//! Each submodule defines one `apdu_pair!` (or, for SELECT, a thin wrapper
//! around [`apdu_globalplatform`]'s generic command) implementing
//! [`apdu_core::ApduCommand`]. CLA/INS assignments follow the card's wire
//! protocol table; see the crate's design notes for the one instruction
//! (GENERATE KEY) the table leaves unassigned.

mod derive_key;
mod export_key;
mod factory_reset;
mod generate_key;
mod generate_mnemonic;
mod get_data;
mod get_status;
mod ident;
mod init;
mod load_key;
mod mutually_authenticate;
mod open_secure_channel;
mod pair;
mod pin;
mod remove_key;
mod select;
mod set_pinless_path;
mod sign;
mod store_data;
mod unpair;

pub use derive_key::{DeriveKeyCommand, DeriveKeyError, DeriveKeyOk};
pub use export_key::{ExportKeyCommand, ExportKeyError, ExportKeyOk, ExportOption};
pub use factory_reset::{FactoryResetCommand, FactoryResetError, FactoryResetOk};
pub use generate_key::{GenerateKeyCommand, GenerateKeyError, GenerateKeyOk};
pub use generate_mnemonic::{GenerateMnemonicCommand, GenerateMnemonicError, GenerateMnemonicOk};
pub use get_data::{GetDataCommand, GetDataError, GetDataOk};
pub use get_status::{GetStatusCommand, GetStatusError, GetStatusOk};
pub use ident::{IdentCommand, IdentError, IdentOk};
pub use init::{InitCommand, InitError, InitOk};
pub use load_key::{LoadKeyCommand, LoadKeyError, LoadKeyOk};
pub use mutually_authenticate::{MutuallyAuthenticateCommand, MutuallyAuthenticateError, MutuallyAuthenticateOk};
pub use open_secure_channel::{OpenSecureChannelCommand, OpenSecureChannelError, OpenSecureChannelOk};
pub use pair::{PairCommand, PairError, PairOk};
pub use pin::{
    ChangePinCommand, ChangePinError, ChangePinOk, UnblockPinCommand, UnblockPinError, UnblockPinOk, VerifyPinCommand, VerifyPinError,
    VerifyPinOk,
};
pub use remove_key::{RemoveKeyCommand, RemoveKeyError, RemoveKeyOk};
pub use select::ParsedSelectOk;
pub use set_pinless_path::{SetPinlessPathCommand, SetPinlessPathError, SetPinlessPathOk};
pub use sign::{SignCommand, SignError, SignOk};
pub use store_data::{StoreDataCommand, StoreDataError, StoreDataOk};
pub use unpair::{UnpairCommand, UnpairError, UnpairOk};

/// CLA byte for every card-specific command except the small unauthenticated
/// set (SELECT, IDENTIFY, INIT, PAIR, OPEN SECURE CHANNEL, FACTORY RESET),
/// which instead use the plain ISO 7816 class `0x00`.
pub(crate) const CLA_GP: u8 = 0x80;

/// A slot STORE DATA/GET DATA can address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistentRecord {
    /// Arbitrary application data
    Public = 0x00,
    /// NDEF record
    Ndef = 0x01,
    /// Cash applet record
    Cashcard = 0x02,
}
