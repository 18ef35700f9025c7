//! The typed, top-level Keycard client
//!
//! [`Keycard`] wraps a [`CardExecutor`] with everything a caller otherwise has
//! to juggle by hand: the cached FCI from SELECT, capability gating, pairing
//! state, and the full command surface. Talking to a fresh card looks like
//! `Keycard::connect` → `initialize` → `pair` → `open_secure_channel` →
//! `verify_pin` → whatever key/signing operations are needed.

use k256::{PublicKey, SecretKey};
use rand_v8::{thread_rng, RngCore};
use sha2::{Digest, Sha256};
use tracing::debug;

use apdu_core::prelude::*;
use apdu_globalplatform::commands::select::SelectCommand;

use crate::commands::*;
use crate::crypto::{calculate_cryptogram, generate_pairing_token, Challenge};
use crate::path::{DeriveMode, KeyPath};
use crate::secure_channel::KeycardSecureChannelProvider;
use crate::types::{ApplicationInfo, Capabilities, Capability, ExportedKey, PairingInfo, Signature};
use crate::{Error, Result, Secrets};

/// A connected Keycard: an executor plus everything SELECT and pairing establish about it
pub struct Keycard<T: CardTransport> {
    executor: CardExecutor<T>,
    application_info: Option<ApplicationInfo>,
    capabilities: Capabilities,
    pairing_info: Option<PairingInfo>,
    card_public_key: Option<PublicKey>,
    last_error: Option<String>,
}

impl<T: CardTransport> Keycard<T> {
    /// Connect over `transport` and SELECT the Keycard applet at its default AID
    pub fn connect(transport: T) -> Result<Self> {
        let mut keycard = Self {
            executor: CardExecutor::new_with_defaults(transport),
            application_info: None,
            capabilities: Capabilities::empty(),
            pairing_info: None,
            card_public_key: None,
            last_error: None,
        };
        keycard.select()?;
        Ok(keycard)
    }

    /// Connect and restore a pairing established in an earlier session, so
    /// [`Self::open_secure_channel`] can run without repeating [`Self::pair`]
    pub fn connect_with_pairing(transport: T, pairing_info: PairingInfo) -> Result<Self> {
        let mut keycard = Self::connect(transport)?;
        keycard.pairing_info = Some(pairing_info);
        Ok(keycard)
    }

    /// Borrow the underlying executor
    pub fn executor(&self) -> &CardExecutor<T> {
        &self.executor
    }

    /// Mutably borrow the underlying executor
    pub fn executor_mut(&mut self) -> &mut CardExecutor<T> {
        &mut self.executor
    }

    /// The application info cached from the last SELECT, if the card was initialized
    pub fn application_info(&self) -> Option<&ApplicationInfo> {
        self.application_info.as_ref()
    }

    /// The capabilities this applet advertised at SELECT time
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// The pairing currently held, if any
    pub fn pairing_info(&self) -> Option<&PairingInfo> {
        self.pairing_info.as_ref()
    }

    /// Restore a pairing established in an earlier session
    pub fn set_pairing_info(&mut self, pairing_info: PairingInfo) {
        self.pairing_info = Some(pairing_info);
    }

    /// Whether a secure channel is currently established
    pub fn is_secure_channel_open(&self) -> bool {
        self.executor.security_level().satisfies(SecurityLevel::mac_protected())
    }

    /// A human-readable description of the last command failure, updated on every error.
    /// The typed [`Error`] returned from each call remains authoritative; this exists
    /// purely to support logging without re-deriving a message from the typed error.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Execute `command`, recording a human-readable description in [`Self::last_error`] on failure
    fn run<C: ApduCommand>(&mut self, command: &C) -> Result<C::Success>
    where
        C::Error: From<apdu_core::ExecutionError>,
        Error: From<C::Error>,
    {
        match self.executor.execute(command) {
            Ok(value) => Ok(value),
            Err(e) => {
                let error = Error::from(e);
                self.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// SELECT the Keycard applet, refreshing cached application info and capabilities
    pub fn select(&mut self) -> Result<Option<ApplicationInfo>> {
        let cmd = SelectCommand::by_aid(crate::constants::KEYCARD_AID.to_vec());
        let response = self.run(&cmd)?;
        let parsed = ParsedSelectOk::try_from(response)?;

        match &parsed {
            ParsedSelectOk::ApplicationInfo(info) => {
                self.capabilities = info.capabilities;
                self.card_public_key = info.public_key.clone();
                self.application_info = Some(info.clone());
            }
            ParsedSelectOk::PreInitialized(key) => {
                self.card_public_key = key.clone();
                self.capabilities = Capabilities::new(&[Capability::SecureChannel, Capability::CredentialsManagement]);
                self.application_info = None;
            }
        }

        Ok(self.application_info.clone())
    }

    /// Provision `secrets` onto a factory-fresh card. Erases any pairing info this
    /// client was holding, since a newly initialized card has no pairings yet.
    pub fn initialize(&mut self, secrets: &Secrets) -> Result<()> {
        self.capabilities.require_capability(Capability::CredentialsManagement)?;

        let card_public_key = self.card_public_key.as_ref().ok_or_else(|| Error::Message("card public key required for INIT".to_string()))?;
        let cmd = InitCommand::with_card_pubkey_and_secrets(card_public_key, secrets);
        self.run(&cmd)?;

        self.pairing_info = None;
        self.select()?;
        Ok(())
    }

    /// Wipe all data on the card, including its secure channel key, PIN/PUK, and pairings
    pub fn factory_reset(&mut self) -> Result<()> {
        let cmd = FactoryResetCommand::reset();
        self.run(&cmd)?;

        self.pairing_info = None;
        self.card_public_key = None;
        self.application_info = None;
        self.select()?;
        Ok(())
    }

    /// Establish a pairing with `pairing_password`, storing the resulting [`PairingInfo`]
    pub fn pair(&mut self, pairing_password: &str) -> Result<PairingInfo> {
        self.capabilities.require_capability(Capability::SecureChannel)?;

        let mut challenge = Challenge::default();
        thread_rng().fill_bytes(&mut challenge);

        let cmd = PairCommand::with_first_stage(&challenge);
        let (card_cryptogram, card_challenge) = match self.run(&cmd)? {
            PairOk::FirstStageSuccess { cryptogram, challenge } => (cryptogram, challenge),
            PairOk::FinalStageSuccess { .. } => return Err(Error::Message("PAIR returned a final-stage response to a first-stage request".to_string())),
        };

        let shared_secret = generate_pairing_token(pairing_password);
        if card_cryptogram != calculate_cryptogram(&shared_secret, &challenge) {
            return Err(Error::PairingFailed);
        }

        let client_cryptogram = calculate_cryptogram(&shared_secret, &card_challenge);
        let cmd = PairCommand::with_final_stage(&client_cryptogram);
        let (index, salt) = match self.run(&cmd)? {
            PairOk::FinalStageSuccess { pairing_index, salt } => (pairing_index, salt),
            PairOk::FirstStageSuccess { .. } => return Err(Error::Message("PAIR returned a first-stage response to a final-stage request".to_string())),
        };

        let mut hasher = Sha256::new();
        Digest::update(&mut hasher, shared_secret);
        Digest::update(&mut hasher, salt);
        let key: [u8; 32] = hasher.finalize().into();

        debug!(pairing_index = index, "pairing established");

        let pairing_info = PairingInfo { key, index };
        self.pairing_info = Some(pairing_info.clone());
        Ok(pairing_info)
    }

    /// Open a secure channel against the held pairing, running OPEN SECURE CHANNEL
    /// followed by MUTUALLY AUTHENTICATE
    pub fn open_secure_channel(&mut self) -> Result<()> {
        self.capabilities.require_capability(Capability::SecureChannel)?;

        let pairing_info = self.pairing_info.clone().ok_or(Error::PairingRequired)?;
        let card_public_key = self.card_public_key.clone().ok_or_else(|| Error::Message("no card public key available".to_string()))?;

        let provider = KeycardSecureChannelProvider::new(pairing_info, card_public_key);
        self.executor.open_secure_channel(&provider).map_err(apdu_core::Error::from)?;
        Ok(())
    }

    /// Pair (if not already paired), open the secure channel, and verify the PIN
    pub fn establish_session(&mut self, pairing_password: &str, pin: &str) -> Result<()> {
        if self.pairing_info.is_none() {
            self.pair(pairing_password)?;
        }
        self.open_secure_channel()?;
        self.verify_pin(pin)?;
        Ok(())
    }

    /// Verify the card's PIN, raising the security level to full access
    pub fn verify_pin(&mut self, pin: &str) -> Result<()> {
        self.capabilities.require_capability(Capability::CredentialsManagement)?;
        let cmd = VerifyPinCommand::with_pin(pin)?;
        self.run(&cmd)?;
        Ok(())
    }

    /// Change the PIN, PUK, or pairing secret
    pub fn change_pin(&mut self, new_pin: &str) -> Result<()> {
        self.capabilities.require_capability(Capability::CredentialsManagement)?;
        let cmd = ChangePinCommand::with_new_pin(new_pin)?;
        self.run(&cmd)?;
        Ok(())
    }

    /// Change the PUK
    pub fn change_puk(&mut self, new_puk: &str) -> Result<()> {
        self.capabilities.require_capability(Capability::CredentialsManagement)?;
        let cmd = ChangePinCommand::with_new_puk(new_puk)?;
        self.run(&cmd)?;
        Ok(())
    }

    /// Change the pairing secret used by future PAIR calls
    pub fn change_pairing_secret(&mut self, new_secret: &str) -> Result<()> {
        self.capabilities.require_capability(Capability::CredentialsManagement)?;
        let cmd = ChangePinCommand::with_new_pairing_secret(new_secret);
        self.run(&cmd)?;
        Ok(())
    }

    /// Unblock a blocked PIN using the PUK, setting `new_pin` once unblocked
    pub fn unblock_pin(&mut self, puk: &str, new_pin: &str) -> Result<()> {
        self.capabilities.require_capability(Capability::CredentialsManagement)?;
        let cmd = UnblockPinCommand::with_puk_and_new_pin(puk, new_pin)?;
        self.run(&cmd)?;
        Ok(())
    }

    /// Report the application's PIN/PUK/key-initialization status
    pub fn get_status(&mut self) -> Result<crate::types::ApplicationStatus> {
        let cmd = GetStatusCommand::application();
        match self.run(&cmd)? {
            GetStatusOk::ApplicationStatus { status } => Ok(status),
            GetStatusOk::KeyPathStatus { .. } => Err(Error::Message("GET STATUS returned a key path for an application status request".to_string())),
        }
    }

    /// Report the current BIP32 key path's big-endian `u32` components
    pub fn get_key_path(&mut self) -> Result<Vec<u32>> {
        let cmd = GetStatusCommand::key_path();
        match self.run(&cmd)? {
            GetStatusOk::KeyPathStatus { components } => Ok(components),
            GetStatusOk::ApplicationStatus { .. } => Err(Error::Message("GET STATUS returned an application status for a key path request".to_string())),
        }
    }

    /// Generate a fresh random master key on the card
    pub fn generate_key(&mut self) -> Result<[u8; 32]> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = GenerateKeyCommand::create();
        let GenerateKeyOk::Success { key_uid } = self.run(&cmd)?;
        Ok(key_uid)
    }

    /// Export the card's current key without deriving
    pub fn export_key(&mut self, what: ExportOption) -> Result<ExportedKey> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = ExportKeyCommand::from_current(what)?;
        let ExportKeyOk::Success { keypair } = self.run(&cmd)?;
        ExportedKey::try_from_keypair(keypair, what)
    }

    /// Export a key derived to `key_path`, optionally making it the card's new current key
    pub fn export_key_with_path(&mut self, what: ExportOption, key_path: &KeyPath, derive_mode: Option<DeriveMode>) -> Result<ExportedKey> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = ExportKeyCommand::with(what, key_path, derive_mode)?;
        let ExportKeyOk::Success { keypair } = self.run(&cmd)?;
        ExportedKey::try_from_keypair(keypair, what)
    }

    /// Change the card's current BIP32 key path without exporting anything
    pub fn derive_key(&mut self, key_path: &KeyPath, derive_mode: Option<DeriveMode>) -> Result<()> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = DeriveKeyCommand::with(key_path, derive_mode)?;
        self.run(&cmd)?;
        Ok(())
    }

    /// Sign a 32-byte hash, deriving to `key_path` first
    pub fn sign(&mut self, data: &[u8; 32], key_path: &KeyPath, derive_mode: Option<DeriveMode>) -> Result<Signature> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = SignCommand::with(data, key_path, derive_mode)?;
        let SignOk::Success { signature } = self.run(&cmd)?;
        Ok(signature)
    }

    /// Sign a 32-byte hash using the card's configured pinless path, without a verified PIN
    pub fn sign_pinless(&mut self, data: &[u8; 32]) -> Result<Signature> {
        let cmd = SignCommand::with_pinless(data);
        let SignOk::Success { signature } = self.run(&cmd)?;
        Ok(signature)
    }

    /// Designate the BIP32 path SIGN may use without a verified PIN. An empty
    /// slice clears the pinless path.
    pub fn set_pinless_path(&mut self, components: &[u32]) -> Result<()> {
        let cmd = SetPinlessPathCommand::with_path(components);
        self.run(&cmd)?;
        Ok(())
    }

    /// Generate a BIP39 mnemonic of `words` words (12, 15, 18, 21, or 24)
    pub fn generate_mnemonic<L: coins_bip39::Wordlist>(&mut self, words: u8) -> Result<coins_bip39::Mnemonic<L>> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = GenerateMnemonicCommand::with_words(words)?;
        let response = self.run(&cmd)?;
        response.to_phrase()
    }

    /// Prove possession of the card's identity key by signing `challenge` (or a random one)
    pub fn ident(&mut self, challenge: Option<&[u8; 32]>) -> Result<Signature> {
        let cmd = match challenge {
            Some(c) => IdentCommand::with_challenge(c),
            None => IdentCommand::with_random_challenge(),
        };
        let IdentOk::Success { signature } = self.run(&cmd)?;
        Ok(signature)
    }

    /// Load an ECC secp256k1 keypair, overwriting any existing key
    pub fn load_key(&mut self, public_key: Option<PublicKey>, private_key: SecretKey) -> Result<[u8; 32]> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = LoadKeyCommand::load_keypair(public_key, private_key)?;
        let LoadKeyOk::Success { key_uid } = self.run(&cmd)?;
        Ok(key_uid)
    }

    /// Load an extended ECC secp256k1 keypair (with chain code), overwriting any existing key
    pub fn load_extended_key(&mut self, public_key: PublicKey, private_key: SecretKey, chain_code: [u8; 32]) -> Result<[u8; 32]> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = LoadKeyCommand::load_extended_keypair(public_key, private_key, chain_code)?;
        let LoadKeyOk::Success { key_uid } = self.run(&cmd)?;
        Ok(key_uid)
    }

    /// Load a BIP39 seed, overwriting any existing key
    pub fn load_seed(&mut self, seed: &[u8; 64]) -> Result<[u8; 32]> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = LoadKeyCommand::load_bip39_seed(seed);
        let LoadKeyOk::Success { key_uid } = self.run(&cmd)?;
        Ok(key_uid)
    }

    /// Wipe the card's current key, leaving PIN/PUK/pairing state intact
    pub fn remove_key(&mut self) -> Result<()> {
        self.capabilities.require_capability(Capability::KeyManagement)?;
        let cmd = RemoveKeyCommand::remove();
        self.run(&cmd)?;
        Ok(())
    }

    /// Release pairing slot `index`. Clears this client's own pairing info if it
    /// was the slot released.
    pub fn unpair(&mut self, index: u8) -> Result<()> {
        self.capabilities.require_capability(Capability::SecureChannel)?;
        let cmd = UnpairCommand::with_index(index)?;
        self.run(&cmd)?;

        if let Some(pairing_info) = &self.pairing_info {
            if pairing_info.index == index {
                self.pairing_info = None;
            }
        }
        Ok(())
    }

    /// Write `data` to one of the card's persistent records
    pub fn store_data(&mut self, record: PersistentRecord, data: &[u8]) -> Result<()> {
        if record == PersistentRecord::Ndef {
            self.capabilities.require_capability(Capability::Ndef)?;
        }
        let cmd = StoreDataCommand::put(record, data);
        self.run(&cmd)?;
        Ok(())
    }

    /// Read one of the card's persistent records
    pub fn get_data(&mut self, record: PersistentRecord) -> Result<Vec<u8>> {
        if record == PersistentRecord::Ndef {
            self.capabilities.require_capability(Capability::Ndef)?;
        }
        let cmd = GetDataCommand::get(record);
        let GetDataOk::Success { data } = self.run(&cmd)?;
        Ok(data)
    }
}
