//! Session state for an open Keycard secure channel: derived keys and the
//! running IV that chains every encrypted APDU to the one before it.

use apdu_core::prelude::*;
use bytes::Bytes;
use cipher::{Iv, Key};
use k256::{PublicKey, SecretKey};
use rand_v8::thread_rng;
use zeroize::Zeroize;

use crate::commands::{OpenSecureChannelCommand, OpenSecureChannelOk};
use crate::crypto::{calculate_mac, derive_session_keys, generate_ecdh_shared_secret, ApduMeta, KeycardScp};
use crate::types::PairingInfo;

/// The pair of session keys derived at OPEN SECURE CHANNEL time
#[derive(Debug, Clone, Zeroize)]
#[zeroize(drop)]
pub struct Keys {
    enc: Key<KeycardScp>,
    mac: Key<KeycardScp>,
}

impl Keys {
    fn new(enc: Key<KeycardScp>, mac: Key<KeycardScp>) -> Self {
        Self { enc, mac }
    }

    pub(crate) fn enc(&self) -> &Key<KeycardScp> {
        &self.enc
    }

    pub(crate) fn mac(&self) -> &Key<KeycardScp> {
        &self.mac
    }
}

/// An established secure channel session: derived keys plus the IV chain
#[derive(Clone)]
pub struct Session {
    keys: Keys,
    iv: Iv<KeycardScp>,
}

impl Session {
    /// Run the OPEN SECURE CHANNEL handshake over `transport` and derive session keys
    pub fn open(card_public_key: &PublicKey, pairing_info: &PairingInfo, transport: &mut dyn CardTransport<Error = apdu_core::TransportError>) -> crate::Result<Self> {
        let host_private_key = SecretKey::random(&mut thread_rng());
        let shared_secret = generate_ecdh_shared_secret(&host_private_key, card_public_key);

        let cmd = OpenSecureChannelCommand::with_pairing_index_and_pubkey(pairing_info.index, &host_private_key.public_key());

        let command_bytes = cmd.to_bytes();
        let response_bytes = transport.transmit_raw(&command_bytes).map_err(apdu_core::Error::from)?;
        let response = cmd.parse_response_raw(response_bytes)?;

        let OpenSecureChannelOk::Success { challenge, iv } = response;

        let pairing_key = Key::<KeycardScp>::clone_from_slice(&pairing_info.key);
        let (enc_key, mac_key) = derive_session_keys(shared_secret, &pairing_key, &challenge);

        Ok(Self {
            keys: Keys::new(enc_key, mac_key),
            iv,
        })
    }

    /// Build a session directly from already-derived key material (tests only)
    #[cfg(test)]
    pub(crate) fn from_raw(enc_key: &Key<KeycardScp>, mac_key: &Key<KeycardScp>, iv: &Iv<KeycardScp>) -> Self {
        Self {
            keys: Keys::new(*enc_key, *mac_key),
            iv: *iv,
        }
    }

    /// The derived session keys
    pub const fn keys(&self) -> &Keys {
        &self.keys
    }

    /// The current chained IV
    pub const fn iv(&self) -> &Iv<KeycardScp> {
        &self.iv
    }

    /// Advance the IV chain after transmitting or receiving an APDU
    pub(crate) fn update_iv(&mut self, meta: &ApduMeta, data: &Bytes) {
        self.iv = calculate_mac(meta, data, self.keys.mac());
    }
}
