//! INIT: provisions PIN/PUK/pairing password onto a freshly pre-initialized card

use apdu_macros::apdu_pair;
use bytes::BytesMut;
use k256::{PublicKey, SecretKey};
use rand_v8::thread_rng;

use crate::constants::status::*;
use crate::crypto::{generate_ecdh_shared_secret, one_shot_encrypt};
use crate::secrets::Secrets;

apdu_pair! {
    /// INIT command
    pub struct Init {
        command {
            cla: 0x00,
            ins: 0xFD,
            required_security_level: SecurityLevel::none(),

            builders {
                /// Provision `secrets` onto the card, one-shot-encrypted under a fresh ephemeral ECDH key pair
                pub fn with_card_pubkey_and_secrets(card_public_key: &PublicKey, secrets: &Secrets) -> Self {
                    let host_private_key = SecretKey::random(&mut thread_rng());
                    let shared_secret = generate_ecdh_shared_secret(&host_private_key, card_public_key);

                    let mut plaintext = BytesMut::from(secrets.to_bytes().as_ref());
                    let payload = one_shot_encrypt(&host_private_key.public_key(), &shared_secret, &mut plaintext);

                    Self::new(0x00, 0x00).with_data(payload)
                }

                /// Provision randomly generated v3.1 secrets (3 PIN attempts, 5 PUK attempts, duress PIN) onto the card
                pub fn with_card_pubkey(card_public_key: &PublicKey) -> Self {
                    Self::with_card_pubkey_and_secrets(card_public_key, &Secrets::generate_v3_1(3, 5, true))
                }
            }
        }

        response {
            ok {
                #[sw(SW_NO_ERROR)]
                Success
            }

            errors {
                /// The card is already initialized; INIT can only run once
                #[sw(SW_INS_NOT_SUPPORTED)]
                #[error("Card is already initialized")]
                AlreadyInitialized,

                #[sw(SW_WRONG_DATA)]
                #[error("Wrong data")]
                WrongData,
            }
        }
    }
}
