//! Keycard Secure Channel Protocol (SCP) primitives: key agreement, session
//! key derivation, the encrypt+MAC pipeline, and pairing token derivation.

use aes::cipher::{
    block_padding::Iso7816,
    typenum::{U16, U32},
    BlockDecryptMut, BlockEncryptMut, Iv, IvSizeUser, Key, KeyIvInit, KeySizeUser,
};
use bytes::{Bytes, BytesMut};
use cipher::block_padding::UnpadError;
use generic_array::GenericArray;
use k256::{ecdh::SharedSecret, elliptic_curve::sec1::ToEncodedPoint, PublicKey, SecretKey};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::{Digest, Sha256, Sha512};
use unicode_normalization::UnicodeNormalization;

/// Fixed salt for PBKDF2-derived pairing tokens, per the Keycard SCP specification
pub const PAIRING_TOKEN_SALT: &str = "Keycard Pairing Password Salt";

/// A PBKDF2-derived pairing password, shared out-of-band with PAIR
pub type PairingToken = GenericArray<u8, U32>;
/// SHA-256(pairing token || card challenge), proves possession of the pairing token
pub type Cryptogram = GenericArray<u8, U32>;
/// 32-byte random value returned by OPEN SECURE CHANNEL, input to session key derivation
pub type Challenge = GenericArray<u8, U32>;
pub(crate) type ApduMeta = GenericArray<u8, U16>;

type Encryptor = cbc::Encryptor<aes::Aes256>;
type Decryptor = cbc::Decryptor<aes::Aes256>;

/// Marker type binding the Keycard SCP's fixed AES-256-CBC key/IV sizes to `aes::cipher`'s generics
pub struct KeycardScp;

impl KeySizeUser for KeycardScp {
    type KeySize = U32;
}

impl IvSizeUser for KeycardScp {
    type IvSize = U16;
}

/// Derive the ECDH shared secret between a local private key and the card's public key
pub fn generate_ecdh_shared_secret(private: &SecretKey, public: &PublicKey) -> SharedSecret {
    k256::elliptic_curve::ecdh::diffie_hellman(private.to_nonzero_scalar(), public.as_affine())
}

/// Compute SHA-256(pairing_token || challenge), the cryptogram sent in PAIR step 1
pub(crate) fn calculate_cryptogram(shared_secret: &PairingToken, challenge: &Challenge) -> Cryptogram {
    let mut hasher = Sha256::new();
    hasher.update(shared_secret);
    hasher.update(challenge);
    hasher.finalize()
}

/// One-shot ECDH-encrypt `data` under an ephemeral key pair, used to protect
/// PIN/PUK/pairing-password secrets sent to INIT before any session exists.
///
/// Returns `len(pubkey) || pubkey || iv || ciphertext`, matching the wire
/// layout the card expects for INIT's encrypted payload.
pub(crate) fn one_shot_encrypt(public_key: &PublicKey, ecdh_shared_secret: &SharedSecret, data: &mut BytesMut) -> Bytes {
    let mut iv = Iv::<KeycardScp>::default();
    rand::rng().fill_bytes(&mut iv);

    let msg_len = prepare_padding(data);
    let ciphertext = Encryptor::new(ecdh_shared_secret.raw_secret_bytes(), &iv)
        .encrypt_padded_mut::<Iso7816>(data, msg_len)
        .expect("buffer padded to a block multiple");

    let pub_key_data = public_key.to_encoded_point(false);
    let mut buf = BytesMut::new();
    buf.extend(&[pub_key_data.len() as u8]);
    buf.extend(pub_key_data.as_bytes());
    buf.extend(&iv);
    buf.extend(ciphertext);

    buf.into()
}

/// Derive the encryption and MAC session keys:
/// `(K(E) | K(M)) = SHA-512(shared_secret || pairing_key || challenge)`
pub(crate) fn derive_session_keys(
    secret: SharedSecret,
    pairing_key: &Key<KeycardScp>,
    challenge: &Challenge,
) -> (Key<KeycardScp>, Key<KeycardScp>) {
    let mut hasher = Sha512::new();
    hasher.update(secret.raw_secret_bytes());
    hasher.update(pairing_key);
    hasher.update(challenge);
    let data = hasher.finalize();

    let enc_key = Key::<KeycardScp>::clone_from_slice(&data[0..32]);
    let mac_key = Key::<KeycardScp>::clone_from_slice(&data[32..64]);

    (enc_key, mac_key)
}

/// Encrypt `data` under `enc_key`/`iv` with ISO 7816 padding
pub(crate) fn encrypt_data(data: &mut BytesMut, enc_key: &Key<KeycardScp>, iv: &Iv<KeycardScp>) -> Bytes {
    let msg_len = prepare_padding(data);
    let encrypted = Encryptor::new(enc_key, iv)
        .encrypt_padded_mut::<Iso7816>(data, msg_len)
        .expect("buffer padded to a block multiple");
    Bytes::copy_from_slice(encrypted)
}

/// Decrypt `data` under `enc_key`/`iv`, expecting ISO 7816 padding
pub(crate) fn decrypt_data(data: &mut BytesMut, enc_key: &Key<KeycardScp>, iv: &Iv<KeycardScp>) -> Result<Bytes, UnpadError> {
    let decrypted = Decryptor::new(enc_key, iv).decrypt_padded_mut::<Iso7816>(data)?;
    Ok(BytesMut::from(decrypted).into())
}

/// Compute the next chained IV (the Keycard's notion of a MAC) over an APDU's
/// 16-byte meta header and its encrypted body.
///
/// `meta || data` is concatenated, ISO 7816-padded, and encrypted under a
/// zero IV; the result is the second-to-last ciphertext block. Because
/// `meta` is always exactly one block, this single encryption is equivalent
/// to separately encrypting `meta` and then `data` under the resulting
/// chained IV — the CBC state entering the second block is identical either way.
pub(crate) fn calculate_mac(meta: &ApduMeta, data: &Bytes, mac_key: &Key<KeycardScp>) -> Iv<KeycardScp> {
    let iv = Iv::<KeycardScp>::default();

    let mut buf = BytesMut::new();
    buf.extend_from_slice(meta.as_slice());
    buf.extend_from_slice(data);

    let msg_len = prepare_padding(&mut buf);
    let ciphertext = Encryptor::new(mac_key, &iv)
        .encrypt_padded_mut::<Iso7816>(&mut buf, msg_len)
        .expect("buffer padded to a block multiple");

    *Iv::<KeycardScp>::from_slice(&ciphertext[ciphertext.len() - 32..ciphertext.len() - 16])
}

/// Derive a pairing token from a user-supplied pairing password via
/// PBKDF2-HMAC-SHA256, 50,000 iterations, both inputs NFKD-normalized.
pub(crate) fn generate_pairing_token(password: &str) -> PairingToken {
    let password = password.nfkd().collect::<String>();
    let salt = PAIRING_TOKEN_SALT.nfkd().collect::<String>();

    let mut token = PairingToken::default();
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), 50_000, &mut token);

    token
}

/// Pad `data` in place to the next 16-byte boundary, returning its original length
fn prepare_padding(data: &mut BytesMut) -> usize {
    let len = data.len();
    data.resize(len + 16 - len % 16, 0);
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use k256::SecretKey;

    #[test]
    fn test_ecdh() {
        let pk1 = SecretKey::random(&mut rand_v8::thread_rng());
        let pk2 = SecretKey::random(&mut rand_v8::thread_rng());

        let pub1 = pk1.public_key();
        let pub2 = pk2.public_key();

        let shared_secret1 = generate_ecdh_shared_secret(&pk1, &pub2);
        let shared_secret2 = generate_ecdh_shared_secret(&pk2, &pub1);

        assert_eq!(shared_secret1.raw_secret_bytes(), shared_secret2.raw_secret_bytes());
    }

    #[test]
    fn test_derive_session_keys() {
        let secret = hex!("B410E816DA313545151807E25A830201FA389913A977066AB0C6DE0E8631E400");
        let pairing_key = hex!("544FF0B9B0737E4BFC4ECDFCE09F522B837051BBE4FFCEC494FA420D8525670E");
        let card_data = hex!(
            "1D7C033E75E10EC578AB538F69F1B02538571BA3831441F1649E3F24B5B3E3E71D7BC2D6A3D02FC8CB2FBB3FD8711BB5"
        );

        let shared_secret_key: Key<KeycardScp> = Key::<KeycardScp>::clone_from_slice(&secret);

        let challenge = Challenge::from_slice(&card_data[..32]);
        let iv = Iv::<KeycardScp>::from_slice(&card_data[32..48]);

        let (enc_key, mac_key) =
            derive_session_keys(SharedSecret::from(shared_secret_key), Key::<KeycardScp>::from_slice(&pairing_key), challenge);

        let expected_iv = hex!("1D7BC2D6A3D02FC8CB2FBB3FD8711BB5");
        let expected_enc_key = hex!("4FF496554C01BAE0A52323E3481B448C99D43982118D95C6918FE0354D224B90");
        let expected_mac_key = hex!("185811013138EA1B4FFDBBFA7343EF2DBE3E54C2C231885E867F792448AC2FE5");

        assert_eq!(&expected_iv[..], iv.as_slice());
        assert_eq!(&expected_enc_key[..], enc_key.as_slice());
        assert_eq!(&expected_mac_key[..], mac_key.as_slice());
    }

    #[test]
    fn test_encrypt_data() {
        let data = hex!("A8A686D0E3290459BCB36088A8FD04A76BF13283BE4B1EAE2E1248EF609F94DC");
        let enc_key = hex!("44D689AB4B18206F7EEE5439FB9A71A8A617406BA5259728D1EBC2786D24896C");
        let iv = hex!("9D3EF41EF1D221DD98A54AD5470F58F2");

        let encrypted_data = encrypt_data(
            &mut BytesMut::from(&data[..]),
            Key::<KeycardScp>::from_slice(&enc_key),
            Iv::<KeycardScp>::from_slice(&iv),
        );

        let expected = hex!(
            "FFB41FED5F71A2B57A6AE62D5D5ECD1C12616F6464637DD0A7A930920ACBA55867A7E12CC4F06B089AF34FF4ED4BAB08"
        );
        assert_eq!(&expected[..], encrypted_data);
    }

    #[test]
    fn test_decrypt_data() {
        let enc_data = hex!(
            "73B58B66372E3446E14A9F54BA59666DB432E9DD87D24F9B0525180EE52DA2106E0C70EED7CD42B5B313E4443D6AC90D"
        );
        let enc_key = hex!("D93D8E6164196D5C5B5F84F10E4B90D98F8D282ED145513ED666AA55C9871E79");
        let iv = hex!("F959B1220333046D3C47D61B1E1B891B");

        let mut enc_data = BytesMut::from(&enc_data[..]);
        let data = decrypt_data(
            &mut enc_data,
            Key::<KeycardScp>::from_slice(&enc_key),
            Iv::<KeycardScp>::from_slice(&iv),
        )
        .unwrap();

        let expected = hex!("2E21F9F2B2C2CC9038D518A5C6B490613E7955BD19D19108B77786986B7ABFE69000");
        assert_eq!(&expected[..], data);
    }

    #[test]
    fn test_generate_pairing_token_kat() {
        // Known-answer test: password "KeycardTest", fixed salt, 50_000 iterations.
        // Only the first 16 bytes are a published vector; the rest is deterministic
        // but unpublished, so we don't assert on it.
        let token = generate_pairing_token("KeycardTest");
        let expected_prefix: [u8; 16] = hex!("05C6CE68C78760FD529232A37484D942");
        assert_eq!(&expected_prefix[..], &token[..16]);
    }

    #[test]
    fn test_calculate_mac_empty_data_is_deterministic() {
        let meta = ApduMeta::clone_from_slice(&[0u8; 16]);
        let mac_key = Key::<KeycardScp>::clone_from_slice(&[0xDD; 32]);
        let mac = calculate_mac(&meta, &Bytes::new(), &mac_key);
        assert_eq!(mac.len(), 16);
        // Deterministic for fixed inputs: recomputing yields the same MAC.
        let mac2 = calculate_mac(&meta, &Bytes::new(), &mac_key);
        assert_eq!(mac, mac2);
    }
}
