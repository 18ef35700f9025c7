//! PIN/PUK/pairing-password generation and wire encoding for INIT

use base64::prelude::*;
use bytes::{BufMut, Bytes, BytesMut};
use rand::{Rng, RngCore};
use zeroize::Zeroize;

use crate::{
    crypto::{generate_pairing_token, PairingToken},
    AppletVersion,
};

const MAX_PUK_NUMBER: u64 = 999_999_999_999;
const MAX_PIN_NUMBER: u64 = 999_999;
const DEFAULT_MAX_PIN_ATTEMPTS: u8 = 3;
const DEFAULT_MAX_PUK_ATTEMPTS: u8 = 5;
const PIN_LENGTH: usize = 6;
const PUK_LENGTH: usize = 12;

/// The secret material INIT provisions onto a fresh card: PIN, PUK, and
/// pairing password (plus, from v3.1 onward, attempt limits and a duress PIN).
///
/// Zeroized on drop — this value must never outlive the INIT call that consumes it.
#[derive(Debug, Clone, Zeroize)]
#[zeroize(drop)]
pub struct Secrets {
    pin: String,
    puk: String,
    pairing_pass: String,
    pairing_token: PairingToken,
    #[zeroize(skip)]
    version: AppletVersion,
    max_pin_attempts: u8,
    max_puk_attempts: u8,
    duress_pin: Option<String>,
}

impl Secrets {
    /// Caller-supplied PIN/PUK/pairing password, legacy (pre-3.1) wire format
    pub fn new(pin: &str, puk: &str, pairing_pass: &str) -> Self {
        assert_eq!(pin.len(), PIN_LENGTH, "PIN must be exactly {} digits", PIN_LENGTH);
        assert_eq!(puk.len(), PUK_LENGTH, "PUK must be exactly {} digits", PUK_LENGTH);

        Self {
            pin: pin.to_string(),
            puk: puk.to_string(),
            pairing_pass: pairing_pass.to_string(),
            pairing_token: generate_pairing_token(pairing_pass),
            version: AppletVersion::Legacy,
            max_pin_attempts: DEFAULT_MAX_PIN_ATTEMPTS,
            max_puk_attempts: DEFAULT_MAX_PUK_ATTEMPTS,
            duress_pin: None,
        }
    }

    /// Caller-supplied secrets with v3.1+ extensions: attempt limits and an optional duress PIN
    pub fn new_v3_1(pin: &str, puk: &str, pairing_pass: &str, max_pin_attempts: u8, max_puk_attempts: u8, duress_pin: Option<String>) -> Self {
        assert_eq!(pin.len(), PIN_LENGTH, "PIN must be exactly {} digits", PIN_LENGTH);
        assert_eq!(puk.len(), PUK_LENGTH, "PUK must be exactly {} digits", PUK_LENGTH);

        if let Some(duress) = &duress_pin {
            assert_eq!(duress.len(), PIN_LENGTH, "Duress PIN must be exactly {} digits", PIN_LENGTH);
        }

        Self {
            pin: pin.to_string(),
            puk: puk.to_string(),
            pairing_pass: pairing_pass.to_string(),
            pairing_token: generate_pairing_token(pairing_pass),
            version: AppletVersion::V3_1,
            max_pin_attempts,
            max_puk_attempts,
            duress_pin,
        }
    }

    /// Randomly generated PIN, PUK, and pairing password, legacy wire format
    pub fn generate() -> Self {
        let pairing_pass = generate_pairing_pass();

        let mut rng = rand::rng();
        let puk = rng.random_range(0..MAX_PUK_NUMBER);
        let pin = rng.random_range(0..MAX_PIN_NUMBER);

        Self {
            pin: format!("{:06}", pin),
            puk: format!("{:012}", puk),
            pairing_pass: pairing_pass.clone(),
            pairing_token: generate_pairing_token(&pairing_pass),
            version: AppletVersion::Legacy,
            max_pin_attempts: DEFAULT_MAX_PIN_ATTEMPTS,
            max_puk_attempts: DEFAULT_MAX_PUK_ATTEMPTS,
            duress_pin: None,
        }
    }

    /// Randomly generated secrets with v3.1+ extensions
    pub fn generate_v3_1(max_pin_attempts: u8, max_puk_attempts: u8, with_duress_pin: bool) -> Self {
        let pairing_pass = generate_pairing_pass();

        let mut rng = rand::rng();
        let puk = rng.random_range(0..MAX_PUK_NUMBER);
        let pin = rng.random_range(0..MAX_PIN_NUMBER);
        let puk_str = format!("{:012}", puk);
        let pin_str = format!("{:06}", pin);

        let duress_pin = if with_duress_pin {
            let duress = rng.random_range(0..MAX_PIN_NUMBER);
            Some(format!("{:06}", duress))
        } else {
            None
        };

        Self {
            pin: pin_str,
            puk: puk_str,
            pairing_pass: pairing_pass.clone(),
            pairing_token: generate_pairing_token(&pairing_pass),
            version: AppletVersion::V3_1,
            max_pin_attempts,
            max_puk_attempts,
            duress_pin,
        }
    }

    /// The PIN
    pub fn pin(&self) -> &str {
        &self.pin
    }

    /// The PUK
    pub fn puk(&self) -> &str {
        &self.puk
    }

    /// The pairing password (shared out of band with PAIR callers)
    pub fn pairing_pass(&self) -> &str {
        &self.pairing_pass
    }

    /// The PBKDF2-derived pairing token sent to the card
    pub fn pairing_token(&self) -> &PairingToken {
        &self.pairing_token
    }

    /// Configured max PIN attempts before the PIN identifier is blocked
    pub fn max_pin_attempts(&self) -> u8 {
        self.max_pin_attempts
    }

    /// Configured max PUK attempts before the card becomes unusable
    pub fn max_puk_attempts(&self) -> u8 {
        self.max_puk_attempts
    }

    /// The duress PIN, if set
    pub fn duress_pin(&self) -> Option<&str> {
        self.duress_pin.as_deref()
    }

    /// The applet generation these secrets are encoded for
    pub fn version(&self) -> AppletVersion {
        self.version
    }

    /// Encode these secrets to the wire format INIT expects
    pub fn to_bytes(&self) -> Bytes {
        let capacity = match self.version {
            AppletVersion::Legacy => PIN_LENGTH + PUK_LENGTH + std::mem::size_of::<PairingToken>(),
            AppletVersion::V3_1 => PIN_LENGTH + PUK_LENGTH + std::mem::size_of::<PairingToken>() + 1 + 1 + PIN_LENGTH,
        };

        let mut buffer = BytesMut::with_capacity(capacity);

        debug_assert_eq!(self.pin.len(), PIN_LENGTH);
        buffer.put_slice(self.pin.as_bytes());

        debug_assert_eq!(self.puk.len(), PUK_LENGTH);
        buffer.put_slice(self.puk.as_bytes());

        debug_assert_eq!(self.pairing_token.len(), std::mem::size_of::<PairingToken>());
        buffer.put_slice(&self.pairing_token);

        if self.version == AppletVersion::V3_1 {
            buffer.put_u8(self.max_pin_attempts);
            buffer.put_u8(self.max_puk_attempts);

            if let Some(duress) = &self.duress_pin {
                debug_assert_eq!(duress.len(), PIN_LENGTH);
                buffer.put_slice(duress.as_bytes());
            } else {
                buffer.put_slice(&self.puk.as_bytes()[0..PIN_LENGTH]);
            }
        }

        debug_assert_eq!(buffer.len(), capacity);

        buffer.freeze()
    }
}

fn generate_pairing_pass() -> String {
    let mut r = vec![0u8; 12];
    rand::rng().fill_bytes(&mut r);
    BASE64_URL_SAFE_NO_PAD.encode(&r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_new() {
        let secrets = Secrets::new("123456", "123456789012", "test-pairing-pass");
        assert_eq!(secrets.pin(), "123456");
        assert_eq!(secrets.puk(), "123456789012");
        assert_eq!(secrets.pairing_pass(), "test-pairing-pass");
        assert!(!secrets.pairing_token().is_empty());
        assert_eq!(secrets.version(), AppletVersion::Legacy);
    }

    #[test]
    #[should_panic(expected = "PIN must be exactly 6 digits")]
    fn test_invalid_pin_length() {
        Secrets::new("12345", "123456789012", "test-pairing-pass");
    }

    #[test]
    #[should_panic(expected = "PUK must be exactly 12 digits")]
    fn test_invalid_puk_length() {
        Secrets::new("123456", "12345678901", "test-pairing-pass");
    }

    #[test]
    fn test_secrets_new_v3_1() {
        let secrets = Secrets::new_v3_1("123456", "123456789012", "test-pairing-pass", 5, 7, Some("654321".to_string()));
        assert_eq!(secrets.max_pin_attempts(), 5);
        assert_eq!(secrets.max_puk_attempts(), 7);
        assert_eq!(secrets.duress_pin(), Some("654321"));
    }

    #[test]
    fn test_secrets_generate() {
        let secrets = Secrets::generate();
        assert_eq!(secrets.pin().len(), PIN_LENGTH);
        assert!(secrets.pin().parse::<u64>().is_ok());
        assert_eq!(secrets.puk().len(), PUK_LENGTH);
        assert!(secrets.puk().parse::<u64>().is_ok());
        assert_eq!(secrets.version(), AppletVersion::Legacy);
    }

    #[test]
    fn test_to_bytes_legacy() {
        let secrets = Secrets::new("123456", "123456789012", "test-pairing-pass");
        let bytes = secrets.to_bytes();

        let expected_length = PIN_LENGTH + PUK_LENGTH + std::mem::size_of::<PairingToken>();
        assert_eq!(bytes.len(), expected_length);
        assert_eq!(&bytes[0..PIN_LENGTH], b"123456");
        assert_eq!(&bytes[PIN_LENGTH..(PIN_LENGTH + PUK_LENGTH)], b"123456789012");
    }

    #[test]
    fn test_to_bytes_v3_1_default_duress() {
        let secrets = Secrets::new_v3_1("123456", "123456789012", "test-pairing-pass", 5, 7, None);
        let bytes = secrets.to_bytes();

        let duress_start = PIN_LENGTH + PUK_LENGTH + std::mem::size_of::<PairingToken>() + 2;
        let duress_end = duress_start + PIN_LENGTH;

        assert_eq!(&bytes[duress_start..duress_end], b"123456");
    }
}
