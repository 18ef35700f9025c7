//! Fixed protocol constants: applet identifiers and TLV tag values

/// Base 8-byte Keycard applet identifier. A concrete instance AID appends a
/// one-byte instance index (see [`crate::keycard_instance_aid`]); the card's
/// default/primary instance uses index `1`.
pub const KEYCARD_AID: &[u8] = b"\xA0\x00\x00\x08\x04\x00\x01\x01";

/// NDEF/cash applet identifier, selected when NDEF capability is present
pub const CASHCARD_AID: &[u8] = b"\xA0\x00\x00\x08\x04\x00\x01\x02";

/// TLV tag values used throughout response parsing
pub mod tags {
    /// SIGN/IDENT response: signature template
    pub const TEMPLATE_SIGNATURE: u8 = 0xA0;
    /// EXPORT KEY response: keypair template
    pub const TEMPLATE_KEYPAIR: u8 = 0xA1;
    /// GET STATUS (application) response: application status template
    pub const TEMPLATE_APPLICATION_STATUS: u8 = 0xA3;
    /// SELECT response: application info template
    pub const TEMPLATE_APPLICATION_INFO: u8 = 0xA4;
    /// Instance UID, 16 bytes
    pub const INSTANCE_UID: u8 = 0x8F;
    /// Uncompressed secp256k1 public key, 65 bytes
    pub const ECC_PUBLIC_KEY: u8 = 0x80;
    /// Raw secp256k1 private key scalar, 32 bytes
    pub const ECC_PRIVATE_KEY: u8 = 0x81;
    /// BIP32 chain code, 32 bytes
    pub const CHAIN_CODE: u8 = 0x82;
    /// Generic primitive integer/byte value (version, remaining slots, signature components)
    pub const OTHER: u8 = 0x02;
    /// Key UID: SHA-256 of the master public key, 32 bytes, empty if no key loaded
    pub const KEY_UID: u8 = 0x8E;
    /// Capabilities bitmask, 1 byte
    pub const CAPABILITIES: u8 = 0x8D;
    /// Certificate, used by IDENT responses on some applet versions
    pub const CERTIFICATE: u8 = 0x8A;
    /// ECDSA signature template, nested inside [`TEMPLATE_SIGNATURE`]
    pub const ECDSA_SIGNATURE: u8 = 0x30;
    /// Boolean flag inside application status: key initialized
    pub const KEY_INITIALIZED: u8 = 0x01;
}

/// Status words the card's applet returns, beyond plain success
pub mod status {
    use apdu_core::StatusWord;

    /// Normal processing
    pub const SW_NO_ERROR: StatusWord = StatusWord::new(0x90, 0x00);
    /// Incorrect P1/P2
    pub const SW_INCORRECT_P1P2: StatusWord = StatusWord::new(0x6A, 0x86);
    /// Wrong P1/P2 (used where the card distinguishes this from [`SW_INCORRECT_P1P2`])
    pub const SW_WRONG_P1P2: StatusWord = StatusWord::new(0x6B, 0x00);
    /// Wrong data in the command
    pub const SW_WRONG_DATA: StatusWord = StatusWord::new(0x6A, 0x80);
    /// Referenced data not found
    pub const SW_REFERENCED_DATA_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x88);
    /// No space left for a new pairing slot
    pub const SW_FILE_FULL: StatusWord = StatusWord::new(0x6A, 0x84);
    /// Security condition not satisfied (wrong MAC, channel not open, etc.)
    pub const SW_SECURITY_STATUS_NOT_SATISFIED: StatusWord = StatusWord::new(0x69, 0x82);
    /// Conditions of use not satisfied (precondition not met, e.g. no key loaded)
    pub const SW_CONDITIONS_NOT_SATISFIED: StatusWord = StatusWord::new(0x69, 0x85);
    /// Instruction not supported (used by INIT to signal "already initialized")
    pub const SW_INS_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6D, 0x00);
    /// First nibble of a wrong-PIN/PUK status; the low nibble of SW2 carries remaining attempts
    pub const SW_WRONG_PIN_PUK_PREFIX: u8 = 0x63;
    /// PIN/PUK identifier blocked (0 attempts remain)
    pub const SW_BLOCKED: StatusWord = StatusWord::new(0x63, 0xC0);
    /// Secure-channel MAC/authentication failure. Some carriers return this spuriously
    /// on the very first encrypted command after OPEN SECURE CHANNEL, before the card's
    /// crypto state has caught up; see the one-shot retry in `secure_channel`.
    pub const SW_MAC_ERROR: StatusWord = StatusWord::new(0x6F, 0x05);
}
