use zeroize::Zeroize;

/// The result of a successful PAIR exchange: the shared pairing key and the
/// slot index the card assigned it. Callers persist this to reconnect to an
/// established pairing without repeating PAIR.
#[derive(Debug, Clone, Zeroize)]
pub struct PairingInfo {
    /// 32-byte pairing key shared with the card
    pub key: [u8; 32],
    /// Pairing slot index assigned by the card
    #[zeroize(skip)]
    pub index: u8,
}
