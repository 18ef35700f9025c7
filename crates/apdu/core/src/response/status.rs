//! ISO/IEC 7816-4 status word (SW1/SW2)

/// A two-byte status word returned at the end of every APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte
    pub sw1: u8,
    /// Second status byte
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// First status byte
    pub const fn sw1(&self) -> u8 {
        self.sw1
    }

    /// Second status byte
    pub const fn sw2(&self) -> u8 {
        self.sw2
    }

    /// Combine into a single 16-bit value (sw1 << 8 | sw2)
    pub const fn to_u16(self) -> u16 {
        ((self.sw1 as u16) << 8) | self.sw2 as u16
    }

    /// Whether this status word indicates normal processing (0x9000)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Whether this status word requests a GET RESPONSE for `sw2` more bytes (0x61XX)
    pub const fn has_more_data(&self) -> bool {
        self.sw1 == 0x61
    }

    /// Whether this status word indicates the wrong Le was used, with the correct
    /// length available in `sw2` (0x6CXX)
    pub const fn is_wrong_length(&self) -> bool {
        self.sw1 == 0x6C
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from((sw1, sw2): (u8, u8)) -> Self {
        Self::new(sw1, sw2)
    }
}

impl core::fmt::Display for StatusWord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02X}{:02X}", self.sw1, self.sw2)
    }
}

/// Status word for normal processing
pub const SW_NO_ERROR: StatusWord = StatusWord::new(0x90, 0x00);
