//! Constants shared by SELECT and, by extension, any applet built on top of
//! this crate (Keycard includes)

/// Command classes
pub mod cla {
    /// Plain ISO 7816 command class
    pub const ISO7816: u8 = 0x00;
    /// GlobalPlatform command class
    pub const GP: u8 = 0x80;
}

/// Instruction codes
pub mod ins {
    /// SELECT
    pub const SELECT: u8 = 0xA4;
    /// GET RESPONSE
    pub const GET_RESPONSE: u8 = 0xC0;
}

/// SELECT command P1 values
pub mod select_p1 {
    /// Select by DF name (AID)
    pub const BY_NAME: u8 = 0x04;
}

/// Tags commonly found in FCI/TLV payloads
pub mod tags {
    /// Application label, nested inside FCI
    pub const APPLICATION_LABEL: u8 = 0x50;
}

/// Status words shared across SELECT and applet-specific commands
pub mod status {
    use apdu_core::StatusWord;

    /// Normal processing
    pub const SW_NO_ERROR: StatusWord = StatusWord::new(0x90, 0x00);
    /// File or application not found
    pub const SW_FILE_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x82);
    /// Referenced data (e.g. a TLV tag) not found
    pub const SW_REFERENCED_DATA_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x88);
    /// Wrong data in the command
    pub const SW_WRONG_DATA: StatusWord = StatusWord::new(0x6A, 0x80);
    /// Wrong length (Lc/Le)
    pub const SW_WRONG_LENGTH: StatusWord = StatusWord::new(0x67, 0x00);
    /// Incorrect P1/P2
    pub const SW_INCORRECT_P1P2: StatusWord = StatusWord::new(0x6A, 0x86);
    /// Wrong P1/P2 (some cards use 0x6B00 instead of 0x6A86)
    pub const SW_WRONG_P1P2: StatusWord = StatusWord::new(0x6B, 0x00);
    /// Security condition not satisfied
    pub const SW_SECURITY_STATUS_NOT_SATISFIED: StatusWord = StatusWord::new(0x69, 0x82);
    /// Conditions of use not satisfied
    pub const SW_CONDITIONS_NOT_SATISFIED: StatusWord = StatusWord::new(0x69, 0x85);
    /// Instruction code not supported or invalid
    pub const SW_INS_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6D, 0x00);
    /// Not enough memory space to store the requested data
    pub const SW_FILE_FULL: StatusWord = StatusWord::new(0x6A, 0x84);
}
