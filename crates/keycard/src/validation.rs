//! Input validation for caller-supplied PIN/PUK digits and pairing key material

/// Error produced when caller-supplied input fails validation
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The input was not the expected length
    #[error("input has incorrect length: expected {expected}, got {actual}")]
    IncorrectLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// The input contained invalid characters
    #[error("input contains invalid characters")]
    InvalidCharacters,

    /// The input was out of the allowed range
    #[error("input is out of allowed range: value {value}, min {min}, max {max}")]
    OutOfRange {
        /// The value that was out of range
        value: usize,
        /// Minimum allowed value
        min: usize,
        /// Maximum allowed value
        max: usize,
    },

    /// Generic validation error with a message
    #[error("{0}")]
    Message(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate that `pin` is exactly 6 ASCII digits
pub fn validate_pin(pin: &str) -> ValidationResult<String> {
    if pin.len() != 6 {
        return Err(ValidationError::IncorrectLength { expected: 6, actual: pin.len() });
    }
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(pin.to_string())
}

/// Validate that `puk` is exactly 12 ASCII digits
pub fn validate_puk(puk: &str) -> ValidationResult<String> {
    if puk.len() != 12 {
        return Err(ValidationError::IncorrectLength { expected: 12, actual: puk.len() });
    }
    if !puk.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(puk.to_string())
}

/// Validate that `index` is a usable pairing slot index (0-99)
pub fn validate_pairing_index(index: u8) -> ValidationResult<u8> {
    if index > 99 {
        return Err(ValidationError::OutOfRange { value: index as usize, min: 0, max: 99 });
    }
    Ok(index)
}

/// Decode a 64-character hex string into a 32-byte pairing key
pub fn validate_and_decode_hex(hex_str: &str) -> ValidationResult<[u8; 32]> {
    let hex_str = hex_str.trim().replace(' ', "");

    if !hex_str.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidCharacters);
    }

    if hex_str.len() != 64 {
        return Err(ValidationError::IncorrectLength { expected: 64, actual: hex_str.len() });
    }

    match hex::decode(&hex_str) {
        Ok(bytes) => {
            if bytes.len() != 32 {
                return Err(ValidationError::IncorrectLength { expected: 32, actual: bytes.len() });
            }
            let mut array = [0u8; 32];
            array.copy_from_slice(&bytes);
            Ok(array)
        }
        Err(_) => Err(ValidationError::Message("failed to decode hex string".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pin_ok() {
        assert_eq!(validate_pin("123456").unwrap(), "123456");
    }

    #[test]
    fn test_validate_pin_wrong_length() {
        assert!(matches!(validate_pin("12345"), Err(ValidationError::IncorrectLength { .. })));
    }

    #[test]
    fn test_validate_pin_non_digit() {
        assert!(matches!(validate_pin("12345a"), Err(ValidationError::InvalidCharacters)));
    }

    #[test]
    fn test_validate_puk_ok() {
        assert_eq!(validate_puk("123456789012").unwrap(), "123456789012");
    }

    #[test]
    fn test_validate_pairing_index_range() {
        assert!(validate_pairing_index(99).is_ok());
        assert!(validate_pairing_index(100).is_err());
    }

    #[test]
    fn test_validate_and_decode_hex() {
        let hex_str = "00".repeat(32);
        let decoded = validate_and_decode_hex(&hex_str).unwrap();
        assert_eq!(decoded, [0u8; 32]);
    }
}
