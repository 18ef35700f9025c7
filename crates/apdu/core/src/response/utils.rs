//! Helpers for splitting a raw APDU response into payload and status word

use bytes::Bytes;

use super::status::StatusWord;

/// Split a raw response into its payload (possibly empty) and trailing status word
///
/// Returns `None` if `bytes` is shorter than the two status bytes.
pub fn extract_response_parts(bytes: &[u8]) -> Option<(&[u8], StatusWord)> {
    if bytes.len() < 2 {
        return None;
    }

    let split = bytes.len() - 2;
    let (payload, sw) = bytes.split_at(split);
    Some((payload, StatusWord::new(sw[0], sw[1])))
}

/// Split an owned [`Bytes`] response into a payload [`Bytes`] and trailing status word
pub fn extract_status_and_payload(bytes: &Bytes) -> Option<(Bytes, StatusWord)> {
    let (payload, sw) = extract_response_parts(bytes)?;
    Some((bytes.slice(0..payload.len()), sw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_response_parts() {
        let (payload, sw) = extract_response_parts(&[0x01, 0x02, 0x90, 0x00]).unwrap();
        assert_eq!(payload, &[0x01, 0x02]);
        assert_eq!(sw, StatusWord::new(0x90, 0x00));

        let (payload, sw) = extract_response_parts(&[0x90, 0x00]).unwrap();
        assert!(payload.is_empty());
        assert_eq!(sw, StatusWord::new(0x90, 0x00));

        assert!(extract_response_parts(&[0x90]).is_none());
        assert!(extract_response_parts(&[]).is_none());
    }
}
