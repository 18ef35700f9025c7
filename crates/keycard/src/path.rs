//! BIP32 path grammar for DERIVE KEY, EXPORT KEY, and SIGN.
//!
//! The wire form the card expects is simple: zero or more big-endian `u32`
//! components, each with its top bit set iff the component is hardened. What
//! varies per command is the *P1* byte, which selects where the derivation
//! starts (from the master key, from the current key's parent, or from the
//! current key) and whether the result becomes the new current path or is
//! used only for this one operation.

use bytes::{BufMut, Bytes, BytesMut};

/// Top bit marking a hardened BIP32 component on the wire
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// P1 bits selecting where a path-based command starts its derivation
pub(crate) mod p1 {
    /// Derive relative to the current key (the default; requires no bit)
    pub const SOURCE_CURRENT: u8 = 0x00;
    /// Derive from the master key
    pub const SOURCE_MASTER: u8 = 0x01;
    /// Derive relative to the current key's parent
    pub const SOURCE_PARENT: u8 = 0x02;
    /// SIGN only: use the card's configured pinless path, no path data sent
    pub const PINLESS: u8 = 0x03;
    /// Derive temporarily: apply the path for this operation without making it current
    pub const TEMPORARY: u8 = 0x08;
}

/// Whether a derived path should become the card's new current path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeriveMode {
    /// The derived path replaces the current path
    Persistent,
    /// The derived path is used for this operation only
    Temporary,
}

impl DeriveMode {
    pub(crate) const fn p1_bit(self) -> u8 {
        match self {
            Self::Persistent => 0x00,
            Self::Temporary => p1::TEMPORARY,
        }
    }
}

/// A BIP32 path as accepted by DERIVE KEY, EXPORT KEY, and SIGN: either "stay
/// where you are" or a path anchored at the master key, the current key's
/// parent, or the current key itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPath {
    /// No derivation; operate on whichever path is already current
    Current,
    /// Absolute path from the master key (`m/44'/60'/0'/0/0`)
    FromMaster(Vec<u32>),
    /// Path relative to the parent of the current key (`../0/0`)
    FromParent(Vec<u32>),
    /// Path relative to the current key (`./0/0`)
    FromCurrent(Vec<u32>),
}

impl KeyPath {
    /// Parse a path string using the grammar: `m/...` (absolute), `../...`
    /// (parent-relative), `./...` (current-relative), or an empty string / `.`
    /// alone for "stay current".
    pub fn parse(input: &str) -> crate::Result<Self> {
        let input = input.trim();

        if input.is_empty() || input == "." {
            return Ok(Self::Current);
        }

        if let Some(rest) = input.strip_prefix("m") {
            let rest = rest.strip_prefix('/').unwrap_or(rest);
            return Ok(Self::FromMaster(parse_components(rest)?));
        }

        if let Some(rest) = input.strip_prefix("../") {
            return Ok(Self::FromParent(parse_components(rest)?));
        }

        if let Some(rest) = input.strip_prefix("./") {
            return Ok(Self::FromCurrent(parse_components(rest)?));
        }

        Err(crate::Error::InvalidDerivationArguments(format!(
            "path must start with 'm/', '../', or './': got {input:?}"
        )))
    }

    /// Whether this path is absolute (anchored at the master key)
    pub const fn is_absolute(&self) -> bool {
        matches!(self, Self::FromMaster(_))
    }
}

/// Parse `44'/60'/0'/0/0`-style path components into their hardened-bit-encoded form
fn parse_components(input: &str) -> crate::Result<Vec<u32>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    input.split('/').map(parse_component).collect()
}

fn parse_component(raw: &str) -> crate::Result<u32> {
    let (digits, hardened) = match raw.strip_suffix('\'').or_else(|| raw.strip_suffix('h')).or_else(|| raw.strip_suffix('H')) {
        Some(digits) => (digits, true),
        None => (raw, false),
    };

    let value: u32 = digits
        .parse()
        .map_err(|_| crate::Error::InvalidDerivationArguments(format!("invalid path component: {raw:?}")))?;

    if value & HARDENED_BIT != 0 {
        return Err(crate::Error::InvalidDerivationArguments(format!("path component out of range: {raw:?}")));
    }

    Ok(if hardened { value | HARDENED_BIT } else { value })
}

/// Serialize path components to their wire form: big-endian `u32` per component, concatenated
pub(crate) fn components_to_bytes(components: &[u32]) -> Bytes {
    let mut buf = BytesMut::with_capacity(components.len() * 4);
    for component in components {
        buf.put_u32(*component);
    }
    buf.freeze()
}

/// Compute the `(P1, data)` pair DERIVE KEY / EXPORT KEY / SIGN send for `key_path`,
/// applying `derive_mode` (ignored when `key_path` is [`KeyPath::Current`]).
pub(crate) fn prepare_derivation_parameters(key_path: &KeyPath, derive_mode: Option<DeriveMode>) -> crate::Result<(u8, Option<Bytes>)> {
    let mode_bit = derive_mode.unwrap_or(DeriveMode::Persistent).p1_bit();

    Ok(match key_path {
        KeyPath::Current => (p1::SOURCE_CURRENT, None),
        KeyPath::FromMaster(components) => (p1::SOURCE_MASTER | mode_bit, Some(components_to_bytes(components))),
        KeyPath::FromParent(components) => (p1::SOURCE_PARENT | mode_bit, Some(components_to_bytes(components))),
        KeyPath::FromCurrent(components) => (p1::SOURCE_CURRENT | mode_bit, Some(components_to_bytes(components))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_hardened() {
        let path = KeyPath::parse("m/44'/60'/0'/0/0").unwrap();
        assert_eq!(
            path,
            KeyPath::FromMaster(vec![44 | HARDENED_BIT, 60 | HARDENED_BIT, 0 | HARDENED_BIT, 0, 0])
        );
        assert!(path.is_absolute());
    }

    #[test]
    fn test_parse_absolute_h_suffix() {
        let path = KeyPath::parse("m/44h/60h").unwrap();
        assert_eq!(path, KeyPath::FromMaster(vec![44 | HARDENED_BIT, 60 | HARDENED_BIT]));
    }

    #[test]
    fn test_parse_master_bare() {
        assert_eq!(KeyPath::parse("m").unwrap(), KeyPath::FromMaster(vec![]));
    }

    #[test]
    fn test_parse_parent_relative() {
        assert_eq!(KeyPath::parse("../0/0").unwrap(), KeyPath::FromParent(vec![0, 0]));
    }

    #[test]
    fn test_parse_current_relative() {
        assert_eq!(KeyPath::parse("./5").unwrap(), KeyPath::FromCurrent(vec![5]));
    }

    #[test]
    fn test_parse_current_empty() {
        assert_eq!(KeyPath::parse("").unwrap(), KeyPath::Current);
        assert_eq!(KeyPath::parse(".").unwrap(), KeyPath::Current);
    }

    #[test]
    fn test_parse_invalid_component() {
        assert!(KeyPath::parse("m/abc").is_err());
    }

    #[test]
    fn test_parse_invalid_prefix() {
        assert!(KeyPath::parse("44/0").is_err());
    }

    #[test]
    fn test_components_to_bytes() {
        let bytes = components_to_bytes(&[44 | HARDENED_BIT, 0]);
        assert_eq!(bytes.as_ref(), &[0x80, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_prepare_derivation_parameters_master_persistent() {
        let path = KeyPath::FromMaster(vec![1, 2]);
        let (p1, data) = prepare_derivation_parameters(&path, Some(DeriveMode::Persistent)).unwrap();
        assert_eq!(p1, p1::SOURCE_MASTER);
        assert_eq!(data.unwrap().as_ref(), &[0, 0, 0, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn test_prepare_derivation_parameters_current_no_data() {
        let (p1, data) = prepare_derivation_parameters(&KeyPath::Current, None).unwrap();
        assert_eq!(p1, p1::SOURCE_CURRENT);
        assert!(data.is_none());
    }

    #[test]
    fn test_prepare_derivation_parameters_temporary_bit() {
        let path = KeyPath::FromParent(vec![0]);
        let (p1, _) = prepare_derivation_parameters(&path, Some(DeriveMode::Temporary)).unwrap();
        assert_eq!(p1, p1::SOURCE_PARENT | p1::TEMPORARY);
    }
}
