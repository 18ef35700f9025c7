use k256::{PublicKey, SecretKey};

use crate::commands::ExportOption;
use crate::types::Keypair;
use crate::Error;

/// The three shapes EXPORT KEY can return, depending on what was requested and
/// what the card's capabilities allow
#[derive(Debug, Clone)]
pub enum ExportedKey {
    /// Both private and (usually) public key components
    Complete {
        /// The private key
        private_key: SecretKey,
        /// The public key, if the card included it
        public_key: Option<PublicKey>,
    },
    /// Public key only
    PublicOnly(PublicKey),
    /// Extended public key: public key plus BIP32 chain code
    Extended {
        /// The public key
        public_key: PublicKey,
        /// The chain code used for child derivation
        chain_code: Vec<u8>,
    },
}

impl ExportedKey {
    /// Convert a parsed [`Keypair`] into the shape `requested` by the caller
    pub fn try_from_keypair(keypair: Keypair, requested: ExportOption) -> Result<Self, Error> {
        match requested {
            ExportOption::PrivateAndPublic => {
                let private_key = keypair.private_key.ok_or_else(|| Error::Message("expected private key in exported keypair".to_string()))?;
                Ok(Self::Complete {
                    private_key,
                    public_key: keypair.public_key,
                })
            }
            ExportOption::PublicKeyOnly => {
                let public_key = keypair.public_key.ok_or_else(|| Error::Message("expected public key in exported keypair".to_string()))?;
                Ok(Self::PublicOnly(public_key))
            }
            ExportOption::ExtendedPublicKey => {
                let public_key = keypair.public_key.ok_or_else(|| Error::Message("expected public key in exported keypair".to_string()))?;
                let chain_code = keypair.chain_code.ok_or_else(|| Error::Message("expected chain code in exported keypair".to_string()))?;
                Ok(Self::Extended { public_key, chain_code })
            }
        }
    }

    /// The public key, if present
    pub fn public_key(&self) -> Option<&PublicKey> {
        match self {
            Self::Complete { public_key, .. } => public_key.as_ref(),
            Self::PublicOnly(public_key) => Some(public_key),
            Self::Extended { public_key, .. } => Some(public_key),
        }
    }

    /// The private key, if present
    pub fn private_key(&self) -> Option<&SecretKey> {
        match self {
            Self::Complete { private_key, .. } => Some(private_key),
            _ => None,
        }
    }

    /// The chain code, if present
    pub fn chain_code(&self) -> Option<&Vec<u8>> {
        match self {
            Self::Extended { chain_code, .. } => Some(chain_code),
            _ => None,
        }
    }

    /// Whether this is a complete (private key) export
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Whether this is a public-key-only export
    pub fn is_public_only(&self) -> bool {
        matches!(self, Self::PublicOnly(_))
    }

    /// Whether this is an extended (public key + chain code) export
    pub fn is_extended(&self) -> bool {
        matches!(self, Self::Extended { .. })
    }
}
