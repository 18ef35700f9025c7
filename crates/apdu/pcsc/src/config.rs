//! Connection configuration for [`crate::PcscTransport`]

use pcsc::{Protocols, ShareMode as PcscShareMode};

/// How exclusively the reader is claimed while connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMode {
    /// Exclusive access to the card
    Exclusive,
    /// Shared access to the card (default)
    Shared,
    /// Direct connection to the reader, bypassing the card
    Direct,
}

impl From<ShareMode> for PcscShareMode {
    fn from(mode: ShareMode) -> Self {
        match mode {
            ShareMode::Exclusive => Self::Exclusive,
            ShareMode::Shared => Self::Shared,
            ShareMode::Direct => Self::Direct,
        }
    }
}

/// Configuration options for a [`crate::PcscTransport`] connection
#[derive(Debug, Clone)]
pub struct PcscConfig {
    /// Sharing mode requested when connecting to the card
    pub share_mode: ShareMode,
    /// Protocols to negotiate (T=0, T=1, or either)
    pub protocols: Protocols,
    /// Reconnect automatically if the card signals a reset mid-session
    pub auto_reconnect: bool,
}

impl Default for PcscConfig {
    fn default() -> Self {
        Self {
            share_mode: ShareMode::Shared,
            protocols: Protocols::ANY,
            auto_reconnect: true,
        }
    }
}

impl PcscConfig {
    /// Default configuration: shared access, either protocol, auto-reconnect on
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sharing mode
    pub const fn with_share_mode(mut self, mode: ShareMode) -> Self {
        self.share_mode = mode;
        self
    }

    /// Set whether to transparently reconnect after a card reset
    pub const fn with_auto_reconnect(mut self, auto_reconnect: bool) -> Self {
        self.auto_reconnect = auto_reconnect;
        self
    }
}
