//! Channel configuration.

use crate::error::ChannelError;
use serde::Deserialize;
use std::path::Path;

/// Port bound on 127.0.0.1 when no registration proposes one.
pub const DEFAULT_PORT: u16 = 5555;

/// Cap on a single command line, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 8192;

/// Tunables for the control channel.
///
/// Hosts that keep tuning in a file can load this from TOML with
/// [`ChannelConfig::load`]; every field has a default, so an empty table
/// is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    /// TCP port the first registration binds on 127.0.0.1. Port 0 asks
    /// the OS for an ephemeral port (useful in tests).
    pub port: u16,
    /// Longest accepted command line in bytes. A client sending more
    /// without a terminator gets its connection dropped.
    pub max_line_len: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl ChannelConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChannelError> {
        let content = std::fs::read_to_string(path)?;
        let config: ChannelConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
