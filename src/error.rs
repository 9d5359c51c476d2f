//! Error types for the control channel.
//!
//! Protocol-level failures never show up here: an empty or unroutable line
//! resolves to the [`NO_DISPATCH`](crate::NO_DISPATCH) sentinel, and
//! per-connection I/O errors end the connection quietly.

use std::io;
use thiserror::Error;

/// Errors from channel setup and configuration loading.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The listener could not be bound to the loopback address.
    #[error("failed to bind control socket on 127.0.0.1:{port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ConfigRead(#[from] io::Error),

    /// A configuration file could not be parsed.
    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
