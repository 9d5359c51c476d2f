//! linectl - loopback line-protocol control channel for live processes.
//!
//! External modules register named command handlers on a [`ControlChannel`];
//! a background task accepts newline-delimited text commands on a loopback
//! TCP socket and routes each line to the matching handler. The channel
//! exists so operators and tools can inspect or tweak a running module's
//! parameters without restarting the host process.
//!
//! The wire protocol is one command per line, `<module> <command> [arg ...]`,
//! fields split on whitespace, `\n` or `\r\n` terminated. Nothing is ever
//! written back to the client: this is a fire-and-forget debug channel, not
//! an RPC surface.
//!
//! ```no_run
//! use linectl::{ChannelConfig, ControlChannel};
//! use std::sync::Arc;
//!
//! # async fn host() {
//! let channel = Arc::new(ControlChannel::new(ChannelConfig::default()));
//!
//! // `echo "detector set binary_thres 100" | nc 127.0.0.1 5555`
//! channel.register_fn("detector", |argv| match argv.get(1).copied() {
//!     Some("set") => 0,
//!     _ => -1,
//! });
//! # }
//! ```

mod bus;
mod channel;
mod config;
mod error;
mod handler;
mod server;

pub use bus::{CommandBus, NO_DISPATCH};
pub use channel::ControlChannel;
pub use config::{ChannelConfig, DEFAULT_MAX_LINE_LEN, DEFAULT_PORT};
pub use error::ChannelError;
pub use handler::{CommandHandler, FnHandler, HandlerRegistry};
