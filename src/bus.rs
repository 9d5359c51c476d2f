//! Line tokenizing and command routing.

use crate::handler::HandlerRegistry;
use std::sync::Arc;
use tracing::trace;

/// Status returned for a line the bus could not route: an empty token
/// list, or a first token with no registered handler.
pub const NO_DISPATCH: i32 = -1;

/// Routes a raw command line to the handler registered under its first
/// token.
///
/// The bus is stateless beyond the registry it wraps; cloning it is cheap
/// and shares the registry.
#[derive(Clone)]
pub struct CommandBus {
    registry: Arc<HandlerRegistry>,
}

impl CommandBus {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Tokenize `raw` on runs of ASCII whitespace and invoke the matching
    /// handler with the full token list (`argv[0]` is the module name).
    ///
    /// Returns the handler's status verbatim, or [`NO_DISPATCH`] when the
    /// line is empty or names an unregistered module. There is no quoting
    /// or escaping, so a token can never contain whitespace.
    pub fn dispatch(&self, raw: &str) -> i32 {
        let argv: Vec<&str> = raw.split_ascii_whitespace().collect();
        let Some(&module) = argv.first() else {
            return NO_DISPATCH;
        };
        let Some(handler) = self.registry.lookup(module) else {
            trace!(module, "no handler registered");
            return NO_DISPATCH;
        };

        trace!(module, argc = argv.len(), "dispatching command");
        handler.invoke(&argv)
    }
}
