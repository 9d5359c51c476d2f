//! Command handlers and the handler registry.
//!
//! A module exposes itself on the channel by registering a value
//! implementing [`CommandHandler`] under its namespace. The registry is
//! shared between the registration path (writer) and the server's
//! dispatch path (reader), so it is a concurrent map.

use dashmap::DashMap;
use std::sync::Arc;

/// A named module's command entry point.
///
/// `argv` is the full whitespace-split token list of the incoming line:
/// `argv[0]` is the module name itself, `argv[1]` is conventionally the
/// sub-command, and the rest are free-form arguments — the familiar
/// process entry-point convention, so handlers can reuse ordinary
/// argument parsing.
///
/// The returned status follows whatever convention the handler's module
/// uses; the channel neither inspects nor forwards it.
///
/// Handlers run on the server's background task, concurrently with
/// whatever the owning module is doing on its own context, so any state
/// they touch must be safe to share.
pub trait CommandHandler: Send + Sync {
    /// Handle one incoming command line.
    fn invoke(&self, argv: &[&str]) -> i32;
}

/// Adapter exposing a plain closure as a [`CommandHandler`].
pub struct FnHandler<F>(F);

impl<F> FnHandler<F>
where
    F: Fn(&[&str]) -> i32 + Send + Sync,
{
    /// Wrap `f` so it can be registered.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&[&str]) -> i32 + Send + Sync,
{
    fn invoke(&self, argv: &[&str]) -> i32 {
        (self.0)(argv)
    }
}

/// Name → handler map shared by registration and dispatch.
///
/// Keys are unique; re-registering a name replaces the previous handler
/// silently. There is no removal: a module's namespace lives as long as
/// the channel does.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<String, Arc<dyn CommandHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the handler for `name`. Last write wins.
    pub fn insert(&self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    /// Current handler for `name`, if one is registered.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of registered namespaces.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_registered_handler() {
        let registry = HandlerRegistry::new();
        registry.insert("motor", Arc::new(FnHandler::new(|_| 7)));

        let handler = registry.lookup("motor").expect("registered");
        assert_eq!(handler.invoke(&["motor"]), 7);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_unknown_is_none() {
        let registry = HandlerRegistry::new();
        assert!(registry.lookup("camera").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn reregistering_replaces_without_duplicating() {
        let registry = HandlerRegistry::new();
        registry.insert("motor", Arc::new(FnHandler::new(|_| 1)));
        registry.insert("motor", Arc::new(FnHandler::new(|_| 2)));

        assert_eq!(registry.len(), 1);
        let handler = registry.lookup("motor").expect("registered");
        assert_eq!(handler.invoke(&["motor"]), 2);
    }
}
