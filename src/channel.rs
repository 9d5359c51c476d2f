//! The registration surface and lifecycle owner of the control channel.

use crate::bus::CommandBus;
use crate::config::ChannelConfig;
use crate::handler::{CommandHandler, FnHandler, HandlerRegistry};
use crate::server::LineServer;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Server bookkeeping behind the registration path.
struct ServerState {
    started: bool,
    port: u16,
    worker: Option<JoinHandle<()>>,
    bound_tx: Option<watch::Sender<Option<SocketAddr>>>,
}

/// Registration entry point for modules, and owner of the server task.
///
/// Construct one per process before any module registers, share it as an
/// `Arc<ControlChannel>`, and tear it down with [`shutdown`] at process
/// exit. Nothing binds until the first successful registration: that call
/// fixes the listening port and spawns the server task in the background.
/// Registrations at any later point still land in the registry and become
/// dispatchable on the next incoming line.
///
/// [`shutdown`]: ControlChannel::shutdown
pub struct ControlChannel {
    registry: Arc<HandlerRegistry>,
    config: ChannelConfig,
    state: Mutex<ServerState>,
    shutdown: CancellationToken,
    bound_rx: watch::Receiver<Option<SocketAddr>>,
}

impl ControlChannel {
    pub fn new(config: ChannelConfig) -> Self {
        let (bound_tx, bound_rx) = watch::channel(None);
        Self {
            registry: Arc::new(HandlerRegistry::new()),
            state: Mutex::new(ServerState {
                started: false,
                port: config.port,
                worker: None,
                bound_tx: Some(bound_tx),
            }),
            config,
            shutdown: CancellationToken::new(),
            bound_rx,
        }
    }

    /// Register `handler` under `name` on the configured port.
    ///
    /// An empty `name` is a silent no-op. Must be called from within a
    /// tokio runtime: the first successful registration spawns the server
    /// task.
    pub fn register(&self, name: &str, handler: Arc<dyn CommandHandler>) {
        self.register_on_port(name, handler, self.config.port);
    }

    /// Register a plain closure under `name`.
    pub fn register_fn<F>(&self, name: &str, f: F)
    where
        F: Fn(&[&str]) -> i32 + Send + Sync + 'static,
    {
        self.register(name, Arc::new(FnHandler::new(f)));
    }

    /// Register `handler` under `name`, proposing `port` for the listener.
    ///
    /// Only the first successful registration's port is honored; later
    /// ports are discarded without comment, and the server is never
    /// spawned twice.
    pub fn register_on_port(&self, name: &str, handler: Arc<dyn CommandHandler>, port: u16) {
        if name.is_empty() {
            debug!("ignoring registration with empty name");
            return;
        }
        self.registry.insert(name, handler);

        let mut state = self.state.lock();
        if state.started {
            return;
        }
        state.started = true;
        state.port = port;

        let bound_tx = state
            .bound_tx
            .take()
            .unwrap_or_else(|| watch::channel(None).0);
        let server = LineServer::new(
            CommandBus::new(Arc::clone(&self.registry)),
            port,
            self.config.max_line_len,
            self.shutdown.clone(),
            bound_tx,
        );
        state.worker = Some(tokio::spawn(server.run()));
    }

    /// The shared registry, for host-side introspection.
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Port latched by the first successful registration, or `None` while
    /// the server has not been started. With port 0 this is the requested
    /// port, not the one the OS picked — see [`local_addr`] for that.
    ///
    /// [`local_addr`]: ControlChannel::local_addr
    pub fn port(&self) -> Option<u16> {
        let state = self.state.lock();
        state.started.then_some(state.port)
    }

    /// Address the server actually bound.
    ///
    /// Waits for the server task to finish binding. `None` if the server
    /// was never started, failed to bind, or shut down first.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        if !self.state.lock().started {
            return None;
        }
        let mut rx = self.bound_rx.clone();
        // A closed channel means the server task ended without binding.
        rx.wait_for(|addr| addr.is_some())
            .await
            .ok()
            .and_then(|addr| *addr)
    }

    /// Stop accepting connections and wait for the server task to exit.
    ///
    /// Idempotent, and safe to call even if no registration ever started
    /// the server. The registry is left intact; the channel cannot be
    /// restarted afterwards.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let worker = self.state.lock().worker.take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }
    }
}

impl Default for ControlChannel {
    fn default() -> Self {
        Self::new(ChannelConfig::default())
    }
}
