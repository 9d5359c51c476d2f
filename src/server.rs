//! The accept/read/dispatch loop behind the control channel.
//!
//! One server task serves the whole process. Connections are handled
//! strictly one at a time: a second client sits in the listen backlog
//! until the current one disconnects. Lines within a connection are
//! dispatched in arrival order on this task.

use crate::bus::CommandBus;
use crate::error::ChannelError;
use futures_util::StreamExt;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Sequential line-protocol TCP server.
///
/// Binds 127.0.0.1 only and never writes a byte back: the protocol is
/// fire-and-forget. Bind or accept failure ends the task for the rest of
/// the process lifetime — a debug channel must never take its host down
/// with it, so nothing is escalated past a log line.
pub(crate) struct LineServer {
    bus: CommandBus,
    port: u16,
    max_line_len: usize,
    shutdown: CancellationToken,
    bound: watch::Sender<Option<SocketAddr>>,
}

impl LineServer {
    pub(crate) fn new(
        bus: CommandBus,
        port: u16,
        max_line_len: usize,
        shutdown: CancellationToken,
        bound: watch::Sender<Option<SocketAddr>>,
    ) -> Self {
        Self {
            bus,
            port,
            max_line_len,
            shutdown,
            bound,
        }
    }

    async fn bind(&self) -> Result<TcpListener, ChannelError> {
        TcpListener::bind((Ipv4Addr::LOCALHOST, self.port))
            .await
            .map_err(|source| ChannelError::Bind {
                port: self.port,
                source,
            })
    }

    /// Run until shutdown or a fatal socket error. No retries.
    #[instrument(skip(self), fields(port = self.port), name = "line_server")]
    pub(crate) async fn run(self) {
        let listener = match self.bind().await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = %e, "control channel unavailable");
                return;
            }
        };
        // With port 0 the OS picks the port; report what was actually bound.
        let addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                error!(error = %e, "control channel unavailable");
                return;
            }
        };

        info!(%addr, "control channel listening");
        let _ = self.bound.send(Some(addr));

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("control channel shutting down");
                    break;
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!(%peer, "connection accepted");
                            self.serve_connection(stream).await;
                            debug!(%peer, "connection closed");
                        }
                        Err(e) => {
                            error!(error = %e, "accept failed, control channel stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Feed one connection's lines through the bus until EOF, a read
    /// error, or shutdown.
    async fn serve_connection(&self, stream: TcpStream) {
        let codec = LinesCodec::new_with_max_length(self.max_line_len);
        let mut lines = FramedRead::new(stream, codec);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                next = lines.next() => {
                    match next {
                        Some(Ok(mut line)) => {
                            // The codec strips the terminator including a
                            // trailing \r; stray interior \r bytes are
                            // dropped here as well.
                            if line.contains('\r') {
                                line.retain(|c| c != '\r');
                            }
                            if line.is_empty() {
                                continue;
                            }
                            // Fire-and-forget: the status never leaves
                            // this side of the socket.
                            let _ = self.bus.dispatch(&line);
                        }
                        Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                            warn!(
                                limit = self.max_line_len,
                                "line exceeds length cap, dropping connection"
                            );
                            break;
                        }
                        Some(Err(LinesCodecError::Io(e))) => {
                            debug!(error = %e, "read error, dropping connection");
                            break;
                        }
                        // Peer closed the connection.
                        None => break,
                    }
                }
            }
        }
    }
}
