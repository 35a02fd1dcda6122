//! Connection - the relay session.
//!
//! ```text
//!  Disconnected ─▶ Connecting ─▶ Authenticating ─▶ Ready ─▶ Closed
//!                  (TCP open)    (PASS, NICK sent)  (376 → JOIN)
//! ```
//!
//! One task reads CR-LF frames and dispatches them in arrival order; a second
//! task drains the [`Outbound`](super::Outbound) queue into the socket.
//! End-of-stream is final: the session reports
//! [`ConnectionError::ConnectionLost`] and never reconnects.

use super::OutboundReceiver;
use crate::error::ConnectionError;
use crate::handlers::{Context, Registry};
use crate::state::Bot;
use bytes::BytesMut;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use streambot_proto::{LineCodec, ProtocolLine};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{Instrument, debug, info, warn};

/// Lifecycle of the relay session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    /// Credentials sent, waiting for end of MOTD.
    Authenticating,
    /// Channel joined.
    Ready,
    Closed,
}

/// The relay connection handler.
pub struct Connection {
    bot: Arc<Bot>,
    registry: Arc<Registry>,
    address: String,
    password: String,
    outbound_rx: OutboundReceiver,
    state: watch::Sender<ConnectionState>,
}

impl Connection {
    /// Create a connection handler. `outbound_rx` must be the receiver paired
    /// with `bot.outbound`.
    pub fn new(
        bot: Arc<Bot>,
        registry: Arc<Registry>,
        address: impl Into<String>,
        password: impl Into<String>,
        outbound_rx: OutboundReceiver,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            bot,
            registry,
            address: address.into(),
            password: password.into(),
            outbound_rx,
            state,
        }
    }

    /// Observe lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Open the TCP connection and run the session until the relay closes it.
    pub async fn run(self) -> Result<(), ConnectionError> {
        self.state.send_replace(ConnectionState::Connecting);
        info!(address = %self.address, "Connecting to relay");

        let stream = match TcpStream::connect(&self.address).await {
            Ok(stream) => stream,
            Err(source) => {
                self.state.send_replace(ConnectionState::Closed);
                return Err(ConnectionError::Connect {
                    address: self.address,
                    source,
                });
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "Failed to set TCP_NODELAY");
        }

        self.run_on(stream).await
    }

    /// Run the session over an already open stream.
    ///
    /// Always ends in [`ConnectionState::Closed`]. A clean end-of-stream is
    /// still an error for the caller: there is no reconnect.
    pub async fn run_on<S>(self, stream: S) -> Result<(), ConnectionError>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let span = crate::telemetry::spans::connection(&self.address, &self.bot.channel);
        let Self {
            bot,
            registry,
            password,
            outbound_rx,
            state,
            ..
        } = self;

        let result = session(&bot, &registry, &password, outbound_rx, &state, stream)
            .instrument(span)
            .await;
        state.send_replace(ConnectionState::Closed);
        result
    }
}

async fn session<S>(
    bot: &Arc<Bot>,
    registry: &Registry,
    password: &str,
    mut outbound_rx: OutboundReceiver,
    state: &watch::Sender<ConnectionState>,
    stream: S,
) -> Result<(), ConnectionError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let mut writer = FramedWrite::new(write_half, LineCodec::new());

    // Credentials go out before anything already queued.
    writer.send(format!("PASS {}", password)).await?;
    writer.send(format!("NICK {}", bot.nick)).await?;
    state.send_replace(ConnectionState::Authenticating);
    info!(nick = %bot.nick, "Credentials sent");

    let writer_task = tokio::spawn(
        async move {
            while let Some(line) = outbound_rx.recv().await {
                if let Err(e) = writer.send(line).await {
                    warn!(error = %e, "Relay write failed, outbound writer stopping");
                    break;
                }
            }
        }
        .in_current_span(),
    );

    let mut reader = FramedRead::new(read_half, LineCodec::new());
    let ctx = Context::new(bot, state);

    let result = loop {
        match reader.next().await {
            Some(Ok(Ok(frame))) => process_frame(registry, &ctx, &frame),
            Some(Ok(Err(anomaly))) => {
                crate::metrics::record_parse_anomaly();
                warn!(error = %anomaly, "Discarding malformed frame");
            }
            Some(Err(e)) => break Err(ConnectionError::Io(e)),
            None => {
                info!("Relay closed the connection");
                break Err(ConnectionError::ConnectionLost);
            }
        }
    };

    writer_task.abort();
    result
}

/// Parse and dispatch one frame. Nothing here can end the session.
fn process_frame(registry: &Registry, ctx: &Context<'_>, frame: &BytesMut) {
    let line = match ProtocolLine::from_bytes(frame) {
        Ok(Some(line)) => line,
        Ok(None) => return,
        Err(e) => {
            crate::metrics::record_parse_anomaly();
            warn!(error = %e, "Discarding unparsable line");
            return;
        }
    };

    if let Err(e) = registry.dispatch(ctx, &line) {
        warn!(command = %line.command, error = %e, "Handler failed");
    }
}
