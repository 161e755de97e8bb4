//! Relay session orchestration.
//!
//! This module is responsible for:
//!
//! 1. Opening the TCP connection to the resolved destination.
//! 2. Writing the handshake, synchronously, before anything else flows.
//! 3. Spawning the two byte pumps (local input → relay, server → relay).
//! 4. Running the single event loop that merges outbound data, inbound data,
//!    the end-of-input signal, the disconnect signal, and the drain timer.
//! 5. Closing the connection exactly once and reporting why the session
//!    ended.
//!
//! # Architecture
//!
//! ```text
//!  local input ──▶ InputPump ──┐ channel            ┌──▶ connection (write)
//!                              ├──▶ relay loop ─────┤
//!  connection ──▶ ServerPump ──┘ channel    ▲       └──▶ local output (write)
//!       (read)                              │
//!                                      drain timer
//! ```
//!
//! The loop owns both write ends outright.  The pumps only read, and only
//! talk to the loop through their channels, so every write — and the final
//! close — happens in exactly one task with no locking.  Which ready event
//! the loop picks first when several race is deliberately left to the
//! `select!` primitive: every non-terminal event commutes with the others,
//! and the session state machine ignores whatever arrives after the first
//! terminal one.
//!
//! # Why the loop never reads time
//!
//! The drain timer is a single pinned [`tokio::time::sleep`] that the loop
//! re-arms whenever the session state machine asks it to.  The machine
//! decides *when* a timer matters; the loop only turns that decision into a
//! deadline.  This keeps the tricky sequencing (timer only relevant while
//! draining, reset on trailing server data) in pure, synchronously tested
//! code.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, trace, warn};

use doorlink_core::{
    encode_handshake, Action, CloseReason, SessionConfig, SessionEvent, SessionMachine,
};

use crate::infrastructure::network::pumps::{
    pump_local_input, pump_server_data, InputEvent, ServerEvent, PUMP_CHANNEL_CAPACITY,
};

/// Errors that end a session before it becomes active.
///
/// Everything after the handshake is absorbed into the session's own
/// shutdown sequencing and reported as a [`CloseReason`] instead.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The TCP connection could not be established.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The connection opened but the handshake could not be written.
    #[error("failed to send handshake to {addr}: {source}")]
    Handshake {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// One relay session against one destination.
///
/// Construct it with the resolved destination and the validated session
/// configuration, then call [`RelaySession::run`] with the local I/O streams.
/// The session is single-shot: no reconnection, no retry.
pub struct RelaySession {
    destination: SocketAddr,
    config: SessionConfig,
}

impl RelaySession {
    /// Creates a session for `destination` using `config`'s identity fields
    /// and inactivity timeout.
    pub fn new(destination: SocketAddr, config: SessionConfig) -> Self {
        Self {
            destination,
            config,
        }
    }

    /// Runs the session to completion: connect, handshake, relay, close.
    ///
    /// Returns the reason the session ended.  All three reasons are normal
    /// returns — by the time the relay is live the session can only ever
    /// "finish", not fail; a relay-phase write error is logged where it
    /// happens and comes back as [`CloseReason::WriteError`].
    ///
    /// The connection is closed exactly once on every path out of the relay
    /// loop, and both pump tasks are aborted so a read blocked on a silent
    /// endpoint cannot outlive the session.
    ///
    /// # Errors
    ///
    /// [`SessionError`] if the connection cannot be established or the
    /// handshake cannot be written; the session never becomes active in
    /// either case.
    pub async fn run<I, O>(&self, input: I, mut output: O) -> Result<CloseReason, SessionError>
    where
        I: AsyncRead + Send + Unpin + 'static,
        O: AsyncWrite + Unpin,
    {
        let stream = TcpStream::connect(self.destination)
            .await
            .map_err(|source| SessionError::Connect {
                addr: self.destination,
                source,
            })?;
        info!("connected to {}", self.destination);

        let (read_half, mut write_half) = stream.into_split();

        // Handshake first, alone on the wire.  Failure here means the
        // session never starts; dropping both halves closes the socket.
        let handshake = encode_handshake(&self.config);
        write_half
            .write_all(&handshake)
            .await
            .map_err(|source| SessionError::Handshake {
                addr: self.destination,
                source,
            })?;
        debug!("handshake sent ({} bytes)", handshake.len());

        let (input_tx, input_rx) = mpsc::channel(PUMP_CHANNEL_CAPACITY);
        let (server_tx, server_rx) = mpsc::channel(PUMP_CHANNEL_CAPACITY);
        let input_pump = tokio::spawn(pump_local_input(input, input_tx));
        let server_pump = tokio::spawn(pump_server_data(read_half, server_tx));

        let reason = relay_loop(
            &mut write_half,
            &mut output,
            input_rx,
            server_rx,
            self.config.inactivity_timeout,
        )
        .await;

        // The single close.  Shutdown failures are uninteresting at this
        // point: the session is over either way.
        if let Err(e) = write_half.shutdown().await {
            debug!("connection shutdown after session end failed: {e}");
        }

        // A pump parked in a read would never notice the session ending on
        // its own; closing our write half does not wake the peer half's
        // reader, and local input may simply never produce another byte.
        input_pump.abort();
        server_pump.abort();

        Ok(reason)
    }
}

/// The orchestrating event loop.  Runs until the session state machine
/// prescribes the close, and returns the reason it gave.
///
/// Every event is fed through the [`SessionMachine`]; this function only
/// performs the I/O and timer effects the machine asks for.  Receiving
/// `None` from a channel is folded into the pump's terminal event: the pumps
/// close their channels right after sending it, and a pump that died without
/// one (it was aborted, or panicked) must end the session the same way.
async fn relay_loop<C, O>(
    connection: &mut C,
    output: &mut O,
    mut input_rx: mpsc::Receiver<InputEvent>,
    mut server_rx: mpsc::Receiver<ServerEvent>,
    inactivity_timeout: Duration,
) -> CloseReason
where
    C: AsyncWrite + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut machine = SessionMachine::new();

    // Re-armed via `reset` whenever the machine asks; never polled before
    // the first arming thanks to the `timer_armed` guard.
    let drain_timer = sleep(inactivity_timeout);
    tokio::pin!(drain_timer);
    let mut timer_armed = false;

    // Once the input channel has delivered its terminal event it stays
    // closed and would report `None` on every poll; the guard retires the
    // branch so the loop waits on the remaining sources only.
    let mut input_done = false;

    loop {
        let action = tokio::select! {
            event = input_rx.recv(), if !input_done => match event {
                Some(InputEvent::Data(chunk)) => {
                    trace!("forwarding {} bytes to server", chunk.len());
                    match write_all_flush(connection, &chunk).await {
                        Ok(()) => machine.apply(SessionEvent::OutboundData),
                        Err(e) => {
                            warn!("write to server failed: {e}");
                            machine.apply(SessionEvent::WriteFailed)
                        }
                    }
                }
                Some(InputEvent::Eof) | None => {
                    debug!(
                        "local input ended; draining server output for up to {:?}",
                        inactivity_timeout
                    );
                    input_done = true;
                    machine.apply(SessionEvent::InputEof)
                }
            },
            event = server_rx.recv() => match event {
                Some(ServerEvent::Data(chunk)) => {
                    trace!("forwarding {} bytes to local output", chunk.len());
                    match write_all_flush(output, &chunk).await {
                        Ok(()) => machine.apply(SessionEvent::InboundData),
                        Err(e) => {
                            warn!("write to local output failed: {e}");
                            machine.apply(SessionEvent::WriteFailed)
                        }
                    }
                }
                Some(ServerEvent::Disconnected) | None => {
                    info!("server closed the connection");
                    machine.apply(SessionEvent::Disconnect)
                }
            },
            _ = &mut drain_timer, if timer_armed => {
                info!(
                    "no server data within {:?} of local input ending",
                    inactivity_timeout
                );
                machine.apply(SessionEvent::TimerElapsed)
            }
        };

        match action {
            Action::Continue => {}
            Action::ArmTimer => {
                drain_timer
                    .as_mut()
                    .reset(Instant::now() + inactivity_timeout);
                timer_armed = true;
            }
            Action::Close(reason) => break reason,
        }
    }
}

/// Writes a whole chunk and flushes it through.
///
/// Flushing matters for the local output: a door's prompt usually has no
/// trailing newline, and the user must still see it immediately.
async fn write_all_flush<W>(writer: &mut W, chunk: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(chunk).await?;
    writer.flush().await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
