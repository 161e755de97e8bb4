//! The two relay byte pumps.
//!
//! Each pump is a small loop that reads chunks from one endpoint and sends
//! them into the relay's event channel.  Pumps never write to the other
//! endpoint themselves — the relay loop is the only writer on the connection
//! and the only writer on local output, so byte ordering within a direction
//! is decided in exactly one place.
//!
//! Each pump finishes with exactly one terminal event ([`InputEvent::Eof`] or
//! [`ServerEvent::Disconnected`]) and then drops its sender, closing the
//! channel.  The relay loop therefore sees the terminal event first and a
//! closed channel after it, and can treat both the same way.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Size of each pump's read buffer; relayed chunks are at most this large.
pub const RELAY_CHUNK_SIZE: usize = 4096;

/// Capacity of each pump→relay channel.
///
/// Capacity 1 keeps a pump at most one chunk ahead of the relay loop — the
/// bounded analogue of a synchronous handoff.  The relay has no reason to
/// read faster than it can forward, and this caps per-direction buffering at
/// one chunk.
pub const PUMP_CHANNEL_CAPACITY: usize = 1;

/// What the local-input pump emits.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// One chunk of local input, in arrival order.
    Data(Vec<u8>),
    /// Local input ended.  Emitted at most once, as the pump's last event.
    Eof,
}

/// What the server pump emits.
#[derive(Debug, PartialEq, Eq)]
pub enum ServerEvent {
    /// One chunk of server output, in arrival order.
    Data(Vec<u8>),
    /// The server closed the connection or the read failed.  Emitted at most
    /// once, as the pump's last event.
    Disconnected,
}

/// Reads local input and forwards it chunk by chunk until EOF.
///
/// A read error is treated like EOF after a warning: the pump cannot produce
/// any more outbound data either way, so the session drains and closes
/// through the same path.  If the relay loop has already gone away (channel
/// closed), the pump just returns.
pub async fn pump_local_input<R>(mut input: R, tx: mpsc::Sender<InputEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; RELAY_CHUNK_SIZE];

    loop {
        let n = match input.read(&mut buf).await {
            Ok(0) => {
                debug!("local input reached EOF");
                break;
            }
            Ok(n) => n,
            Err(e) => {
                warn!("local input read failed: {e}");
                break;
            }
        };

        trace!("local input chunk: {n} bytes");
        if tx.send(InputEvent::Data(buf[..n].to_vec())).await.is_err() {
            debug!("relay loop gone; stopping input pump");
            return;
        }
    }

    let _ = tx.send(InputEvent::Eof).await;
}

/// Reads server output and forwards it chunk by chunk until the remote side
/// closes or the read fails.
///
/// Both endings produce the same single [`ServerEvent::Disconnected`]; the
/// read error itself is only worth a warning because a vanished peer and a
/// reset connection end the session identically.
pub async fn pump_server_data<R>(mut connection: R, tx: mpsc::Sender<ServerEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; RELAY_CHUNK_SIZE];

    loop {
        let n = match connection.read(&mut buf).await {
            Ok(0) => {
                debug!("server closed the connection (EOF)");
                break;
            }
            Ok(n) => n,
            Err(e) => {
                warn!("read from server failed: {e}");
                break;
            }
        };

        trace!("server chunk: {n} bytes");
        if tx.send(ServerEvent::Data(buf[..n].to_vec())).await.is_err() {
            debug!("relay loop gone; stopping server pump");
            return;
        }
    }

    let _ = tx.send(ServerEvent::Disconnected).await;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
