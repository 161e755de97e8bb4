//! # doorlink-core
//!
//! Shared library for Doorlink containing the door server handshake encoder,
//! the session configuration, and the session lifecycle state machine.
//!
//! This crate is used by the client application.  It has zero dependencies on
//! OS APIs, async runtimes, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! Doorlink connects a local terminal to a *door* — an external program
//! hosted behind a BBS — over TCP.  The protocol is a thin descendant of
//! rlogin: one NUL-delimited identity payload at connect time, then a raw
//! byte stream in both directions until somebody hangs up.
//!
//! This crate (`doorlink-core`) is the pure foundation.  It defines:
//!
//! - **`protocol`** – What the one and only framed payload looks like on the
//!   wire.  [`protocol::handshake::encode_handshake`] turns a session
//!   configuration into the NUL-delimited byte sequence the server parses.
//!
//! - **`domain`** – The session configuration with its invariants, and the
//!   [`domain::state::SessionMachine`]: a pure state machine that sequences
//!   the session's shutdown (keep relaying? drain trailing output? close?).
//!   The async client feeds it events and performs the actions it
//!   prescribes, so the tricky sequencing logic stays synchronous and
//!   testable.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `doorlink_core::SessionConfig` instead of the full module path.
pub use domain::session::{ConfigError, SessionConfig, DEFAULT_INACTIVITY_TIMEOUT};
pub use domain::state::{Action, CloseReason, SessionEvent, SessionMachine, SessionState};
pub use protocol::handshake::encode_handshake;
