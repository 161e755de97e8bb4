//! doorlink-client library crate.
//!
//! This crate is the async half of Doorlink: it connects a local terminal to
//! a BBS door server over TCP, sends the rlogin-style handshake, and relays
//! raw bytes both ways until the session ends.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! local terminal (stdin/stdout)
//!         ↕
//! [doorlink-client]
//!   ├── application/       RelaySession: connect, handshake, event loop
//!   └── infrastructure/
//!         └── network/     destination resolution + the two byte pumps
//!         ↕
//! door server (TCP)
//! ```
//!
//! The pure pieces — handshake bytes, configuration invariants, and the
//! session lifecycle state machine — live in `doorlink_core`; this crate
//! supplies the sockets, channels, and timer around them.
//!
//! # Layer rules
//!
//! - `application` depends on `infrastructure` and `doorlink_core`.
//! - `infrastructure` never depends on `application`.
//!
//! The binary in `main.rs` is the configuration-loader collaborator: it
//! parses flags, validates the [`doorlink_core::SessionConfig`], resolves
//! the destination, and hands everything to
//! [`application::relay::RelaySession`].

/// Application layer: the relay session use case.
pub mod application;

/// Infrastructure layer: resolver and byte pumps.
pub mod infrastructure;

pub use application::relay::{RelaySession, SessionError};
pub use infrastructure::network::{resolve_destination, ResolveError};
