//! Application layer for the Doorlink client.
//!
//! One use case lives here:
//!
//! - **`relay`** – Runs a complete relay session: connect to the resolved
//!   destination, send the handshake, and shuttle bytes between the local
//!   terminal and the server until the session's state machine calls the
//!   close.  The module owns the event loop; the pure sequencing rules live
//!   in `doorlink_core` and the raw I/O pumps in `infrastructure`.

pub mod relay;

pub use relay::{RelaySession, SessionError};
