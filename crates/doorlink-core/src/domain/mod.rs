//! Domain types for Doorlink.
//!
//! Pure business logic with no infrastructure dependencies: the session
//! configuration and its invariants, and the session lifecycle state
//! machine.  Nothing in this module opens a socket, reads a clock, or spawns
//! a task, so all of it unit-tests without a runtime.

pub mod session;
pub mod state;

pub use session::{ConfigError, SessionConfig, DEFAULT_INACTIVITY_TIMEOUT};
pub use state::{Action, CloseReason, SessionEvent, SessionMachine, SessionState};
