//! Session lifecycle state machine.
//!
//! The relay's shutdown sequencing is the one genuinely subtle part of the
//! system, so it lives here as a pure type with no I/O: events go in, the
//! machine updates its state and prescribes an [`Action`] for the caller to
//! perform.  The relay orchestrator feeds it everything its event loop sees
//! and executes the prescriptions (write, arm the drain timer, close).
//!
//! # States
//!
//! ```text
//!             end-of-input
//!   Active ────────────────▶ DrainingAfterEof
//!     │                        │         │ ▲
//!     │ disconnect /           │ timer   │ │ inbound data
//!     │ write failure          │ fires   └─┘ (re-arms timer)
//!     │                        ▼
//!     └──────────────────▶  Closed  ◀── disconnect / write failure
//! ```
//!
//! `Closed` is terminal and absorbing: the machine never leaves it and never
//! prescribes a second close, so the caller can tear the connection down
//! exactly once no matter how events race.  There is no transition back to
//! `Active`; the machine only moves forward, which keeps shutdown
//! deterministic and idempotent.
//!
//! # Why the timer is an event, not a clock
//!
//! The machine does not read time.  It tells the caller when to (re)arm the
//! inactivity timer via [`Action::ArmTimer`], and the caller reports back
//! with [`SessionEvent::TimerElapsed`] when the timer actually fires.  That
//! keeps every transition synchronous and unit-testable without sleeping.

/// Lifecycle phase of a relay session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Both directions flowing; local input has not ended.
    Active,
    /// Local input hit EOF; trailing server output is still accepted until
    /// the inactivity timer fires.
    DrainingAfterEof,
    /// Terminal. The connection has been (or is about to be) closed.
    Closed,
}

/// Why the session ended.
///
/// Exactly one of these is produced per session, inside the single
/// [`Action::Close`] the machine ever returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The remote side closed the connection or its read failed.
    RemoteDisconnect,
    /// Local input ended and no server data arrived within the timeout.
    InactivityTimeout,
    /// A relay-phase write failed (to the connection or to local output).
    WriteError,
}

/// Everything the orchestrator's event loop can observe, reduced to what the
/// state machine needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A chunk of local input arrived and is about to be written out.
    OutboundData,
    /// A chunk of server output arrived and is about to be written locally.
    InboundData,
    /// The input pump signalled end of local input (EOF or a read error it
    /// treats as EOF).
    InputEof,
    /// The server pump signalled remote close or a read error.
    Disconnect,
    /// The inactivity timer fired.
    TimerElapsed,
    /// A relay write failed in either direction.
    WriteFailed,
}

/// What the caller must do after applying an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond handling the event itself (e.g. performing the write
    /// the data event announced).
    Continue,
    /// Start the inactivity timer, or restart it from now if already running.
    ArmTimer,
    /// Terminal: close the connection (once) and stop the event loop.
    Close(CloseReason),
}

/// The session lifecycle driver.  See the module docs for the full diagram.
#[derive(Debug)]
pub struct SessionMachine {
    state: SessionState,
}

impl SessionMachine {
    /// Creates a machine in the initial `Active` state.
    ///
    /// The handshake is not modelled here: it happens before the event loop
    /// starts, and its failure means the session never reaches `Active` at
    /// all.
    pub fn new() -> Self {
        Self {
            state: SessionState::Active,
        }
    }

    /// The current lifecycle phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Applies one event and returns the action the caller must perform.
    ///
    /// Total over all state/event pairs.  Once `Closed`, every further event
    /// is absorbed with [`Action::Continue`], which is what makes the close
    /// prescription unique: [`Action::Close`] is returned at most once over
    /// the lifetime of a machine.
    pub fn apply(&mut self, event: SessionEvent) -> Action {
        use SessionEvent::*;
        use SessionState::*;

        match (self.state, event) {
            // Terminal state absorbs everything, including late pump signals.
            (Closed, _) => Action::Continue,

            (_, Disconnect) => {
                self.state = Closed;
                Action::Close(CloseReason::RemoteDisconnect)
            }
            (_, WriteFailed) => {
                self.state = Closed;
                Action::Close(CloseReason::WriteError)
            }

            (Active, InputEof) => {
                self.state = DrainingAfterEof;
                Action::ArmTimer
            }
            // The pump emits EOF once; a duplicate is harmless.
            (DrainingAfterEof, InputEof) => Action::Continue,

            // Trailing server output keeps the session alive a little longer.
            (DrainingAfterEof, InboundData) => Action::ArmTimer,

            (DrainingAfterEof, TimerElapsed) => {
                self.state = Closed;
                Action::Close(CloseReason::InactivityTimeout)
            }
            // The timer is only armed while draining; a stale expiry that
            // raced an earlier event changes nothing.
            (Active, TimerElapsed) => Action::Continue,

            // Data in either direction while Active, and outbound data while
            // draining, pass straight through.
            (_, OutboundData | InboundData) => Action::Continue,
        }
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
