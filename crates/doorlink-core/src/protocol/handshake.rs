//! Encoder for the rlogin-style door server handshake.
//!
//! Wire format (one payload, sent once, immediately after connect):
//! ```text
//! [NUL][localName][NUL]["["][tag]["]"][remoteUser][NUL][terminalField]
//! ```
//! where `terminalField` is `xtrn=<code>` followed by NUL when a door code is
//! configured, or a single bare NUL otherwise.  The bare NUL stands for an
//! empty terminal-type field so the server always parses the same number of
//! NUL-terminated fields.  The payload therefore always ends with NUL, and
//! with a door code of `MRC` looks like:
//! ```text
//! \0bob\0[ABC]bob\0xtrn=MRC\0
//! ```
//!
//! After this payload the connection carries an opaque byte stream in both
//! directions; nothing else is ever framed or escaped.

use crate::domain::session::SessionConfig;

/// Builds the handshake payload for `config`.
///
/// Pure and deterministic: the same config always yields the same bytes.  A
/// door code that is absent or empty is suppressed entirely (the two cases
/// are equivalent on the wire).
///
/// # Preconditions
///
/// `local_name`, `tag`, `remote_user`, and the door code must not contain
/// NUL bytes — NUL is the field delimiter, and an embedded one would shift
/// every following field as seen by the server.  This is the caller's
/// contract, checked by [`SessionConfig::validate`] at the configuration
/// boundary rather than re-checked here.
///
/// # Examples
///
/// ```rust
/// use doorlink_core::domain::session::{SessionConfig, DEFAULT_INACTIVITY_TIMEOUT};
/// use doorlink_core::protocol::handshake::encode_handshake;
///
/// let cfg = SessionConfig {
///     host: "bbs.example.com".to_string(),
///     port: 2513,
///     local_name: "bob".to_string(),
///     tag: "ABC".to_string(),
///     remote_user: "bob".to_string(),
///     door_code: None,
///     inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
/// };
/// assert_eq!(encode_handshake(&cfg), b"\x00bob\x00[ABC]bob\x00\x00");
/// ```
pub fn encode_handshake(config: &SessionConfig) -> Vec<u8> {
    // Leading NUL + three delimiters + brackets + the terminal field.
    let identity_len = config.local_name.len() + config.tag.len() + config.remote_user.len();
    let mut payload = Vec::with_capacity(identity_len + 16);

    payload.push(0x00);
    payload.extend_from_slice(config.local_name.as_bytes());
    payload.push(0x00);
    payload.push(b'[');
    payload.extend_from_slice(config.tag.as_bytes());
    payload.push(b']');
    payload.extend_from_slice(config.remote_user.as_bytes());
    payload.push(0x00);

    match config.door_code.as_deref() {
        Some(code) if !code.is_empty() => {
            payload.extend_from_slice(b"xtrn=");
            payload.extend_from_slice(code.as_bytes());
            payload.push(0x00);
        }
        // No door code: an empty terminal-type field, delimiter only.
        _ => payload.push(0x00),
    }

    payload
}

// ── Tests ─────────────────────────────────────────────────────────────────────
