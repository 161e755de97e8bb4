//! Session configuration types.
//!
//! [`SessionConfig`] is the single source of truth for one relay session: who
//! we are, where we are connecting, and how long the post-EOF drain window
//! lasts.  It is built once by the configuration loader (the CLI binary in
//! production, a literal struct in tests), validated, and then treated as
//! read-only for the life of the session.
//!
//! # Design rationale
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! variable reads inside the domain) makes the relay engine easy to embed in
//! tests and in larger front ends.  The infrastructure layer is responsible
//! for populating the struct from CLI args or environment variables and for
//! calling [`SessionConfig::validate`] before handing it to the engine.

use std::time::Duration;

use thiserror::Error;

/// How long the session waits for trailing server output after local input
/// reaches EOF before closing on its own.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(1);

/// Errors produced by [`SessionConfig::validate`].
///
/// Each variant names the offending field so the configuration loader can
/// print an actionable message before anything touches the network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The destination host is empty.
    #[error("host must not be empty")]
    EmptyHost,

    /// The destination port is zero.
    #[error("port must be greater than zero")]
    ZeroPort,

    /// The BBS tag is empty.
    #[error("tag must not be empty")]
    EmptyTag,

    /// The remote username is empty.
    #[error("remote username must not be empty")]
    EmptyRemoteUser,

    /// An identity field contains a NUL byte, which would corrupt the
    /// NUL-delimited handshake.
    #[error("{field} must not contain NUL bytes")]
    EmbeddedNul { field: &'static str },
}

/// All configuration for a single relay session.
///
/// Immutable after construction.  The handshake encoder reads the identity
/// fields; the relay orchestrator reads the destination and timeout.
///
/// # Example
///
/// ```rust
/// use doorlink_core::domain::session::{SessionConfig, DEFAULT_INACTIVITY_TIMEOUT};
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
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Hostname or IP literal of the remote server.
    pub host: String,

    /// TCP port of the remote server.  Must be non-zero.
    pub port: u16,

    /// Local display name sent as the first handshake field.
    ///
    /// May equal `remote_user` (the common single-identity case) but is a
    /// distinct field on the wire.  May be empty; must not contain NUL.
    pub local_name: String,

    /// BBS tag, sent inside square brackets ahead of the remote username.
    /// The brackets themselves are added by the encoder.
    pub tag: String,

    /// Username presented to the remote server.
    pub remote_user: String,

    /// Optional door code selecting a sub-application on the server
    /// (`xtrn=<code>` in the handshake).
    ///
    /// `None` and `Some("")` mean the same thing: no door code, send an
    /// empty terminal-type field instead.  The configuration loader
    /// normalizes empty strings to `None`; the encoder tolerates both.
    pub door_code: Option<String>,

    /// How long to wait for trailing server output after local input EOF.
    pub inactivity_timeout: Duration,
}

impl SessionConfig {
    /// Checks the field invariants the relay engine relies on.
    ///
    /// Host, tag, and remote username must be non-empty, the port must be
    /// non-zero, and no identity field may contain a NUL byte (NUL is the
    /// handshake field delimiter).  The local display name is allowed to be
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] for the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.tag.is_empty() {
            return Err(ConfigError::EmptyTag);
        }
        if self.remote_user.is_empty() {
            return Err(ConfigError::EmptyRemoteUser);
        }

        let identity_fields = [
            ("local name", self.local_name.as_str()),
            ("tag", self.tag.as_str()),
            ("remote username", self.remote_user.as_str()),
            ("door code", self.door_code.as_deref().unwrap_or("")),
        ];
        for (field, value) in identity_fields {
            if value.contains('\0') {
                return Err(ConfigError::EmbeddedNul { field });
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// A config that passes validation; tests override single fields.
    fn valid_config() -> SessionConfig {
        SessionConfig {
            host: "bbs.example.com".to_string(),
            port: 2513,
            local_name: "bob".to_string(),
            tag: "ABC".to_string(),
            remote_user: "bob".to_string(),
            door_code: None,
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(valid_config().validate(), Ok(()));
    }

    #[test]
    fn test_empty_host_rejected() {
        // Arrange
        let mut cfg = valid_config();
        cfg.host = String::new();
        // Act / Assert
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyHost));
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut cfg = valid_config();
        cfg.port = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPort));
    }

    #[test]
    fn test_empty_tag_rejected() {
        let mut cfg = valid_config();
        cfg.tag = String::new();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyTag));
    }

    #[test]
    fn test_empty_remote_user_rejected() {
        let mut cfg = valid_config();
        cfg.remote_user = String::new();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyRemoteUser));
    }

    #[test]
    fn test_empty_local_name_allowed() {
        // Some callers have no separate local identity; the wire format
        // permits an empty first field.
        let mut cfg = valid_config();
        cfg.local_name = String::new();
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_nul_in_tag_rejected() {
        let mut cfg = valid_config();
        cfg.tag = "A\0C".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmbeddedNul { field: "tag" })
        );
    }

    #[test]
    fn test_nul_in_local_name_rejected() {
        let mut cfg = valid_config();
        cfg.local_name = "b\0b".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmbeddedNul { field: "local name" })
        );
    }

    #[test]
    fn test_nul_in_door_code_rejected() {
        let mut cfg = valid_config();
        cfg.door_code = Some("M\0C".to_string());
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmbeddedNul { field: "door code" })
        );
    }

    #[test]
    fn test_empty_door_code_allowed() {
        // Empty and absent door codes are equivalent; validation accepts both
        // and the encoder suppresses the xtrn field for both.
        let mut cfg = valid_config();
        cfg.door_code = Some(String::new());
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_default_timeout_is_one_second() {
        assert_eq!(DEFAULT_INACTIVITY_TIMEOUT, Duration::from_secs(1));
    }
}
