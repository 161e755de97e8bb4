//! Integration tests for the doorlink-core handshake wire contract.
//!
//! These tests exercise the handshake encoder through the crate's public API
//! together with the configuration validation that guards its preconditions,
//! pinning the exact byte sequences a door server receives.

use std::time::Duration;

use doorlink_core::{encode_handshake, ConfigError, SessionConfig, DEFAULT_INACTIVITY_TIMEOUT};

/// Builds the config used by most tests; individual tests override fields.
fn base_config() -> SessionConfig {
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
fn test_wire_payload_without_door_code() {
    let cfg = base_config();
    assert!(cfg.validate().is_ok());

    let payload = encode_handshake(&cfg);

    // Four delimited fields: empty leader, local name, [tag]user, and an
    // empty terminal-type field closing the payload.
    assert_eq!(payload, b"\x00bob\x00[ABC]bob\x00\x00");
}

#[test]
fn test_wire_payload_with_door_code() {
    let mut cfg = base_config();
    cfg.door_code = Some("MRC".to_string());
    assert!(cfg.validate().is_ok());

    let payload = encode_handshake(&cfg);

    assert!(
        payload.ends_with(b"\x00xtrn=MRC\x00"),
        "payload must end with the xtrn field and its delimiter, got {payload:?}"
    );
    // The door code replaces the empty terminal-type field; no extra NUL
    // follows it.
    assert!(!payload.ends_with(b"\x00\x00"));
}

#[test]
fn test_wire_payload_is_stable_across_calls() {
    let cfg = base_config();
    let first = encode_handshake(&cfg);
    let second = encode_handshake(&cfg);
    assert_eq!(first, second);
}

#[test]
fn test_distinct_local_and_remote_identities() {
    let mut cfg = SessionConfig {
        local_name: "term7".to_string(),
        remote_user: "alice".to_string(),
        ..base_config()
    };
    cfg.door_code = Some("LORD".to_string());

    let payload = encode_handshake(&cfg);

    assert_eq!(payload, b"\x00term7\x00[ABC]alice\x00xtrn=LORD\x00");
}

#[test]
fn test_validation_blocks_handshake_corruption() {
    // A NUL inside any identity field would shift every later field as the
    // server parses the payload, so validation must refuse it up front.
    let mut cfg = base_config();
    cfg.remote_user = "bo\0b".to_string();

    assert_eq!(
        cfg.validate(),
        Err(ConfigError::EmbeddedNul {
            field: "remote username"
        })
    );
}

#[test]
fn test_custom_timeout_does_not_affect_payload() {
    let mut fast = base_config();
    fast.inactivity_timeout = Duration::from_millis(200);
    let slow = base_config();

    // The timeout governs shutdown, not the wire format.
    assert_eq!(encode_handshake(&fast), encode_handshake(&slow));
}
