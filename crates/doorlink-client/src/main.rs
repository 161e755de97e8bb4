//! Doorlink client — entry point.
//!
//! This binary connects standard input/output to a BBS door server over TCP.
//! It sends the rlogin-style NUL-delimited identity handshake once, then
//! relays raw bytes in both directions until the server hangs up, a relay
//! write fails, or local input ends and the drain window expires.
//!
//! # Usage
//!
//! ```text
//! doorlink-client [OPTIONS] --host <HOST> --port <PORT> --name <NAME> --tag <TAG>
//!
//! Options:
//!   --host <HOST>            Door server hostname or IP
//!   --port <PORT>            Door server TCP port
//!   --name <NAME>            Username presented to the server
//!   --local-name <NAME>      Local display name in the handshake [default: value of --name]
//!   --tag <TAG>              BBS tag, without brackets
//!   --xtrn <CODE>            Door code (xtrn) selecting a specific door
//!   --timeout-ms <MS>        Post-EOF inactivity timeout in milliseconds [default: 1000]
//! ```
//!
//! # Environment variable overrides
//!
//! Every flag can also be supplied through the environment.  CLI args take
//! precedence when both are present.
//!
//! | Variable              | Description                             |
//! |-----------------------|-----------------------------------------|
//! | `DOORLINK_HOST`       | Door server hostname or IP              |
//! | `DOORLINK_PORT`       | Door server TCP port                    |
//! | `DOORLINK_NAME`       | Username presented to the server        |
//! | `DOORLINK_LOCAL_NAME` | Local display name in the handshake     |
//! | `DOORLINK_TAG`        | BBS tag, without brackets               |
//! | `DOORLINK_XTRN`       | Door code (empty means none)            |
//! | `DOORLINK_TIMEOUT_MS` | Post-EOF inactivity timeout (ms)        |
//!
//! # How the session ends
//!
//! Exactly one of three ways, each logged distinctly: the server closed the
//! connection, the post-EOF inactivity timeout expired, or a relay write
//! failed.  All three are normal process exits — only failures *before* the
//! relay starts (resolve, connect, handshake) exit non-zero.
//!
//! The exit itself is explicit.  Standard input is serviced by blocking
//! reads on the runtime's thread pool, and a read that is already in flight
//! cannot be cancelled — an ordinary return from `main` would sit in runtime
//! shutdown until the user pressed one more key.  Once the outcome is
//! logged there is nothing left to wait for, so the binary terminates
//! immediately.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use doorlink_client::application::relay::RelaySession;
use doorlink_client::infrastructure::network::resolve_destination;
use doorlink_core::{CloseReason, SessionConfig, DEFAULT_INACTIVITY_TIMEOUT};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Doorlink terminal client.
///
/// Relays the local terminal to a BBS door server after an rlogin-style
/// handshake.
///
/// The `#[derive(Parser)]` macro from `clap` generates the argument parser
/// automatically from the struct fields and their `#[arg(...)]` attributes.
#[derive(Debug, Parser)]
#[command(
    name = "doorlink-client",
    about = "Connect a local terminal to a BBS door server over TCP",
    version
)]
struct Cli {
    /// Hostname or IP address of the door server.
    #[arg(long, env = "DOORLINK_HOST")]
    host: String,

    /// TCP port of the door server.
    #[arg(long, env = "DOORLINK_PORT")]
    port: u16,

    /// Username presented to the server.
    ///
    /// Also used as the local display name unless `--local-name` overrides it.
    #[arg(long, env = "DOORLINK_NAME")]
    name: String,

    /// Local display name sent as the first handshake field.
    ///
    /// Defaults to the value of `--name`; the two are distinct fields on the
    /// wire and may differ.
    #[arg(long, env = "DOORLINK_LOCAL_NAME")]
    local_name: Option<String>,

    /// BBS tag, without brackets (the handshake adds them).
    #[arg(long, env = "DOORLINK_TAG")]
    tag: String,

    /// Door code selecting a specific door on the server (`xtrn=<CODE>` in
    /// the handshake).
    ///
    /// Leave unset — or set to the empty string — to send an empty
    /// terminal-type field instead.
    #[arg(long, env = "DOORLINK_XTRN")]
    xtrn: Option<String>,

    /// How long to wait for trailing server output after local input reaches
    /// EOF, in milliseconds.
    ///
    /// The default mirrors the engine's own drain-window constant so the two
    /// cannot drift apart.
    #[arg(
        long,
        default_value_t = DEFAULT_INACTIVITY_TIMEOUT.as_millis() as u64,
        env = "DOORLINK_TIMEOUT_MS"
    )]
    timeout_ms: u64,
}

impl Cli {
    /// Converts the parsed CLI arguments into a validated [`SessionConfig`].
    ///
    /// This is where the empty-vs-absent door code distinction collapses
    /// (both become `None`) and where `--local-name` falls back to `--name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration violates a session
    /// invariant (empty tag, zero port, NUL bytes in an identity field, ...).
    fn into_session_config(self) -> anyhow::Result<SessionConfig> {
        let local_name = self.local_name.unwrap_or_else(|| self.name.clone());

        let config = SessionConfig {
            host: self.host,
            port: self.port,
            local_name,
            tag: self.tag,
            remote_user: self.name,
            door_code: self.xtrn.filter(|code| !code.is_empty()),
            inactivity_timeout: Duration::from_millis(self.timeout_ms),
        };
        config
            .validate()
            .context("invalid session configuration")?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised to format log output.  The log
///    level is controlled by the `RUST_LOG` environment variable (e.g.,
///    `RUST_LOG=debug`).
/// 2. CLI arguments are parsed with `clap` into a [`Cli`] struct and
///    converted into a validated [`SessionConfig`].
/// 3. The destination is resolved once.
/// 4. [`RelaySession::run`] connects, performs the handshake, and relays
///    stdin/stdout against the socket until the session ends.
/// 5. The outcome is logged and the process exits explicitly, without
///    waiting for the stdin read still parked on a pool thread.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `EnvFilter::try_from_default_env()` reads the `RUST_LOG` environment
    // variable.  If it is absent or invalid, we fall back to `info` level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // `Cli::parse()` reads from `std::env::args()` and exits with a usage
    // message if required arguments are missing or values are invalid.
    let cli = Cli::parse();
    let config = cli.into_session_config()?;

    info!(
        "doorlink starting — destination {}:{}, user {}",
        config.host, config.port, config.remote_user
    );

    // Resolve once; the session uses this single address with no fallback.
    let destination = resolve_destination(&config.host, config.port)
        .await
        .context("could not resolve the door server address")?;

    let session = RelaySession::new(destination, config);
    let reason = session
        .run(tokio::io::stdin(), tokio::io::stdout())
        .await
        .context("session ended before the relay became active")?;

    // One closing line per session, naming which of the three terminal
    // conditions actually happened.
    match reason {
        CloseReason::RemoteDisconnect => info!("session ended: server closed the connection"),
        CloseReason::InactivityTimeout => {
            info!("session ended: timed out waiting for a trailing server response")
        }
        CloseReason::WriteError => warn!("session ended: a relay write failed"),
    }

    // Aborting the input pump cancels its task, not the blocking stdin read
    // already in flight on the pool thread, and runtime shutdown waits for
    // that read.  Terminate here so the session's end is the process's end.
    std::process::exit(0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// The minimal valid argument list; tests append overrides.
    fn base_args() -> Vec<&'static str> {
        vec![
            "doorlink-client",
            "--host",
            "bbs.example.com",
            "--port",
            "2513",
            "--name",
            "bob",
            "--tag",
            "ABC",
        ]
    }

    #[test]
    fn test_cli_requires_host() {
        let result = Cli::try_parse_from([
            "doorlink-client",
            "--port",
            "2513",
            "--name",
            "bob",
            "--tag",
            "ABC",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_name() {
        let result = Cli::try_parse_from([
            "doorlink-client",
            "--host",
            "bbs.example.com",
            "--port",
            "2513",
            "--tag",
            "ABC",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_default_timeout_follows_the_core_default() {
        let cli = Cli::parse_from(base_args());
        // The flag default is derived from the engine constant, not written
        // out by hand, so the two must always agree.
        assert_eq!(
            u128::from(cli.timeout_ms),
            DEFAULT_INACTIVITY_TIMEOUT.as_millis()
        );

        let config = cli.into_session_config().unwrap();
        assert_eq!(config.inactivity_timeout, DEFAULT_INACTIVITY_TIMEOUT);
    }

    #[test]
    fn test_cli_xtrn_defaults_to_none() {
        let cli = Cli::parse_from(base_args());
        assert_eq!(cli.xtrn, None);
    }

    #[test]
    fn test_cli_timeout_override() {
        let mut args = base_args();
        args.extend(["--timeout-ms", "250"]);
        let cli = Cli::parse_from(args);
        assert_eq!(cli.timeout_ms, 250);
    }

    #[test]
    fn test_into_session_config_maps_fields() {
        // Arrange
        let mut args = base_args();
        args.extend(["--xtrn", "MRC"]);
        let cli = Cli::parse_from(args);

        // Act
        let config = cli.into_session_config().unwrap();

        // Assert
        assert_eq!(config.host, "bbs.example.com");
        assert_eq!(config.port, 2513);
        assert_eq!(config.tag, "ABC");
        assert_eq!(config.remote_user, "bob");
        assert_eq!(config.door_code.as_deref(), Some("MRC"));
        assert_eq!(config.inactivity_timeout, Duration::from_millis(1000));
    }

    #[test]
    fn test_name_is_reused_as_local_name_by_default() {
        let cli = Cli::parse_from(base_args());
        let config = cli.into_session_config().unwrap();
        assert_eq!(config.local_name, "bob");
        assert_eq!(config.remote_user, "bob");
    }

    #[test]
    fn test_local_name_override_is_kept_distinct() {
        let mut args = base_args();
        args.extend(["--local-name", "term7"]);
        let cli = Cli::parse_from(args);
        let config = cli.into_session_config().unwrap();
        assert_eq!(config.local_name, "term7");
        assert_eq!(config.remote_user, "bob");
    }

    #[test]
    fn test_empty_xtrn_is_normalized_to_none() {
        // An explicitly empty door code must behave exactly like an absent one.
        let mut args = base_args();
        args.extend(["--xtrn", ""]);
        let cli = Cli::parse_from(args);
        let config = cli.into_session_config().unwrap();
        assert_eq!(config.door_code, None);
    }

    #[test]
    fn test_timeout_ms_becomes_duration() {
        let mut args = base_args();
        args.extend(["--timeout-ms", "200"]);
        let cli = Cli::parse_from(args);
        let config = cli.into_session_config().unwrap();
        assert_eq!(config.inactivity_timeout, Duration::from_millis(200));
    }

    #[test]
    fn test_empty_tag_is_rejected_by_validation() {
        // clap accepts the empty string; the session invariants must not.
        let cli = Cli::parse_from([
            "doorlink-client",
            "--host",
            "bbs.example.com",
            "--port",
            "2513",
            "--name",
            "bob",
            "--tag",
            "",
        ]);
        assert!(cli.into_session_config().is_err());
    }

    #[test]
    fn test_zero_port_is_rejected_by_validation() {
        let cli = Cli::parse_from([
            "doorlink-client",
            "--host",
            "bbs.example.com",
            "--port",
            "0",
            "--name",
            "bob",
            "--tag",
            "ABC",
        ]);
        assert!(cli.into_session_config().is_err());
    }

    #[test]
    fn test_nul_in_name_is_rejected_by_validation() {
        let cli = Cli {
            host: "bbs.example.com".to_string(),
            port: 2513,
            name: "bo\0b".to_string(),
            local_name: None,
            tag: "ABC".to_string(),
            xtrn: None,
            timeout_ms: 1000,
        };
        assert!(cli.into_session_config().is_err());
    }
}
