//! Destination resolution and the relay byte pumps.
//!
//! # Portability note
//!
//! Everything here uses only the portable `tokio::net` API.  Name resolution
//! goes through the system resolver via [`tokio::net::lookup_host`], so IP
//! literals, `/etc/hosts` entries, and DNS names all behave exactly as they
//! do for any other tool on the machine.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::lookup_host;
use tracing::debug;

pub mod pumps;

pub use pumps::{pump_local_input, pump_server_data, InputEvent, ServerEvent};

/// Errors from turning a host/port pair into a socket address.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The system resolver reported a failure (unknown host, malformed
    /// literal, no resolver available).
    #[error("failed to resolve \"{host}:{port}\": {source}")]
    Lookup {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Resolution succeeded but produced an empty address list.
    #[error("\"{host}:{port}\" did not resolve to any address")]
    NoAddresses { host: String, port: u16 },
}

/// Resolves `host:port` to the single socket address the session will use.
///
/// When the name maps to several addresses the first one wins; no fallback
/// or retry across the remaining addresses is attempted.  Repeated calls may
/// legitimately return different addresses if the underlying name resolution
/// changes.
///
/// # Errors
///
/// Returns [`ResolveError`] when the host cannot be resolved at all or
/// resolves to nothing usable.
pub async fn resolve_destination(host: &str, port: u16) -> Result<SocketAddr, ResolveError> {
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|source| ResolveError::Lookup {
            host: host.to_string(),
            port,
            source,
        })?;

    let destination = addrs.next().ok_or_else(|| ResolveError::NoAddresses {
        host: host.to_string(),
        port,
    })?;
    debug!("resolved {host}:{port} to {destination}");
    Ok(destination)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_ipv4_literal() {
        let addr = resolve_destination("127.0.0.1", 2513)
            .await
            .expect("loopback literal must resolve");
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 2513);
    }

    #[tokio::test]
    async fn test_resolves_ipv6_literal() {
        let addr = resolve_destination("::1", 23)
            .await
            .expect("IPv6 loopback literal must resolve");
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 23);
    }

    #[tokio::test]
    async fn test_port_is_preserved() {
        let addr = resolve_destination("127.0.0.1", 65535).await.unwrap();
        assert_eq!(addr.port(), 65535);
    }

    #[tokio::test]
    async fn test_empty_host_fails() {
        let err = resolve_destination("", 2513)
            .await
            .expect_err("empty host must not resolve");
        // The failure names the offending destination for the user.
        assert!(err.to_string().contains(":2513"));
    }
}
