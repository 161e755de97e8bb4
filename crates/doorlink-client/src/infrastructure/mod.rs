//! Infrastructure layer for the Doorlink client.
//!
//! Contains the network-facing adapters: destination resolution and the two
//! byte pumps that feed the relay loop.
//!
//! **Dependency rule**: this layer may depend on `doorlink_core`, but MUST
//! NOT be imported by the domain layer.

pub mod network;
