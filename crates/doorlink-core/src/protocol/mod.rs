//! Protocol module containing the handshake encoder.

pub mod handshake;

pub use handshake::encode_handshake;
