//! Decode and validate MoQT wire messages.
//!
//! This crate parses the control plane, unidirectional data streams and
//! datagrams of Media over QUIC Transport against the v1 grammar, enforcing
//! both the per-message rules and the cross-message invariants that need
//! session state (request id ceilings, track alias uniqueness, the auth
//! token cache).
//!
//! It does not transport bytes and it does not encode messages; feed it a
//! buffer via [`Session::validate_control`], [`Session::validate_stream`]
//! or [`Session::validate_datagram`] and get back a [`Record`] or an
//! [`Error`] naming the violated rule.

pub mod coding;
pub mod data;
mod error;
pub mod ietf;
mod record;
mod session;

pub use error::*;
pub use record::*;
pub use session::*;
