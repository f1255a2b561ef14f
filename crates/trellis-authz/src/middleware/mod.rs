//! Protocol adapters.
//!
//! Each adapter sits in the transport's pipeline as a pass-through filter.
//! It never performs IO itself: the transport hands it the decoded inbound
//! message plus a read-only view of connection state, and applies the
//! verdict the adapter returns — forward the original message unchanged,
//! short-circuit with a rejection, or terminate the connection.

mod binary;
mod http;

pub use binary::{BinaryAuthorizationFilter, Verdict};
pub use http::{HttpAuthorizationFilter, HttpVerdict};

use std::net::SocketAddr;

/// Read-only view of per-connection transport state.
///
/// Owned by the session layer; the gateway only reads it.
pub trait ConnectionContext: Send + Sync {
    /// The authenticated principal, once the connection completed
    /// authentication.
    fn authenticated_user(&self) -> Option<String>;

    /// Remote peer address, if the transport knows it.
    fn client_address(&self) -> Option<SocketAddr>;
}
