//! Connector configuration
//!
//! A [`Connector`] describes how to reach and authenticate against one
//! backend: endpoint, auth mode and credentials, default headers, injected
//! body properties, timeout, and codec settings. It is constructed once and
//! read-only for the lifetime of an `ApiService`.

mod types;

pub use types::{AuthMode, Connector, ConnectorBuilder};

#[cfg(test)]
mod tests;
