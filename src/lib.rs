//! # anyclient
//!
//! A minimal, Rust-native HTTP client abstraction for typed API services.
//! Describe a backend once as a [`Connector`], then call it with typed
//! GET/POST/PUT/DELETE operations that always come back as a `Result`.
//!
//! ## Features
//!
//! - **URL Composition**: endpoint + path segments + query parameters,
//!   normalized and validated
//! - **Auth Injection**: Basic and Bearer, token preferred over credentials
//! - **Body Extension**: configured properties merged into every JSON body
//! - **Typed Results**: JSON, raw text, raw bytes, or no-body calls, each a
//!   dedicated call variant
//! - **Deadline/Cancel**: hard per-call timeout, distinguishable from
//!   cooperative cancellation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use anyclient::{ApiService, AuthMode, Connector, UriRequest};
//!
//! #[derive(serde::Deserialize)]
//! struct User { id: u64, name: String }
//!
//! #[tokio::main]
//! async fn main() -> anyclient::Result<()> {
//!     let connector = Connector::builder()
//!         .endpoint("https://svc.example/api")
//!         .auth(AuthMode::Bearer)
//!         .token("abc")
//!         .build();
//!
//!     let service = ApiService::new(connector);
//!     let request = UriRequest::new().segment("users").segment("1");
//!     let user: User = service.get(&request, false).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        ApiService                          │
//! │  get / get_text / get_bytes / get_unit                     │
//! │  post / put (+ _or_else error mapping)      delete         │
//! └───────────────┬────────────────────────────────────────────┘
//!                 │
//! ┌───────────┬───┴────────┬──────────────┬────────────────────┐
//! │  Request  │  Dressing  │    Codec     │     Transport      │
//! ├───────────┼────────────┼──────────────┼────────────────────┤
//! │ segments  │ auth header│ encode/decode│ fresh client/call  │
//! │ query     │ headers    │ drop nulls   │ timeout + cancel   │
//! │ compose   │ body merge │              │                    │
//! └───────────┴────────────┴──────────────┴────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for anyclient
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connector configuration
pub mod connector;

/// Per-call request description and URL composition
pub mod request;

/// JSON codec with null-suppression
pub mod codec;

/// Request dressing: auth, headers, body extension
pub mod http;

/// The API service dispatcher
pub mod service;

// ============================================================================
// Re-exports
// ============================================================================

pub use codec::{CodecConfig, JsonCodec};
pub use connector::{AuthMode, Connector, ConnectorBuilder};
pub use error::{Error, Result};
pub use request::UriRequest;
pub use service::{ApiService, CancelSignal, ErrorResponse};
pub use types::KeyValue;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
