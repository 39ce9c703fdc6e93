//! Request dressing
//!
//! Turns a connector plus per-call inputs into a fully-dressed outgoing
//! request: Authorization header, default headers, accept flag, and JSON
//! body extension.

mod dress;

pub use dress::{authorization, basic_credentials, dress, extend_body};
