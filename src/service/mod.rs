//! The API service dispatcher
//!
//! [`ApiService`] executes one HTTP call end-to-end: validate the request,
//! resolve the URL, dress the request, invoke the transport under a hard
//! deadline, classify the response, and decode the payload. Every public
//! operation returns a `Result`; nothing escapes as a panic.

mod api;
mod types;

pub use api::ApiService;
pub use types::{CancelSignal, ErrorResponse};

#[cfg(test)]
mod tests;
