//! Per-call request description and URL composition
//!
//! A [`UriRequest`] names the path segments and query parameters of one
//! logical call. It is resolved against a connector endpoint into a
//! validated `url::Url` just before dispatch.

mod compose;
mod types;

pub use compose::compose_url;
pub use types::UriRequest;
