//! JSON codec
//!
//! Owns encoding of request bodies and decoding of response payloads.
//! Encoding can suppress null object members, matching backends that
//! reject explicit nulls.

mod json;

pub use json::{CodecConfig, JsonCodec};
