//! Wire codec helpers.
//!
//! JSON is used by line-oriented hosts; MessagePack by hosts that pass
//! binary buffers. MessagePack structs are always encoded as maps so that
//! hosts see the same key names as in JSON.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Encode a value to a JSON string.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialisation fails.
pub fn encode_json<T: Serialize>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// Decode a value from JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if the text is not valid for `T`.
pub fn decode_json<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a value to MessagePack bytes.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialisation fails.
pub fn encode_msgpack<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(rmp_serde::to_vec_named(value)?)
}

/// Decode a value from MessagePack bytes.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if deserialisation fails.
pub fn decode_msgpack<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, CodecError> {
    Ok(rmp_serde::from_slice(bytes)?)
}
