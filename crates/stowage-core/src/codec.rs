//! Stored value encoding
//!
//! Values are stored as strings. Strings are stored as-is, everything else as
//! compact JSON. Decoding tries JSON first and falls back to the raw string,
//! so plain values written by older code keep working.
//!
//! The encoding is lossy for strings that happen to be valid JSON: `"42"`
//! is stored as `42` and reads back as a number.

use serde::Serialize;
use serde_json::Value;

use crate::prelude::*;

/// Encode a value to its stored form
pub fn encode(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		// serde_json does not escape non-ASCII characters
		other => other.to_string(),
	}
}

/// Serialize an arbitrary value and encode it
pub fn encode_serializable<T: Serialize + ?Sized>(value: &T) -> StResult<String> {
	Ok(encode(&serde_json::to_value(value)?))
}

/// Decode a stored value, never failing
pub fn decode(raw: &str) -> Value {
	serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}


// vim: ts=4
