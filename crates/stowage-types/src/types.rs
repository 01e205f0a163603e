//! Settings entry as it is cached and persisted

use serde::Serialize;

/// One persisted key/value pair
///
/// The key is the identity of the entry and never changes after creation.
/// The value is the raw stored representation, see `stowage_core::codec` for
/// how structured values are encoded into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingEntry {
	pub key: Box<str>,
	pub value: String,
	/// Whether the entry exists in the backing store
	#[serde(skip)]
	pub persisted: bool,
}

impl SettingEntry {
	/// Create an entry that has not been written to the store yet
	pub fn new(key: impl Into<Box<str>>, value: impl Into<String>) -> Self {
		Self { key: key.into(), value: value.into(), persisted: false }
	}

	/// Create an entry as read back from the store
	pub fn stored(key: impl Into<Box<str>>, value: impl Into<String>) -> Self {
		Self { key: key.into(), value: value.into(), persisted: true }
	}
}

// vim: ts=4
