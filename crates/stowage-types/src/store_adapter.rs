//! Adapter that persists settings entries
//!
//! The store owns the durable state. The core keeps an in-memory snapshot and
//! only talks to the store when loading, saving or deleting.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait SettingsStore: Debug + Send + Sync {
	/// Fetch every entry, in store order
	async fn list_settings(&self) -> StResult<Vec<SettingEntry>>;

	/// Read a single entry by key
	async fn read_setting(&self, key: &str) -> StResult<Option<SettingEntry>>;

	/// Insert a new entry
	///
	/// Must notify saved subscribers after the insert succeeded.
	async fn create_setting(&self, entry: &SettingEntry) -> StResult<()>;

	/// Overwrite the value of an existing entry
	///
	/// Returns `Error::NotFound` if no entry has this key. Must notify saved
	/// subscribers after the update succeeded.
	async fn update_setting(&self, entry: &SettingEntry) -> StResult<()>;

	/// Delete an entry by key
	async fn delete_setting(&self, key: &str) -> StResult<()>;

	/// Subscribe to entries saved through `create_setting` / `update_setting`
	fn subscribe_saved(&self) -> flume::Receiver<SettingEntry>;
}

// vim: ts=4
