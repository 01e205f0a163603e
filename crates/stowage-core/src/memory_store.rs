//! In-memory `SettingsStore`
//!
//! Keeps entries in insertion order. Useful for tests and for hosts that do
//! not need durable settings.

use async_trait::async_trait;
use parking_lot::RwLock;

use stowage_types::notify::SavedNotifier;
use stowage_types::store_adapter::SettingsStore;

use crate::prelude::*;

#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: RwLock<Vec<(Box<str>, String)>>,
	saved: SavedNotifier,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a store pre-populated with raw key/value pairs
	pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<Box<str>>,
		V: Into<String>,
	{
		let store = Self::new();
		{
			let mut stored = store.entries.write();
			for (key, value) in entries {
				let key = key.into();
				let value = value.into();
				match stored.iter_mut().find(|(k, _)| *k == key) {
					Some(slot) => slot.1 = value,
					None => stored.push((key, value)),
				}
			}
		}
		store
	}

	/// Raw stored value, bypassing the adapter interface
	pub fn raw(&self, key: &str) -> Option<String> {
		self.entries.read().iter().find(|(k, _)| &**k == key).map(|(_, v)| v.clone())
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

#[async_trait]
impl SettingsStore for MemoryStore {
	async fn list_settings(&self) -> StResult<Vec<SettingEntry>> {
		Ok(self
			.entries
			.read()
			.iter()
			.map(|(key, value)| SettingEntry::stored(key.clone(), value.clone()))
			.collect())
	}

	async fn read_setting(&self, key: &str) -> StResult<Option<SettingEntry>> {
		Ok(self.raw(key).map(|value| SettingEntry::stored(key, value)))
	}

	async fn create_setting(&self, entry: &SettingEntry) -> StResult<()> {
		{
			let mut entries = self.entries.write();
			if entries.iter().any(|(k, _)| *k == entry.key) {
				return Err(Error::ValidationError(format!(
					"Setting '{}' already exists",
					entry.key
				)));
			}
			entries.push((entry.key.clone(), entry.value.clone()));
		}
		self.saved.notify(&SettingEntry::stored(entry.key.clone(), entry.value.clone()));
		Ok(())
	}

	async fn update_setting(&self, entry: &SettingEntry) -> StResult<()> {
		{
			let mut entries = self.entries.write();
			let slot = entries.iter_mut().find(|(k, _)| *k == entry.key).ok_or(Error::NotFound)?;
			slot.1.clone_from(&entry.value);
		}
		self.saved.notify(&SettingEntry::stored(entry.key.clone(), entry.value.clone()));
		Ok(())
	}

	async fn delete_setting(&self, key: &str) -> StResult<()> {
		self.entries.write().retain(|(k, _)| &**k != key);
		Ok(())
	}

	fn subscribe_saved(&self) -> flume::Receiver<SettingEntry> {
		self.saved.subscribe()
	}
}


// vim: ts=4
