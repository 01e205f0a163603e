//! In-memory snapshot of all settings entries
//!
//! The snapshot is the single source for reads. It is filled from the store
//! once (or again when forced) and written through to the store on `set`
//! depending on the save flags.

use serde_json::{Map, Value};
use std::sync::Arc;

use stowage_types::store_adapter::SettingsStore;

use crate::codec;
use crate::opts::SettingsOpts;
use crate::prelude::*;

pub struct SettingsCache {
	store: Arc<dyn SettingsStore>,
	entries: Vec<SettingEntry>,
	loaded: bool,
}

impl std::fmt::Debug for SettingsCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingsCache")
			.field("store", &self.store)
			.field("entries", &self.entries.len())
			.field("loaded", &self.loaded)
			.finish()
	}
}

impl SettingsCache {
	pub fn new(store: Arc<dyn SettingsStore>) -> Self {
		Self { store, entries: Vec::new(), loaded: false }
	}

	pub fn store(&self) -> &Arc<dyn SettingsStore> {
		&self.store
	}

	/// Use another store for subsequent operations. The snapshot is kept.
	pub fn set_store(&mut self, store: Arc<dyn SettingsStore>) {
		self.store = store;
	}

	pub fn is_loaded(&self) -> bool {
		self.loaded
	}

	/// Replace the snapshot with the store contents
	///
	/// Returns `false` without touching the store when already loaded and not
	/// forced.
	pub async fn load(&mut self, force: bool) -> StResult<bool> {
		if self.loaded && !force {
			debug!("Settings already loaded, skipping");
			return Ok(false);
		}

		let fetched = self.store.list_settings().await?;
		let mut entries: Vec<SettingEntry> = Vec::with_capacity(fetched.len());
		for entry in fetched {
			match entries.iter_mut().find(|e| e.key == entry.key) {
				Some(existing) => {
					warn!("Store returned setting '{}' twice, keeping the last", entry.key);
					*existing = entry;
				}
				None => entries.push(entry),
			}
		}

		info!("Loaded {} settings", entries.len());
		self.entries = entries;
		self.loaded = true;
		Ok(true)
	}

	pub fn entries(&self) -> &[SettingEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn position(&self, key: &str) -> Option<usize> {
		self.entries.iter().position(|e| &*e.key == key)
	}

	pub fn entry(&self, key: &str) -> Option<&SettingEntry> {
		self.position(key).map(|idx| &self.entries[idx])
	}

	pub fn contains(&self, key: &str) -> bool {
		self.position(key).is_some()
	}

	/// Decoded value of a cached entry
	pub fn get(&self, key: &str) -> Option<Value> {
		match self.entry(key) {
			Some(entry) => {
				debug!("Setting cache hit: {}", key);
				Some(codec::decode(&entry.value))
			}
			None => {
				debug!("Setting cache miss: {}", key);
				None
			}
		}
	}

	/// Raw values of every cached entry, in snapshot order
	pub fn all(&self) -> Map<String, Value> {
		self.entries
			.iter()
			.map(|e| (e.key.to_string(), Value::String(e.value.clone())))
			.collect()
	}

	/// Set an entry in the snapshot and persist it if the flags say so
	///
	/// Known keys are saved when `auto_save_on_set` or `force_save` is set.
	/// New keys are saved when `auto_create_on_set` or both `force_save` and
	/// `create_if_missing` are set; they join the snapshot either way.
	/// Returns whether the entry was written to the store.
	pub async fn set(
		&mut self,
		key: &str,
		value: &Value,
		force_save: bool,
		create_if_missing: bool,
		opts: &SettingsOpts,
	) -> StResult<bool> {
		let raw = codec::encode(value);

		if let Some(idx) = self.position(key) {
			let entry = &mut self.entries[idx];
			entry.value = raw;
			if opts.auto_save_on_set || force_save {
				save(self.store.as_ref(), entry).await?;
				return Ok(true);
			}
			return Ok(false);
		}

		let mut entry = SettingEntry::new(key, raw);
		let saved = if opts.auto_create_on_set || (force_save && create_if_missing) {
			save(self.store.as_ref(), &mut entry).await?;
			true
		} else {
			false
		};
		self.entries.push(entry);
		Ok(saved)
	}

	/// Remove an entry from the snapshot, and from the store if `permanent`
	///
	/// A failing store delete is logged and ignored: the entry stays removed
	/// from the snapshot even though the store may still hold it until the
	/// next forced load.
	pub async fn forget(&mut self, key: &str, permanent: bool) -> Option<SettingEntry> {
		let idx = self.position(key)?;
		let entry = self.entries.remove(idx);

		if permanent && entry.persisted {
			let _ = self
				.store
				.delete_setting(&entry.key)
				.await
				.inspect_err(|err| warn!("Failed to delete setting '{}': {}", entry.key, err));
		}

		Some(entry)
	}
}

/// Update a persisted entry, create a new one
///
/// A persisted entry missing from the store (e.g. after switching stores) is
/// created instead.
async fn save(store: &dyn SettingsStore, entry: &mut SettingEntry) -> StResult<()> {
	if entry.persisted {
		match store.update_setting(entry).await {
			Err(Error::NotFound) => {
				debug!("Setting '{}' missing from store, creating it", entry.key);
			}
			res => return res,
		}
	}
	store.create_setting(entry).await?;
	entry.persisted = true;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory_store::MemoryStore;
	use serde_json::json;

	fn cache_with(store: &Arc<MemoryStore>) -> SettingsCache {
		SettingsCache::new(store.clone())
	}

	fn manual() -> SettingsOpts {
		SettingsOpts { auto_save_on_set: false, auto_create_on_set: false, ..Default::default() }
	}

	#[tokio::test]
	async fn test_load_once_unless_forced() {
		let store = Arc::new(MemoryStore::with_entries([("a", "1")]));
		let mut cache = cache_with(&store);

		assert!(cache.load(false).await.unwrap());
		assert_eq!(cache.len(), 1);

		store.create_setting(&SettingEntry::new("b", "2")).await.unwrap();
		assert!(!cache.load(false).await.unwrap());
		assert_eq!(cache.len(), 1);

		assert!(cache.load(true).await.unwrap());
		assert_eq!(cache.len(), 2);
	}

	#[tokio::test]
	async fn test_load_empty_store_counts_as_loaded() {
		let store = Arc::new(MemoryStore::new());
		let mut cache = cache_with(&store);

		assert!(cache.load(false).await.unwrap());
		assert!(cache.is_loaded());
		assert!(!cache.load(false).await.unwrap());
	}

	#[tokio::test]
	async fn test_get_decodes_and_all_is_raw() {
		let store = Arc::new(MemoryStore::with_entries([
			("mail", r#"{"port":25}"#),
			("title", "Hello"),
		]));
		let mut cache = cache_with(&store);
		cache.load(false).await.unwrap();

		assert_eq!(cache.get("mail"), Some(json!({"port": 25})));
		assert_eq!(cache.get("title"), Some(json!("Hello")));
		assert_eq!(cache.get("missing"), None);

		let all = cache.all();
		let keys: Vec<_> = all.keys().cloned().collect();
		assert_eq!(keys, vec!["mail", "title"]);
		assert_eq!(all["mail"], json!(r#"{"port":25}"#));
	}

	#[tokio::test]
	async fn test_set_respects_save_flags() {
		let store = Arc::new(MemoryStore::with_entries([("known", "old")]));
		let mut cache = cache_with(&store);
		cache.load(false).await.unwrap();
		let opts = manual();

		assert!(!cache.set("known", &json!("new"), false, true, &opts).await.unwrap());
		assert_eq!(store.raw("known").as_deref(), Some("old"));
		assert_eq!(cache.get("known"), Some(json!("new")));

		assert!(cache.set("known", &json!("newer"), true, false, &opts).await.unwrap());
		assert_eq!(store.raw("known").as_deref(), Some("newer"));

		assert!(!cache.set("fresh", &json!(1), true, false, &opts).await.unwrap());
		assert!(store.raw("fresh").is_none());
		assert!(cache.contains("fresh"));

		// saving an unsaved entry creates it
		assert!(cache.set("fresh", &json!(2), true, false, &opts).await.unwrap());
		assert_eq!(store.raw("fresh").as_deref(), Some("2"));
	}

	#[tokio::test]
	async fn test_save_after_store_switch_creates_entry() {
		let old = Arc::new(MemoryStore::with_entries([("k", "old")]));
		let mut cache = cache_with(&old);
		cache.load(false).await.unwrap();
		let new = Arc::new(MemoryStore::new());
		cache.set_store(new.clone());

		assert!(cache.set("k", &json!("new"), false, true, &SettingsOpts::default()).await.unwrap());

		assert_eq!(new.raw("k").as_deref(), Some("new"));
		assert_eq!(old.raw("k").as_deref(), Some("old"));
		assert!(cache.entry("k").is_some_and(|e| e.persisted));
	}

	#[tokio::test]
	async fn test_one_entry_per_key() {
		let store = Arc::new(MemoryStore::new());
		let mut cache = cache_with(&store);
		let opts = SettingsOpts::default();

		for i in 0..3 {
			cache.set("a", &json!(i), false, true, &opts).await.unwrap();
			cache.set("b", &json!(i), false, true, &opts).await.unwrap();
		}
		assert_eq!(cache.len(), 2);
		assert_eq!(store.len(), 2);
		assert_eq!(cache.get("a"), Some(json!(2)));
	}

	#[tokio::test]
	async fn test_failed_create_is_not_cached() {
		let store = Arc::new(MemoryStore::with_entries([("dup", "x")]));
		let mut cache = cache_with(&store);
		let opts = SettingsOpts::default();

		assert!(cache.set("dup", &json!("y"), false, true, &opts).await.is_err());
		assert!(!cache.contains("dup"));
	}

	#[tokio::test]
	async fn test_forget() {
		let store = Arc::new(MemoryStore::with_entries([("a", "1"), ("b", "2")]));
		let mut cache = cache_with(&store);
		cache.load(false).await.unwrap();

		assert!(cache.forget("missing", true).await.is_none());

		let removed = cache.forget("a", false).await.unwrap();
		assert_eq!(&*removed.key, "a");
		assert!(!cache.contains("a"));
		assert_eq!(store.raw("a").as_deref(), Some("1"));

		cache.forget("b", true).await.unwrap();
		assert!(store.raw("b").is_none());
		assert!(cache.is_empty());
	}
}

// vim: ts=4
