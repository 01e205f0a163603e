//! Common test utilities and helpers
//!
//! Shared store wrappers and setup used by the manager integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use stowage_core::{MemoryStore, SettingsManager, SettingsOpts};
use stowage_types::config_ns::ConfigMap;
use stowage_types::prelude::*;
use stowage_types::store_adapter::SettingsStore;

/// Initialize tracing output for tests that need it
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

/// Memory store that can be told to fail and counts store calls
#[derive(Debug, Default)]
pub struct FlakyStore {
	pub inner: MemoryStore,
	pub fail_delete: AtomicBool,
	pub fail_save: AtomicBool,
	pub list_calls: AtomicUsize,
	pub delete_calls: AtomicUsize,
}

impl FlakyStore {
	pub fn with_entries(entries: &[(&str, &str)]) -> Self {
		Self { inner: MemoryStore::with_entries(entries.iter().copied()), ..Default::default() }
	}

	pub fn list_calls(&self) -> usize {
		self.list_calls.load(Ordering::SeqCst)
	}

	pub fn delete_calls(&self) -> usize {
		self.delete_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl SettingsStore for FlakyStore {
	async fn list_settings(&self) -> StResult<Vec<SettingEntry>> {
		self.list_calls.fetch_add(1, Ordering::SeqCst);
		self.inner.list_settings().await
	}

	async fn read_setting(&self, key: &str) -> StResult<Option<SettingEntry>> {
		self.inner.read_setting(key).await
	}

	async fn create_setting(&self, entry: &SettingEntry) -> StResult<()> {
		if self.fail_save.load(Ordering::SeqCst) {
			return Err(Error::DbError);
		}
		self.inner.create_setting(entry).await
	}

	async fn update_setting(&self, entry: &SettingEntry) -> StResult<()> {
		if self.fail_save.load(Ordering::SeqCst) {
			return Err(Error::DbError);
		}
		self.inner.update_setting(entry).await
	}

	async fn delete_setting(&self, key: &str) -> StResult<()> {
		self.delete_calls.fetch_add(1, Ordering::SeqCst);
		if self.fail_delete.load(Ordering::SeqCst) {
			return Err(Error::DbError);
		}
		self.inner.delete_setting(key).await
	}

	fn subscribe_saved(&self) -> flume::Receiver<SettingEntry> {
		self.inner.subscribe_saved()
	}
}

/// Manager over a flaky store with its own config map
pub fn create_test_manager(
	entries: &[(&str, &str)],
	opts: SettingsOpts,
) -> (SettingsManager, Arc<FlakyStore>, ConfigMap) {
	let store = Arc::new(FlakyStore::with_entries(entries));
	let config = ConfigMap::new();
	let manager = SettingsManager::new(store.clone(), Arc::new(config.clone()), opts);
	(manager, store, config)
}

/// Options with both auto-save flags off
pub fn manual_save_opts() -> SettingsOpts {
	SettingsOpts { auto_save_on_set: false, auto_create_on_set: false, ..Default::default() }
}

// vim: ts=4
