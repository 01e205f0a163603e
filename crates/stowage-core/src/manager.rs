//! Settings manager
//!
//! Public entry point combining the cache, the bindings and the store's
//! saved notifications. Bindings are applied
//! - for every entry when the snapshot is (re)loaded,
//! - for every entry the store reports as saved,
//! - with a caller supplied fallback when a bound entry is forgotten.
//!
//! Entries that are only cached, never saved, do not reach the configuration.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use stowage_types::config_ns::ConfigNamespace;
use stowage_types::store_adapter::SettingsStore;

use crate::binding::BindingRegistry;
use crate::cache::SettingsCache;
use crate::codec;
use crate::opts::SettingsOpts;
use crate::prelude::*;
use crate::schema::SchemaGate;

#[derive(Debug)]
pub struct SettingsManager {
	opts: SettingsOpts,
	cache: SettingsCache,
	bindings: BindingRegistry,
	config: Arc<dyn ConfigNamespace>,
	saved: flume::Receiver<SettingEntry>,
	schema: Option<SchemaGate>,
	/// Deferred load waiting for the schema, with its force flag
	pending_load: Option<bool>,
}

impl SettingsManager {
	pub fn new(
		store: Arc<dyn SettingsStore>,
		config: Arc<dyn ConfigNamespace>,
		opts: SettingsOpts,
	) -> Self {
		let saved = store.subscribe_saved();
		Self {
			opts,
			cache: SettingsCache::new(store),
			bindings: BindingRegistry::new(),
			config,
			saved,
			schema: None,
			pending_load: None,
		}
	}

	/// Attach the schema-ready gate used when `defer_load_until_schema_ready` is set
	pub fn with_schema_gate(mut self, gate: SchemaGate) -> Self {
		self.schema = Some(gate);
		self
	}

	pub fn opts(&self) -> &SettingsOpts {
		&self.opts
	}

	pub fn opts_mut(&mut self) -> &mut SettingsOpts {
		&mut self.opts
	}

	pub fn config(&self) -> &Arc<dyn ConfigNamespace> {
		&self.config
	}

	pub fn store(&self) -> &Arc<dyn SettingsStore> {
		self.cache.store()
	}

	pub fn is_loaded(&self) -> bool {
		self.cache.is_loaded()
	}

	/// Whether a load is waiting for the schema-ready signal
	pub fn has_pending_load(&self) -> bool {
		self.pending_load.is_some()
	}

	fn schema_is_ready(&self) -> bool {
		self.schema.as_ref().is_none_or(SchemaGate::is_ready)
	}

	/// Application start hook: loads unless `auto_load_on_boot` is off
	pub async fn boot(&mut self) -> StResult<&mut Self> {
		if self.opts.auto_load_on_boot {
			self.load(false).await
		} else {
			Ok(self)
		}
	}

	/// Load all entries from the store and apply their bindings
	///
	/// Does nothing if already loaded, unless `force` is set. In deferred mode
	/// with an unfired schema gate the load is recorded and executed by
	/// `schema_ready()` instead.
	pub async fn load(&mut self, force: bool) -> StResult<&mut Self> {
		if self.opts.defer_load_until_schema_ready && !self.schema_is_ready() {
			debug!("Deferring settings load until the store schema is ready");
			self.pending_load = Some(self.pending_load.unwrap_or(false) || force);
			return Ok(self);
		}

		let force = self.pending_load.take().unwrap_or(false) || force;
		self.execute_load(force).await?;
		Ok(self)
	}

	/// Wait for the schema-ready signal, then run the deferred load if any
	pub async fn schema_ready(&mut self) -> StResult<&mut Self> {
		if let Some(gate) = self.schema.as_mut() {
			gate.wait().await?;
		}
		if let Some(force) = self.pending_load.take() {
			self.execute_load(force).await?;
		}
		Ok(self)
	}

	/// Saved events are only drained when the snapshot is actually loaded, so
	/// a skipped load leaves the configuration untouched.
	async fn execute_load(&mut self, force: bool) -> StResult<()> {
		if self.cache.load(force).await? {
			self.apply_saved();
			for entry in self.cache.entries() {
				self.bindings.apply(&entry.key, codec::decode(&entry.value), self.config.as_ref());
			}
		}
		Ok(())
	}

	/// Apply bindings for every entry the store reported as saved
	fn apply_saved(&self) {
		for entry in self.saved.try_iter() {
			self.bindings.apply(&entry.key, codec::decode(&entry.value), self.config.as_ref());
		}
	}

	/// Switch to another store for subsequent operations
	///
	/// The loaded snapshot is kept as is.
	pub fn set_store(&mut self, store: Arc<dyn SettingsStore>) -> &mut Self {
		self.apply_saved();
		info!("Switching settings store to {:?}", store);
		self.saved = store.subscribe_saved();
		self.cache.set_store(store);
		self
	}

	/// Raw values of all cached entries, in load order
	pub fn all(&self) -> Map<String, Value> {
		self.cache.all()
	}

	pub fn has(&self, key: &str) -> bool {
		self.cache.contains(key)
	}

	/// Decoded value, or `default` if the key is not cached
	pub fn get(&self, key: &str, default: impl Into<Value>) -> Value {
		self.cache.get(key).unwrap_or_else(|| default.into())
	}

	pub fn get_opt(&self, key: &str) -> Option<Value> {
		self.cache.get(key)
	}

	/// Decoded value deserialized into `T`
	///
	/// Returns `Ok(None)` for missing keys and a `ValidationError` if the value
	/// has a different shape.
	pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> StResult<Option<T>> {
		match self.cache.get(key) {
			Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
				Error::ValidationError(format!("Setting '{}' has unexpected type: {}", key, e))
			}),
			None => Ok(None),
		}
	}

	pub fn get_str(&self, key: &str) -> Option<String> {
		match self.cache.get(key)? {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn get_bool(&self, key: &str) -> Option<bool> {
		self.cache.get(key)?.as_bool()
	}

	pub fn get_i64(&self, key: &str) -> Option<i64> {
		self.cache.get(key)?.as_i64()
	}

	/// Set a value, saving according to the auto-save/auto-create flags
	pub async fn set(&mut self, key: &str, value: impl Into<Value>) -> StResult<&mut Self> {
		self.set_with(key, value, false, true).await
	}

	/// Set a value
	///
	/// `save` forces persisting the entry, `should_create` allows that forced
	/// save to create a new entry. Store errors during the save propagate.
	pub async fn set_with(
		&mut self,
		key: &str,
		value: impl Into<Value>,
		save: bool,
		should_create: bool,
	) -> StResult<&mut Self> {
		let value = value.into();
		let res = self.cache.set(key, &value, save, should_create, &self.opts).await;
		self.apply_saved();
		res?;
		Ok(self)
	}

	/// Serialize any value and set it
	pub async fn set_as<T: Serialize + ?Sized>(
		&mut self,
		key: &str,
		value: &T,
	) -> StResult<&mut Self> {
		let value = serde_json::to_value(value)?;
		self.set(key, value).await
	}

	/// Forget a key and delete it from the store
	pub async fn forget(&mut self, key: &str) -> &mut Self {
		self.forget_inner(key, true, None::<fn() -> Value>).await
	}

	/// Forget a key, deleting it from the store only if `permanent`
	pub async fn forget_with(&mut self, key: &str, permanent: bool) -> &mut Self {
		self.forget_inner(key, permanent, None::<fn() -> Value>).await
	}

	/// Forget a key and reset its bound configuration to `fallback()`
	///
	/// `fallback` is only called when the key was cached and is bound.
	pub async fn forget_with_fallback<F>(
		&mut self,
		key: &str,
		permanent: bool,
		fallback: F,
	) -> &mut Self
	where
		F: FnOnce() -> Value,
	{
		self.forget_inner(key, permanent, Some(fallback)).await
	}

	async fn forget_inner<F>(&mut self, key: &str, permanent: bool, fallback: Option<F>) -> &mut Self
	where
		F: FnOnce() -> Value,
	{
		if let Some(entry) = self.cache.forget(key, permanent).await {
			if let (Some(fallback), Some(config_key)) =
				(fallback, self.bindings.config_key(&entry.key))
			{
				debug!("Resetting config '{}' after forgetting '{}'", config_key, entry.key);
				self.config.set(config_key, fallback());
			}
		}
		self.apply_saved();
		self
	}

	pub fn bindings(&self) -> &HashMap<String, String> {
		self.bindings.bindings()
	}

	/// Bind a settings key to the configuration key of the same name
	pub fn bind(&mut self, settings_key: &str) -> &mut Self {
		self.bindings.bind(settings_key, None);
		self
	}

	/// Bind a settings key to a configuration key
	pub fn bind_to(&mut self, settings_key: &str, config_key: &str) -> &mut Self {
		self.bindings.bind(settings_key, Some(config_key));
		self
	}

	pub fn unbind(&mut self, settings_key: &str) -> &mut Self {
		self.bindings.unbind(settings_key);
		self
	}
}

// vim: ts=4
