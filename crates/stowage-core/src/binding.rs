//! Settings key to configuration key bindings
//!
//! A bound settings key mirrors its decoded value into the live configuration
//! whenever the entry is loaded, saved, or forgotten with a fallback.

use serde_json::Value;
use std::collections::HashMap;

use stowage_types::config_ns::ConfigNamespace;

use crate::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
	bindings: HashMap<String, String>,
}

impl BindingRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind a settings key, overwriting any previous binding
	///
	/// A missing or empty configuration key defaults to the settings key.
	/// An empty settings key is ignored.
	pub fn bind(&mut self, settings_key: &str, config_key: Option<&str>) {
		if settings_key.is_empty() {
			warn!("Ignoring binding for an empty settings key");
			return;
		}
		let config_key = match config_key {
			Some(config_key) if !config_key.is_empty() => config_key,
			_ => settings_key,
		};
		debug!("Binding setting '{}' to config '{}'", settings_key, config_key);
		self.bindings.insert(settings_key.to_string(), config_key.to_string());
	}

	pub fn unbind(&mut self, settings_key: &str) {
		self.bindings.remove(settings_key);
	}

	pub fn bindings(&self) -> &HashMap<String, String> {
		&self.bindings
	}

	/// Configuration key bound to a settings key
	pub fn config_key(&self, settings_key: &str) -> Option<&str> {
		self.bindings.get(settings_key).map(String::as_str)
	}

	pub fn is_bound(&self, settings_key: &str) -> bool {
		self.bindings.contains_key(settings_key)
	}

	/// Write an already decoded value into the configuration if the key is bound
	///
	/// Returns whether anything was written.
	pub fn apply(&self, settings_key: &str, value: Value, config: &dyn ConfigNamespace) -> bool {
		if settings_key.is_empty() {
			return false;
		}
		match self.config_key(settings_key) {
			Some(config_key) => {
				debug!("Applying setting '{}' to config '{}'", settings_key, config_key);
				config.set(config_key, value);
				true
			}
			None => false,
		}
	}
}


// vim: ts=4
