//! Live configuration namespace that bindings write into

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Mutable key-value configuration of the host application
///
/// The core only ever writes. Writes cannot fail.
pub trait ConfigNamespace: Debug + Send + Sync {
	fn set(&self, key: &str, value: Value);
}

/// In-process configuration map
///
/// Cloning yields another handle to the same map, so the host can keep one
/// handle for reading while the settings manager writes through another.
#[derive(Debug, Clone, Default)]
pub struct ConfigMap {
	values: Arc<RwLock<HashMap<String, Value>>>,
}

impl ConfigMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<Value> {
		self.values.read().get(key).cloned()
	}

	pub fn remove(&self, key: &str) -> Option<Value> {
		self.values.write().remove(key)
	}

	pub fn len(&self) -> usize {
		self.values.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.read().is_empty()
	}

	/// Copy of the current contents
	pub fn snapshot(&self) -> HashMap<String, Value> {
		self.values.read().clone()
	}
}

impl ConfigNamespace for ConfigMap {
	fn set(&self, key: &str, value: Value) {
		self.values.write().insert(key.to_string(), value);
	}
}

impl FromIterator<(String, Value)> for ConfigMap {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self { values: Arc::new(RwLock::new(iter.into_iter().collect())) }
	}
}


// vim: ts=4
