//! Process flags controlling when the manager talks to the store
//!
//! Flags are read at the start of each operation; changing them affects the
//! next operation only.

use serde::Deserialize;
use std::env;

use crate::prelude::*;

pub const ENV_AUTO_SAVE: &str = "STOWAGE_AUTO_SAVE";
pub const ENV_AUTO_CREATE: &str = "STOWAGE_AUTO_CREATE";
pub const ENV_AUTO_LOAD: &str = "STOWAGE_AUTO_LOAD";
pub const ENV_DEFER_LOAD: &str = "STOWAGE_DEFER_LOAD";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettingsOpts {
	/// Persist updates of already known keys on every `set`
	pub auto_save_on_set: bool,
	/// Persist new keys on every `set`
	pub auto_create_on_set: bool,
	/// Load all entries in `boot()`
	pub auto_load_on_boot: bool,
	/// Hold back `load()` until the schema-ready signal fired
	pub defer_load_until_schema_ready: bool,
}

impl Default for SettingsOpts {
	fn default() -> Self {
		Self {
			auto_save_on_set: true,
			auto_create_on_set: true,
			auto_load_on_boot: true,
			defer_load_until_schema_ready: false,
		}
	}
}

impl SettingsOpts {
	/// Build options from `STOWAGE_*` environment variables, defaults for unset ones
	pub fn from_env() -> StResult<Self> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Build options from an arbitrary variable lookup
	pub fn from_lookup<F>(lookup: F) -> StResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let defaults = Self::default();
		let flag = |name: &str, default: bool| match lookup(name) {
			Some(value) => parse_flag(name, &value),
			None => Ok(default),
		};

		Ok(Self {
			auto_save_on_set: flag(ENV_AUTO_SAVE, defaults.auto_save_on_set)?,
			auto_create_on_set: flag(ENV_AUTO_CREATE, defaults.auto_create_on_set)?,
			auto_load_on_boot: flag(ENV_AUTO_LOAD, defaults.auto_load_on_boot)?,
			defer_load_until_schema_ready: flag(
				ENV_DEFER_LOAD,
				defaults.defer_load_until_schema_ready,
			)?,
		})
	}
}

fn parse_flag(name: &str, value: &str) -> StResult<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(Error::ConfigError(format!("{}: invalid boolean '{}'", name, value))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn test_defaults() {
		let opts = SettingsOpts::from_lookup(lookup(&[])).unwrap();
		assert_eq!(opts, SettingsOpts::default());
		assert!(opts.auto_save_on_set);
		assert!(opts.auto_create_on_set);
		assert!(opts.auto_load_on_boot);
		assert!(!opts.defer_load_until_schema_ready);
	}

	#[test]
	fn test_flags_from_vars() {
		let opts = SettingsOpts::from_lookup(lookup(&[
			(ENV_AUTO_SAVE, "off"),
			(ENV_AUTO_CREATE, "0"),
			(ENV_DEFER_LOAD, " Yes "),
		]))
		.unwrap();
		assert!(!opts.auto_save_on_set);
		assert!(!opts.auto_create_on_set);
		assert!(opts.auto_load_on_boot);
		assert!(opts.defer_load_until_schema_ready);
	}

	#[test]
	fn test_invalid_flag() {
		let res = SettingsOpts::from_lookup(lookup(&[(ENV_AUTO_LOAD, "maybe")]));
		assert!(matches!(res, Err(Error::ConfigError(msg)) if msg.contains(ENV_AUTO_LOAD)));
	}

	#[test]
	fn test_deserialize_partial() {
		let opts: SettingsOpts = serde_json::from_str(r#"{"auto_save_on_set": false}"#).unwrap();
		assert!(!opts.auto_save_on_set);
		assert!(opts.auto_create_on_set);
	}
}

// vim: ts=4
