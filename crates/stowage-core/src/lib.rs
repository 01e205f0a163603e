//! Settings cache and config binding core
//!
//! # Architecture
//!
//! - **Codec** (`codec.rs`): best-effort JSON encoding of stored values
//! - **Cache** (`cache.rs`): in-memory snapshot of all entries, synchronized with a `SettingsStore`
//! - **Bindings** (`binding.rs`): settings key -> configuration key map
//! - **Manager** (`manager.rs`): the public API orchestrating the above
//!
//! Data flows one way per operation: store -> cache -> configuration on load,
//! caller -> cache -> store -> configuration on set.

pub mod binding;
pub mod cache;
pub mod codec;
pub mod manager;
pub mod memory_store;
pub mod opts;
pub mod prelude;
pub mod schema;

pub use binding::BindingRegistry;
pub use cache::SettingsCache;
pub use manager::SettingsManager;
pub use memory_store::MemoryStore;
pub use opts::SettingsOpts;
pub use schema::{SchemaGate, SchemaSignal, schema_channel};

pub use stowage_types as types;

// vim: ts=4
