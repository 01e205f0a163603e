//! Shared types, adapter traits, and core utilities for the stowage settings store.
//!
//! This crate contains the foundational types that are shared between the
//! core crate and all store adapter implementations. Adapters only depend on
//! this crate, so they compile independently of the cache and binding logic.

pub mod config_ns;
pub mod error;
pub mod notify;
pub mod prelude;
pub mod store_adapter;
pub mod types;

// vim: ts=4
