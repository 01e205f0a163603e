pub use stowage_types::prelude::*;

// vim: ts=4
