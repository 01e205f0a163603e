pub use crate::error::{Error, StResult};
pub use crate::types::SettingEntry;

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
