//! # checklist-settings
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`ChecklistSettings::default()`]
//! 2. **User file**: `~/.checklist/settings.json` or an explicit path
//!    (deep-merged over defaults)
//! 3. **Environment variables**: `CHECKLIST_*` overrides (highest priority)
//!
//! The loaded value is passed explicitly to the server; there is no global.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
