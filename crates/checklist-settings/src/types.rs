//! Settings types. Every struct deserializes with defaults for missing keys.

use checklist_core::lists::RenamePolicy;
use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistSettings {
    pub server: ServerSettings,
    pub session: SessionSettings,
    pub validation: ValidationSettings,
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Listen port; `0` picks a free port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4567,
        }
    }
}

/// Session cookie and lifetime settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Name of the cookie carrying the session id.
    pub cookie_name: String,
    /// Sessions untouched for this long are dropped.
    pub idle_timeout_secs: u64,
    /// How often the idle sweep runs.
    pub sweep_interval_secs: u64,
    /// Upper bound on live sessions held in memory; 0 disables the limit.
    pub max_sessions: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "checklist_session".to_string(),
            idle_timeout_secs: 24 * 60 * 60,
            sweep_interval_secs: 60,
            max_sessions: 10_000,
        }
    }
}

/// Name validation behavior.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationSettings {
    /// When true, renaming a list to its own current name is rejected as a
    /// duplicate.
    pub strict_rename: bool,
}

impl ValidationSettings {
    pub fn rename_policy(&self) -> RenamePolicy {
        if self.strict_rename {
            RenamePolicy::Strict
        } else {
            RenamePolicy::ExcludeSelf
        }
    }
}

/// Log output settings. `RUST_LOG` takes precedence over `level`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
