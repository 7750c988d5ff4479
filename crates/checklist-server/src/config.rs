//! Server configuration.

use std::time::Duration;

use checklist_core::lists::RenamePolicy;
use checklist_settings::ChecklistSettings;

/// Configuration for the HTTP server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind; `0` picks a free port.
    pub port: u16,
    /// Cookie carrying the session id.
    pub cookie_name: String,
    pub rename_policy: RenamePolicy,
    /// Sessions idle longer than this are dropped by the sweeper.
    pub idle_timeout: Duration,
    pub sweep_interval: Duration,
    /// Cap on stored sessions; `None` when the setting is 0.
    pub max_sessions: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ChecklistSettings::default())
    }
}

impl From<&ChecklistSettings> for ServerConfig {
    fn from(settings: &ChecklistSettings) -> Self {
        Self {
            host: settings.server.host.clone(),
            port: settings.server.port,
            cookie_name: settings.session.cookie_name.clone(),
            rename_policy: settings.validation.rename_policy(),
            idle_timeout: Duration::from_secs(settings.session.idle_timeout_secs),
            sweep_interval: Duration::from_secs(settings.session.sweep_interval_secs.max(1)),
            max_sessions: (settings.session.max_sessions > 0).then_some(settings.session.max_sessions),
        }
    }
}
