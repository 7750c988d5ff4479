//! `GET /health`: liveness plus session-store headroom.

use std::time::Instant;

use serde::Serialize;

/// Coarse server state reported to monitors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    /// The session limit is reached; only existing sessions can be written.
    AtCapacity,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub uptime_secs: u64,
    /// Sessions currently holding lists or pending flash messages.
    pub active_sessions: usize,
    /// `null` when unlimited.
    pub session_limit: Option<usize>,
}

pub fn health_check(start_time: Instant, sessions: usize, limit: Option<usize>) -> HealthResponse {
    let status = match limit {
        Some(limit) if sessions >= limit => HealthStatus::AtCapacity,
        _ => HealthStatus::Ok,
    };
    HealthResponse {
        status,
        uptime_secs: start_time.elapsed().as_secs(),
        active_sessions: sessions,
        session_limit: limit,
    }
}
