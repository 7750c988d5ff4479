use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, instrument};

use checklist_core::ids::SessionId;

use crate::error::StoreError;
use crate::session::{SessionData, SessionStore};

struct Entry {
    data: SessionData,
    last_seen: DateTime<Utc>,
}

/// Process-local session storage. Contents are lost on restart.
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, Entry>,
    max_sessions: Option<usize>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions: None,
        }
    }

    /// Refuse to create sessions beyond `limit`; existing sessions can
    /// still be written.
    pub fn with_max_sessions(mut self, limit: usize) -> Self {
        self.max_sessions = Some(limit);
        self
    }

    /// Drop every session not touched since `now - idle_timeout`.
    /// Returns how many were removed.
    #[instrument(skip(self))]
    pub fn sweep_expired(&self, now: DateTime<Utc>, idle_timeout: Duration) -> usize {
        let cutoff = now - idle_timeout;
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.last_seen >= cutoff);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, remaining = self.sessions.len(), "expired idle sessions");
        }
        removed
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    #[instrument(skip(self), fields(session_id = %id))]
    fn get(&self, id: &SessionId) -> Result<SessionData, StoreError> {
        Ok(match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.last_seen = Utc::now();
                entry.data.clone()
            }
            None => SessionData::default(),
        })
    }

    #[instrument(skip(self, data), fields(session_id = %id, lists = data.lists.len()))]
    fn put(&self, id: &SessionId, data: SessionData) -> Result<(), StoreError> {
        if let Some(limit) = self.max_sessions {
            if !self.sessions.contains_key(id) && self.sessions.len() >= limit {
                return Err(StoreError::CapacityExceeded { limit });
            }
        }
        let _ = self.sessions.insert(
            id.clone(),
            Entry {
                data,
                last_seen: Utc::now(),
            },
        );
        Ok(())
    }

    fn remove(&self, id: &SessionId) -> Result<bool, StoreError> {
        Ok(self.sessions.remove(id).is_some())
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
