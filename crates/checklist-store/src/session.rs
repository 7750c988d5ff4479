use serde::{Deserialize, Serialize};

use checklist_core::ids::SessionId;
use checklist_core::lists::ListCollection;

use crate::error::StoreError;

/// One-shot messages shown on the next rendered page, then cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub error: Option<String>,
    pub success: Option<String>,
    pub delete: Option<String>,
}

impl Flash {
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.success.is_none() && self.delete.is_none()
    }

    /// Take every pending message, leaving the flash empty.
    pub fn take(&mut self) -> Flash {
        std::mem::take(self)
    }
}

/// Everything held for one browser session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub lists: ListCollection,
    #[serde(default)]
    pub flash: Flash,
}

/// Per-session key-value storage for [`SessionData`].
///
/// Handlers read a copy with `get`, mutate it, and write it back with `put`
/// before responding. Nothing is cached between requests.
pub trait SessionStore: Send + Sync {
    /// Unknown ids yield an empty session rather than an error.
    fn get(&self, id: &SessionId) -> Result<SessionData, StoreError>;

    fn put(&self, id: &SessionId, data: SessionData) -> Result<(), StoreError>;

    /// Returns whether a session was present.
    fn remove(&self, id: &SessionId) -> Result<bool, StoreError>;

    /// Number of live sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
