use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const SESSION_PREFIX: &str = "sess";

/// Opaque identifier for a browser session, carried in the session cookie.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(format!("{SESSION_PREFIX}_{}", Uuid::now_v7()))
    }

    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed session id: {0}")]
pub struct InvalidSessionId(String);

/// Parsing is strict: cookie values come from the client, so anything that
/// is not `sess_<uuid>` is rejected and a fresh session is minted instead.
impl FromStr for SessionId {
    type Err = InvalidSessionId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = s
            .strip_prefix(SESSION_PREFIX)
            .and_then(|rest| rest.strip_prefix('_'))
            .ok_or_else(|| InvalidSessionId(s.to_owned()))?;
        Uuid::parse_str(uuid).map_err(|_| InvalidSessionId(s.to_owned()))?;
        Ok(Self(s.to_owned()))
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
