#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session limit reached ({limit} active sessions)")]
    CapacityExceeded { limit: usize },

    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
