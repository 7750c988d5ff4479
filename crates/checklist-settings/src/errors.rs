use std::path::PathBuf;

use thiserror::Error;

/// Why the settings file could not be turned into [`ChecklistSettings`].
///
/// A missing file is not an error; defaults are used instead.
///
/// [`ChecklistSettings`]: crate::ChecklistSettings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The merged document has a key of the wrong type, e.g. `"port": "x"`.
    #[error("settings have the wrong shape: {0}")]
    Shape(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;
