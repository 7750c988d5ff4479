/// A submitted name was rejected before any mutation happened.
///
/// The display strings are shown to the user verbatim above the form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The list name must be unique.")]
    DuplicateListName,
    #[error("The list name must be between 1 and 100 characters.")]
    ListNameLength,
    #[error("The todo name must be between 1 and 100 characters.")]
    TodoNameLength,
}

/// Which positional reference failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Missing {
    List(usize),
    Todo { list: usize, position: usize },
}

/// Errors from list/todo repository operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", not_found_message(.0))]
    NotFound(Missing),
}

impl ListError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

fn not_found_message(missing: &Missing) -> &'static str {
    match missing {
        Missing::List(_) => "The specified list was not found.",
        Missing::Todo { .. } => "The specified todo was not found.",
    }
}
