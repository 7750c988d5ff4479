//! Name checks run before any mutation.

use crate::errors::ValidationError;

pub const MIN_NAME_CHARS: usize = 1;
pub const MAX_NAME_CHARS: usize = 100;

fn length_ok(name: &str) -> bool {
    (MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&name.chars().count())
}

/// Uniqueness is checked before length, so an empty name that somehow
/// matches an existing empty name reports the duplicate.
pub fn validate_list_name<'a, I>(name: &str, existing_names: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    if existing_names.into_iter().any(|existing| existing == name) {
        return Err(ValidationError::DuplicateListName);
    }
    if !length_ok(name) {
        return Err(ValidationError::ListNameLength);
    }
    Ok(())
}

/// Todo names are not required to be unique.
pub fn validate_todo_name(name: &str) -> Result<(), ValidationError> {
    if length_ok(name) {
        Ok(())
    } else {
        Err(ValidationError::TodoNameLength)
    }
}
