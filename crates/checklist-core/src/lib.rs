pub mod display;
pub mod errors;
pub mod ids;
pub mod lists;
pub mod validate;

pub use display::sorted_for_display;
pub use errors::{ListError, ValidationError};
pub use ids::SessionId;
pub use lists::{List, ListCollection, RenamePolicy, Todo};
