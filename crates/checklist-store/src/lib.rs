pub mod error;
pub mod memory;
pub mod session;

pub use error::StoreError;
pub use memory::MemorySessionStore;
pub use session::{Flash, SessionData, SessionStore};
