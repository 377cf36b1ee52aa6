//! Journal de operaciones por proyecto.

pub mod store;
pub mod types;

pub use store::{InMemoryJournal, ProjectJournal};
pub use types::{ProjectEvent, ProjectEventKind};
