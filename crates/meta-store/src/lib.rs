//! Coordination store abstraction for shard-meta
//!
//! Provides the repository tuple model exchanged with the coordination store,
//! the [`PersistRepository`] contract every store client implements, and two
//! implementations: an in-memory store and a file-backed standalone store.

pub mod error;
pub mod file;
pub mod memory;
pub mod path;
pub mod repository;
pub mod tuple;

pub use error::{Error, Result};
pub use file::FileRepository;
pub use memory::MemoryRepository;
pub use path::{NodePath, validate_segment};
pub use repository::PersistRepository;
pub use tuple::RepositoryTuple;
