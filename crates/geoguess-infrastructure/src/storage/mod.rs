//! Key-value storage backends.

mod file_storage;
mod memory_storage;

pub use file_storage::FileKeyValueStorage;
pub use memory_storage::InMemoryKeyValueStorage;
