pub mod config_io;
pub mod file_store;
pub mod lock;
pub mod logging;
pub mod memory_store;
pub mod paths;
pub mod store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use store::{ErrorKind, StoreData, StoreError, TaskStore};
