pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SQLiteStorage;
