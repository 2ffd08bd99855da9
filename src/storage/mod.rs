mod sqlite;

pub use sqlite::SqliteStorage;
