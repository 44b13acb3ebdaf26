//! Process-wide settings storage shared by the host and its plugins

mod error;
mod io;
mod paths;
mod store;

pub use error::StoreError;
pub use io::{atomic_write, read_json};
pub use paths::Paths;
pub use store::{JsonFileStore, MemoryStore, SettingsStore};
