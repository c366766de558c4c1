pub mod config_repository;
pub mod countries;
pub mod storage;

pub use config_repository::ConfigRepository;
pub use countries::{JsonCountryRepository, NearestCountryLocator};
pub use storage::{JsonFileStore, MemoryStore};

use std::path::PathBuf;

pub(crate) fn config_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config").join("flagquiz")
    } else {
        PathBuf::from(".")
    }
}
