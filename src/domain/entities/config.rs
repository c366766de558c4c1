use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub total_rounds: u32,
    pub daily_challenge_size: usize,
    pub storage_path: Option<PathBuf>,
    pub countries_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            total_rounds: 10,
            daily_challenge_size: 10,
            storage_path: None,
            countries_path: None,
        }
    }
}
