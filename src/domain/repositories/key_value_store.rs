use anyhow::Result;

pub const FILTER_KEY: &str = "flagquiz-filter";
pub const DIFFICULTY_KEY: &str = "flagquiz-difficulty";
pub const DAILY_CHALLENGE_KEY: &str = "flagquiz-daily-challenge";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
