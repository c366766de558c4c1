pub mod config;
pub mod country;
pub mod daily_challenge;
pub mod game_mode;

pub use config::AppConfig;
pub use country::{Coordinate, Country};
pub use daily_challenge::DailyChallenge;
pub use game_mode::GameMode;
