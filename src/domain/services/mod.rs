pub mod difficulty;
pub mod pool_resolver;
pub mod round_selector;
pub mod scoring;

pub use difficulty::{Difficulty, DifficultyPlan};
pub use pool_resolver::PoolResolver;
pub use round_selector::RoundSelector;
pub use scoring::{Guess, GuessOutcome, Scoreboard};
