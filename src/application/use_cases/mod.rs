pub mod country_operations;
pub mod daily_challenge_operations;

pub use country_operations::*;
pub use daily_challenge_operations::*;
