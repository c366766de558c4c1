pub mod country_locator;
pub mod country_repository;
pub mod key_value_store;

pub use country_locator::CountryLocator;
pub use country_repository::CountryRepository;
pub use key_value_store::{DAILY_CHALLENGE_KEY, DIFFICULTY_KEY, FILTER_KEY, KeyValueStore};
