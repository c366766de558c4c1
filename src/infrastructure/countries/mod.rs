pub mod json_country_repository;
pub mod nearest_locator;

pub use json_country_repository::JsonCountryRepository;
pub use nearest_locator::NearestCountryLocator;
