use crate::application::use_cases::*;
use crate::domain::repositories::{CountryRepository, KeyValueStore};
use std::sync::Arc;

pub struct UseCaseContainer {
    pub load_countries: Arc<LoadCountries>,
    pub daily_challenge: Arc<GetDailyChallenge>,
}

impl UseCaseContainer {
    pub fn new(
        country_repository: Arc<dyn CountryRepository>,
        store: Arc<dyn KeyValueStore>,
        daily_challenge_size: usize,
    ) -> Self {
        Self {
            load_countries: Arc::new(LoadCountries::new(Arc::clone(&country_repository))),
            daily_challenge: Arc::new(GetDailyChallenge::new(
                Arc::clone(&store),
                daily_challenge_size,
            )),
        }
    }
}
