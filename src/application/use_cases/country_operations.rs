use crate::domain::{entities::Country, repositories::CountryRepository};
use anyhow::{Result, bail};
use std::collections::HashSet;
use std::sync::Arc;

pub struct LoadCountries {
    repository: Arc<dyn CountryRepository>,
}

impl LoadCountries {
    pub fn new(repository: Arc<dyn CountryRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Vec<Country>> {
        let fetched = self.repository.fetch_countries().await?;
        let fetched_count = fetched.len();
        let countries = sanitize(fetched);

        if countries.is_empty() {
            bail!("No valid countries found in the country list");
        }

        tracing::info!(
            "Loaded {} countries ({} records dropped)",
            countries.len(),
            fetched_count - countries.len()
        );
        Ok(countries)
    }
}

/// Lowercases codes and keeps the first valid record for each code.
pub fn sanitize(countries: Vec<Country>) -> Vec<Country> {
    let mut seen = HashSet::new();
    countries
        .into_iter()
        .filter_map(|mut country| {
            country.code = country.code.trim().to_ascii_lowercase();
            country.name = country.name.trim().to_string();

            if country.code.len() != 2 || !country.code.chars().all(|c| c.is_ascii_lowercase()) {
                tracing::warn!("Dropping country with invalid code: {:?}", country);
                return None;
            }
            if country.name.is_empty() {
                tracing::warn!("Dropping country without a name: {}", country.code);
                return None;
            }
            if !country.coordinate.is_valid() {
                tracing::warn!("Dropping country with invalid coordinate: {}", country);
                return None;
            }
            if !seen.insert(country.code.clone()) {
                tracing::warn!("Dropping duplicate country record: {}", country);
                return None;
            }
            Some(country)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Coordinate;
    use async_trait::async_trait;

    struct FixedCountries(Vec<Country>);

    #[async_trait]
    impl CountryRepository for FixedCountries {
        async fn fetch_countries(&self) -> Result<Vec<Country>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_drops_invalid_records() {
        let repository = Arc::new(FixedCountries(vec![
            Country::new("DK", " Denmark ", Coordinate::new(56.0, 10.0)),
            Country::new("dnk", "Denmark", Coordinate::new(56.0, 10.0)),
            Country::new("se", "", Coordinate::new(62.0, 15.0)),
            Country::new("no", "Norway", Coordinate::new(162.0, 10.0)),
            Country::new("dk", "Denmark again", Coordinate::new(56.0, 10.0)),
            Country::new("fi", "Finland", Coordinate::new(64.0, 26.0)),
        ]));

        let countries = LoadCountries::new(repository).execute().await.unwrap();
        let codes: Vec<&str> = countries.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["dk", "fi"]);
        assert_eq!(countries[0].name, "Denmark");
    }

    #[tokio::test]
    async fn test_empty_list_is_an_error() {
        let repository = Arc::new(FixedCountries(Vec::new()));
        assert!(LoadCountries::new(repository).execute().await.is_err());
    }
}
