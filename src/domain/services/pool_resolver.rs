use crate::domain::entities::Country;
use crate::domain::error::QuizError;
use crate::domain::filter::{FilterState, PredicateRegistry};

pub struct PoolResolver;

impl PoolResolver {
    /// Countries from `countries` that pass the filter, in input order.
    pub fn resolve(
        countries: &[Country],
        filter: &FilterState,
        registry: &PredicateRegistry,
    ) -> Result<Vec<Country>, QuizError> {
        if countries.is_empty() {
            return Err(QuizError::NotReady);
        }

        let unknown = filter.unknown_keys(registry);
        if !unknown.is_empty() {
            tracing::warn!("Ignoring unknown filter keys: {:?}", unknown);
        }

        let test = filter.effective_test(registry);
        let pool: Vec<Country> = countries.iter().filter(|c| test(*c)).cloned().collect();

        if pool.is_empty() {
            tracing::warn!("Filter '{}' matches no countries", filter);
            return Err(QuizError::EmptyPool {
                filter: filter.serialize(),
            });
        }

        tracing::debug!(
            "Resolved filter '{}' to {} of {} countries",
            filter,
            pool.len(),
            countries.len()
        );
        Ok(pool)
    }

    pub fn count(
        countries: &[Country],
        filter: &FilterState,
        registry: &PredicateRegistry,
    ) -> usize {
        countries
            .iter()
            .filter(|country| filter.matches(registry, country))
            .count()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::entities::{Coordinate, Country};

    const SCANDINAVIA: [&str; 5] = ["dk", "fi", "is", "no", "se"];

    /// 200 countries: Scandinavia spread through 195 placeholder records.
    pub fn two_hundred_countries() -> Vec<Country> {
        let mut countries = Vec::with_capacity(200);
        let mut nordic = SCANDINAVIA.iter();
        for i in 0..200 {
            if i % 40 == 7 {
                if let Some(code) = nordic.next() {
                    let coordinate = Coordinate::new(60.0, 15.0);
                    countries.push(Country::new(*code, code.to_uppercase(), coordinate));
                    continue;
                }
            }
            let code = format!("{}{}", (b'A' + (i / 10) as u8) as char, i % 10);
            let name = format!("Placeholder {}", code);
            countries.push(Country::new(code, name, Coordinate::new(0.0, 0.0)));
        }
        countries
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::two_hundred_countries;
    use super::*;

    #[test]
    fn test_scandinavia_scenario() {
        let registry = PredicateRegistry::builtin().unwrap();
        let countries = two_hundred_countries();
        assert_eq!(countries.len(), 200);

        let filter = FilterState::new().toggled("scandinavia");
        let pool = PoolResolver::resolve(&countries, &filter, &registry).unwrap();
        let codes: Vec<&str> = pool.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["dk", "fi", "is", "no", "se"]);

        let excluded = filter.toggled("scandinavia");
        let pool = PoolResolver::resolve(&countries, &excluded, &registry).unwrap();
        assert_eq!(pool.len(), 195);
        assert!(pool.iter().all(|c| !["dk", "fi", "is", "no", "se"].contains(&c.code.as_str())));
    }

    #[test]
    fn test_preserves_input_order() {
        let registry = PredicateRegistry::builtin().unwrap();
        let countries = two_hundred_countries();
        let pool = PoolResolver::resolve(&countries, &FilterState::default(), &registry).unwrap();
        assert_eq!(pool, countries);
    }

    #[test]
    fn test_empty_pool_is_reported() {
        let registry = PredicateRegistry::builtin().unwrap();
        let countries = two_hundred_countries();
        let filter = FilterState::parse("retired-bloc");
        assert_eq!(
            PoolResolver::resolve(&countries, &filter, &registry),
            Err(QuizError::EmptyPool {
                filter: "retired-bloc".to_string()
            })
        );
    }

    #[test]
    fn test_not_ready_without_countries() {
        let registry = PredicateRegistry::builtin().unwrap();
        assert_eq!(
            PoolResolver::resolve(&[], &FilterState::default(), &registry),
            Err(QuizError::NotReady)
        );
    }

    #[test]
    fn test_refresh_reapplies_same_filter() {
        let registry = PredicateRegistry::builtin().unwrap();
        let filter = FilterState::parse("scandinavia");
        let first = two_hundred_countries();
        let mut refreshed = first.clone();
        refreshed.retain(|c| c.code != "is");

        let p1 = PoolResolver::resolve(&first, &filter, &registry).unwrap();
        let p2 = PoolResolver::resolve(&refreshed, &filter, &registry).unwrap();
        assert_eq!(p1.len(), 5);
        assert_eq!(p2.len(), 4);
        assert_eq!(PoolResolver::count(&refreshed, &filter, &registry), 4);
    }
}
