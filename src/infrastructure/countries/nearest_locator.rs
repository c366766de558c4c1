use crate::domain::entities::{Coordinate, Country};
use crate::domain::repositories::CountryLocator;
use crate::domain::services::scoring::haversine_km;

/// Resolves a click to the country whose reference point is closest.
pub struct NearestCountryLocator {
    countries: Vec<Country>,
}

impl NearestCountryLocator {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }
}

impl CountryLocator for NearestCountryLocator {
    fn locate(&self, coordinate: &Coordinate) -> Option<Country> {
        self.countries
            .iter()
            .map(|country| (haversine_km(coordinate, &country.coordinate), country))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, country)| country.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_closest_reference_point() {
        let locator = NearestCountryLocator::new(vec![
            Country::new("dk", "Denmark", Coordinate::new(56.0, 10.0)),
            Country::new("fr", "France", Coordinate::new(46.0, 2.0)),
        ]);
        let found = locator.locate(&Coordinate::new(48.85, 2.35)).unwrap();
        assert_eq!(found.code, "fr");
        let empty = NearestCountryLocator::new(Vec::new());
        assert!(empty.locate(&Coordinate::new(0.0, 0.0)).is_none());
    }
}
