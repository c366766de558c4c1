use crate::domain::entities::{Coordinate, Country};

pub trait CountryLocator: Send + Sync {
    fn locate(&self, coordinate: &Coordinate) -> Option<Country>;
}
