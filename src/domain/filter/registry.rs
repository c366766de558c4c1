//! Catalogue of named country predicates.

use crate::domain::entities::{Coordinate, Country};
use crate::domain::error::QuizError;
use crate::domain::services::difficulty::Difficulty;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

pub const ALL_KEY: &str = "all";

const BUILTIN_PREDICATES: &str = include_str!("../../../data/predicates.json");

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        coordinate.lat >= self.min_lat
            && coordinate.lat <= self.max_lat
            && coordinate.lon >= self.min_lon
            && coordinate.lon <= self.max_lon
    }
}

#[derive(Debug, Clone)]
pub enum Predicate {
    All,
    Region(BoundingBox),
    Members(HashSet<String>),
    /// Matches every code outside the set.
    NotMembers(HashSet<String>),
}

impl Predicate {
    pub fn matches(&self, country: &Country) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Region(bounds) => bounds.contains(&country.coordinate),
            Predicate::Members(codes) => codes.contains(&country.code),
            Predicate::NotMembers(codes) => !codes.contains(&country.code),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PredicateEntry {
    pub label: String,
    pub predicate: Predicate,
}

#[derive(Deserialize)]
struct PredicateData {
    regions: Vec<RegionData>,
    groups: Vec<GroupData>,
    difficulty: DifficultyData,
}

#[derive(Deserialize)]
struct RegionData {
    key: String,
    label: String,
    bounds: BoundingBox,
}

#[derive(Deserialize)]
struct GroupData {
    key: String,
    label: String,
    codes: Vec<String>,
    #[serde(default)]
    minus: Vec<String>,
}

#[derive(Deserialize)]
struct DifficultyData {
    easy: Vec<String>,
    hard: Vec<String>,
    expert: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PredicateRegistry {
    entries: HashMap<String, PredicateEntry>,
    order: Vec<String>,
}

impl PredicateRegistry {
    pub fn builtin() -> Result<Self, QuizError> {
        Self::from_json(BUILTIN_PREDICATES)
    }

    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let data: PredicateData = serde_json::from_str(json)
            .map_err(|e| QuizError::InvalidPredicateData(e.to_string()))?;

        let mut registry = Self {
            entries: HashMap::new(),
            order: Vec::new(),
        };
        registry.register(ALL_KEY, "All Countries", Predicate::All)?;

        for region in data.regions {
            registry.register(&region.key, &region.label, Predicate::Region(region.bounds))?;
        }

        let raw_groups: HashMap<&str, &Vec<String>> = data
            .groups
            .iter()
            .map(|group| (group.key.as_str(), &group.codes))
            .collect();

        for group in &data.groups {
            let mut codes = code_set(&group.codes);
            for subtracted in &group.minus {
                let removed = raw_groups.get(subtracted.as_str()).ok_or_else(|| {
                    QuizError::InvalidPredicateData(format!(
                        "group '{}' subtracts unknown group '{}'",
                        group.key, subtracted
                    ))
                })?;
                for code in removed.iter() {
                    codes.remove(&code.to_ascii_lowercase());
                }
            }
            registry.register(&group.key, &group.label, Predicate::Members(codes))?;
        }

        let easy = code_set(&data.difficulty.easy);
        let hard = code_set(&data.difficulty.hard);
        let expert = code_set(&data.difficulty.expert);
        let ranked: HashSet<String> = easy.iter().chain(&hard).chain(&expert).cloned().collect();

        for (difficulty, predicate) in [
            (Difficulty::Easy, Predicate::Members(easy)),
            (Difficulty::Medium, Predicate::NotMembers(ranked)),
            (Difficulty::Hard, Predicate::Members(hard)),
            (Difficulty::Expert, Predicate::Members(expert)),
        ] {
            registry.register(&difficulty.filter_key(), difficulty.label(), predicate)?;
        }

        Ok(registry)
    }

    fn register(&mut self, key: &str, label: &str, predicate: Predicate) -> Result<(), QuizError> {
        if self.entries.contains_key(key) {
            return Err(QuizError::InvalidPredicateData(format!(
                "duplicate predicate key '{}'",
                key
            )));
        }
        self.entries.insert(
            key.to_string(),
            PredicateEntry {
                label: label.to_string(),
                predicate,
            },
        );
        self.order.push(key.to_string());
        Ok(())
    }

    pub fn resolve(&self, key: &str) -> Option<&Predicate> {
        self.entries.get(key).map(|entry| &entry.predicate)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries
            .get(key)
            .map(|entry| entry.label.as_str())
            .unwrap_or(key)
    }

    /// Keys in declaration order, `all` first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn any_matches(&self, keys: &[String], country: &Country) -> bool {
        keys.iter()
            .filter_map(|key| self.resolve(key))
            .any(|predicate| predicate.matches(country))
    }

    pub fn unknown_keys<'a>(&self, keys: &'a [String]) -> Vec<&'a str> {
        keys.iter()
            .map(String::as_str)
            .filter(|key| !self.contains(key))
            .collect()
    }
}

fn code_set(codes: &[String]) -> HashSet<String> {
    codes.iter().map(|code| code.to_ascii_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str, lat: f64, lon: f64) -> Country {
        Country::new(code, code.to_uppercase(), Coordinate::new(lat, lon))
    }

    #[test]
    fn test_builtin_registry_loads() {
        let registry = PredicateRegistry::builtin().unwrap();
        assert!(registry.contains("all"));
        assert!(registry.contains("scandinavia"));
        assert!(registry.contains("francophone"));
        assert!(registry.contains("difficulty-medium"));
        assert_eq!(registry.keys().next(), Some("all"));
        assert_eq!(registry.label("european-union"), "European Union");
        assert_eq!(registry.label("no-such-key"), "no-such-key");
    }

    #[test]
    fn test_scandinavia_membership() {
        let registry = PredicateRegistry::builtin().unwrap();
        let scandinavia = registry.resolve("scandinavia").unwrap();
        for code in ["dk", "fi", "is", "no", "se"] {
            assert!(scandinavia.matches(&country(code, 60.0, 10.0)));
        }
        assert!(!scandinavia.matches(&country("de", 51.0, 9.0)));
    }

    #[test]
    fn test_region_bounding_box() {
        let registry = PredicateRegistry::builtin().unwrap();
        let europe = registry.resolve("europe").unwrap();
        assert!(europe.matches(&country("fr", 46.0, 2.0)));
        assert!(!europe.matches(&country("br", -10.0, -55.0)));

        let americas = registry.resolve("americas").unwrap();
        assert!(americas.matches(&country("br", -10.0, -55.0)));
    }

    #[test]
    fn test_small_excludes_large_and_microstates() {
        let registry = PredicateRegistry::builtin().unwrap();
        let small = registry.resolve("small").unwrap();
        // "us" is on the small list but also classed as large
        assert!(!small.matches(&country("us", 38.0, -97.0)));
        // "lu" is on the small list but also a microstate
        assert!(!small.matches(&country("lu", 49.75, 6.17)));
        assert!(small.matches(&country("al", 41.0, 20.0)));
    }

    #[test]
    fn test_size_family_gap_is_kept() {
        let registry = PredicateRegistry::builtin().unwrap();
        let nowhere = country("aq", -90.0, 0.0);
        for key in ["large", "medium", "small"] {
            assert!(!registry.resolve(key).unwrap().matches(&nowhere));
        }
    }

    #[test]
    fn test_medium_difficulty_is_derived() {
        let registry = PredicateRegistry::builtin().unwrap();
        let medium = registry.resolve("difficulty-medium").unwrap();
        assert!(!medium.matches(&country("us", 38.0, -97.0)));
        assert!(!medium.matches(&country("va", 41.9, 12.45)));
        // listed in no tier at all
        assert!(medium.matches(&country("il", 31.0, 35.0)));
    }

    #[test]
    fn test_predicates_are_repeatable() {
        let registry = PredicateRegistry::builtin().unwrap();
        let denmark = country("dk", 56.0, 10.0);
        for key in registry.keys() {
            let predicate = registry.resolve(key).unwrap();
            assert_eq!(predicate.matches(&denmark), predicate.matches(&denmark));
        }
    }

    #[test]
    fn test_unknown_keys_contribute_nothing() {
        let registry = PredicateRegistry::builtin().unwrap();
        let keys = vec!["retired-bloc".to_string()];
        assert!(!registry.any_matches(&keys, &country("dk", 56.0, 10.0)));
        assert_eq!(registry.unknown_keys(&keys), vec!["retired-bloc"]);
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let json = r#"{
            "regions": [],
            "groups": [
                { "key": "a", "label": "A", "codes": ["dk"] },
                { "key": "a", "label": "A again", "codes": ["se"] }
            ],
            "difficulty": { "easy": [], "hard": [], "expert": [] }
        }"#;
        assert!(matches!(
            PredicateRegistry::from_json(json),
            Err(QuizError::InvalidPredicateData(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_subtraction() {
        let json = r#"{
            "regions": [],
            "groups": [{ "key": "a", "label": "A", "codes": ["dk"], "minus": ["b"] }],
            "difficulty": { "easy": [], "hard": [], "expert": [] }
        }"#;
        assert!(PredicateRegistry::from_json(json).is_err());
    }
}
