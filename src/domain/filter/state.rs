use super::registry::{ALL_KEY, PredicateRegistry};
use crate::domain::entities::Country;
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const KEY_SEPARATOR: char = ',';
const EXCLUDE_SEPARATOR: char = '|';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Unset,
    Include,
    Exclude,
}

impl KeyState {
    pub fn next(self) -> Self {
        match self {
            KeyState::Unset => KeyState::Include,
            KeyState::Include => KeyState::Exclude,
            KeyState::Exclude => KeyState::Unset,
        }
    }
}

/// Keys keep the order in which they were first selected, which makes the
/// serialized form stable. A key is never in both sets, and `all` is never
/// stored: an empty include set means every country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn includes(&self) -> &[String] {
        &self.include
    }

    pub fn excludes(&self) -> &[String] {
        &self.exclude
    }

    pub fn is_default(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn key_state(&self, key: &str) -> KeyState {
        if key == ALL_KEY {
            return if self.is_default() {
                KeyState::Include
            } else {
                KeyState::Unset
            };
        }
        if self.include.iter().any(|k| k == key) {
            KeyState::Include
        } else if self.exclude.iter().any(|k| k == key) {
            KeyState::Exclude
        } else {
            KeyState::Unset
        }
    }

    /// `all` is a hard reset. Any other key moves one step along
    /// unset -> include -> exclude -> unset.
    pub fn toggled(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.toggle(key);
        next
    }

    pub fn toggle(&mut self, key: &str) -> KeyState {
        let key = key.trim();
        if key.is_empty() {
            return KeyState::Unset;
        }
        if key.contains([KEY_SEPARATOR, EXCLUDE_SEPARATOR]) {
            tracing::warn!("Ignoring filter key with a separator in it: '{}'", key);
            return self.key_state(key);
        }
        if key == ALL_KEY {
            self.include.clear();
            self.exclude.clear();
            return KeyState::Include;
        }

        let next = self.key_state(key).next();
        match next {
            KeyState::Include => {
                self.exclude.retain(|k| k != key);
                self.include.push(key.to_string());
            }
            KeyState::Exclude => {
                self.include.retain(|k| k != key);
                self.exclude.push(key.to_string());
            }
            KeyState::Unset => {
                self.include.retain(|k| k != key);
                self.exclude.retain(|k| k != key);
            }
        }
        next
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.include.retain(|k| keep(k));
        self.exclude.retain(|k| keep(k));
    }

    pub fn include_matches(&self, registry: &PredicateRegistry, country: &Country) -> bool {
        self.include.is_empty() || registry.any_matches(&self.include, country)
    }

    pub fn exclude_matches(&self, registry: &PredicateRegistry, country: &Country) -> bool {
        !self.exclude.is_empty() && registry.any_matches(&self.exclude, country)
    }

    pub fn matches(&self, registry: &PredicateRegistry, country: &Country) -> bool {
        self.include_matches(registry, country) && !self.exclude_matches(registry, country)
    }

    pub fn effective_test<'a>(
        &'a self,
        registry: &'a PredicateRegistry,
    ) -> impl Fn(&Country) -> bool + 'a {
        move |country: &Country| self.matches(registry, country)
    }

    pub fn unknown_keys<'a>(&'a self, registry: &PredicateRegistry) -> Vec<&'a str> {
        let mut unknown = registry.unknown_keys(&self.include);
        unknown.extend(registry.unknown_keys(&self.exclude));
        unknown
    }

    pub fn same_selection(&self, other: &FilterState) -> bool {
        let as_set = |keys: &[String]| keys.iter().cloned().collect::<HashSet<_>>();
        as_set(&self.include) == as_set(&other.include)
            && as_set(&self.exclude) == as_set(&other.exclude)
    }

    /// Encodes the state as `include1,include2|exclude1,exclude2`.
    pub fn serialize(&self) -> String {
        let include = if self.include.is_empty() {
            ALL_KEY.to_string()
        } else {
            self.include.join(",")
        };

        if self.exclude.is_empty() {
            include
        } else {
            format!("{}{}{}", include, EXCLUDE_SEPARATOR, self.exclude.join(","))
        }
    }

    /// Parses the persisted encoding. Never fails: empty segments are skipped,
    /// unrecognised keys are kept as-is, and a key listed in both segments
    /// stays included.
    pub fn parse(encoded: &str) -> Self {
        let (include_part, exclude_part) = match encoded.trim().split_once(EXCLUDE_SEPARATOR) {
            Some((include, exclude)) => (include, exclude),
            None => (encoded.trim(), ""),
        };

        let mut state = Self::default();
        for key in split_keys(include_part, &[KEY_SEPARATOR]) {
            if !state.include.contains(&key) {
                state.include.push(key);
            }
        }
        for key in split_keys(exclude_part, &[KEY_SEPARATOR, EXCLUDE_SEPARATOR]) {
            if !state.include.contains(&key) && !state.exclude.contains(&key) {
                state.exclude.push(key);
            }
        }
        state
    }
}

fn split_keys(segment: &str, separators: &[char]) -> Vec<String> {
    segment
        .split(|c: char| separators.contains(&c))
        .map(str::trim)
        .filter(|key| !key.is_empty() && *key != ALL_KEY)
        .map(str::to_string)
        .collect()
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}

impl FromStr for FilterState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
