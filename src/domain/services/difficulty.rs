use crate::domain::entities::Country;
use crate::domain::error::QuizError;
use crate::domain::filter::{FilterState, PredicateRegistry};
use std::fmt;
use std::str::FromStr;

const FILTER_KEY_PREFIX: &str = "difficulty-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    All,
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const TIERS: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::All => "all",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::All => "All",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    pub fn filter_key(&self) -> String {
        format!("{}{}", FILTER_KEY_PREFIX, self.as_str())
    }

    pub fn is_filter_key(key: &str) -> bool {
        key.starts_with(FILTER_KEY_PREFIX)
    }

    pub fn matches(&self, registry: &PredicateRegistry, country: &Country) -> bool {
        match self {
            Difficulty::All => true,
            tier => registry
                .resolve(&tier.filter_key())
                .is_some_and(|predicate| predicate.matches(country)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(Difficulty::All),
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(QuizError::UnknownDifficulty(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DifficultyPlan {
    /// A category filter is active: keep it and narrow its pool by the tier.
    Narrow(FilterState),
    /// No category filter: the tier itself becomes the active filter.
    Replace(FilterState),
}

impl DifficultyPlan {
    pub fn filter(&self) -> &FilterState {
        match self {
            DifficultyPlan::Narrow(filter) | DifficultyPlan::Replace(filter) => filter,
        }
    }

    pub fn narrows(&self) -> bool {
        matches!(self, DifficultyPlan::Narrow(_))
    }
}

pub fn has_category_filter(filter: &FilterState) -> bool {
    !filter.is_default() && !is_difficulty_only(filter)
}

pub fn is_difficulty_only(filter: &FilterState) -> bool {
    filter.excludes().is_empty()
        && !filter.includes().is_empty()
        && filter.includes().iter().all(|key| Difficulty::is_filter_key(key))
}

pub fn plan(filter: &FilterState, difficulty: Difficulty) -> DifficultyPlan {
    if has_category_filter(filter) {
        return DifficultyPlan::Narrow(without_tier_keys(filter));
    }

    match difficulty {
        Difficulty::All => DifficultyPlan::Replace(FilterState::default()),
        tier => DifficultyPlan::Replace(FilterState::default().toggled(&tier.filter_key())),
    }
}

/// Tier keys left over from a standalone difficulty must not be OR-ed with
/// categories; the tier narrows the category pool instead.
pub fn without_tier_keys(filter: &FilterState) -> FilterState {
    let mut stripped = filter.clone();
    stripped.retain(|key| !Difficulty::is_filter_key(key));
    stripped
}

pub fn narrow(
    pool: &[Country],
    difficulty: Difficulty,
    registry: &PredicateRegistry,
) -> Vec<Country> {
    pool.iter()
        .filter(|country| difficulty.matches(registry, country))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Coordinate;

    fn country(code: &str) -> Country {
        Country::new(code, code.to_uppercase(), Coordinate::new(0.0, 0.0))
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("".parse::<Difficulty>().unwrap(), Difficulty::All);
        assert_eq!(
            "impossible".parse::<Difficulty>(),
            Err(QuizError::UnknownDifficulty("impossible".to_string()))
        );
    }

    #[test]
    fn test_plan_replaces_default_filter() {
        let plan = plan(&FilterState::default(), Difficulty::Expert);
        assert!(!plan.narrows());
        assert_eq!(plan.filter().serialize(), "difficulty-expert");
    }

    #[test]
    fn test_plan_keeps_category_filter() {
        let filter = FilterState::parse("europe|microstates");
        let plan = plan(&filter, Difficulty::Easy);
        assert!(plan.narrows());
        assert_eq!(plan.filter(), &filter);
    }

    #[test]
    fn test_plan_drops_tier_key_once_category_joins() {
        let filter = FilterState::parse("difficulty-easy").toggled("europe");
        assert!(has_category_filter(&filter));

        let plan = plan(&filter, Difficulty::Easy);
        assert!(plan.narrows());
        assert_eq!(plan.filter().serialize(), "europe");
    }

    #[test]
    fn test_plan_all_clears_standalone_tier() {
        let filter = FilterState::parse("difficulty-hard");
        assert!(is_difficulty_only(&filter));
        let plan = plan(&filter, Difficulty::All);
        assert!(plan.filter().is_default());
    }

    #[test]
    fn test_narrow_preserves_order() {
        let registry = PredicateRegistry::builtin().unwrap();
        let pool = vec![country("va"), country("us"), country("mc"), country("fr")];
        let expert: Vec<String> = narrow(&pool, Difficulty::Expert, &registry)
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(expert, vec!["va", "mc"]);
        assert_eq!(narrow(&pool, Difficulty::All, &registry).len(), 4);
    }
}
