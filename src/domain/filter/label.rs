use super::registry::PredicateRegistry;
use super::state::FilterState;

const MAX_NAMED_INCLUDES: usize = 3;
const MAX_NAMED_EXCLUDES: usize = 2;

/// Human-readable summary of a filter, e.g. `Europe + Asia - Middle East`.
pub fn describe(state: &FilterState, registry: &PredicateRegistry) -> String {
    let includes = state.includes();
    let mut label = match includes.len() {
        0 => registry.label(super::ALL_KEY).to_string(),
        n if n <= MAX_NAMED_INCLUDES => labels(includes, registry).join(" + "),
        n => format!("{} Filters", n),
    };

    let excludes = state.excludes();
    match excludes.len() {
        0 => {}
        n if n <= MAX_NAMED_EXCLUDES => {
            label.push_str(" - ");
            label.push_str(&labels(excludes, registry).join(", "));
        }
        n => label.push_str(&format!(" - {} Excluded", n)),
    }

    label
}

pub fn describe_count(count: usize) -> String {
    match count {
        1 => "1 country available".to_string(),
        n => format!("{} countries available", n),
    }
}

fn labels<'a>(keys: &'a [String], registry: &'a PredicateRegistry) -> Vec<&'a str> {
    keys.iter().map(|key| registry.label(key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe_str(encoded: &str) -> String {
        let registry = PredicateRegistry::builtin().unwrap();
        describe(&FilterState::parse(encoded), &registry)
    }

    #[test]
    fn test_all() {
        assert_eq!(describe_str("all"), "All Countries");
    }

    #[test]
    fn test_single_category() {
        assert_eq!(describe_str("scandinavia"), "Scandinavia");
    }

    #[test]
    fn test_joined_categories() {
        assert_eq!(describe_str("europe,asia"), "Europe + Asia");
    }

    #[test]
    fn test_summarized_categories() {
        assert_eq!(describe_str("europe,asia,africa,oceania"), "4 Filters");
    }

    #[test]
    fn test_exclusion_suffix() {
        assert_eq!(describe_str("europe,asia|middle-east"), "Europe + Asia - Middle East");
        assert_eq!(
            describe_str("all|islands,nato"),
            "All Countries - Island Nations, NATO Members"
        );
        assert_eq!(describe_str("africa|islands,nato,opec"), "Africa - 3 Excluded");
    }

    #[test]
    fn test_unknown_key_uses_raw_key() {
        assert_eq!(describe_str("retired-bloc"), "retired-bloc");
    }

    #[test]
    fn test_count_line() {
        assert_eq!(describe_count(1), "1 country available");
        assert_eq!(describe_count(0), "0 countries available");
        assert_eq!(describe_count(195), "195 countries available");
    }
}
