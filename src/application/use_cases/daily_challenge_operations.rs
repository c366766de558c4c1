use crate::domain::{
    entities::{Country, DailyChallenge},
    repositories::{DAILY_CHALLENGE_KEY, KeyValueStore},
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;

pub struct GetDailyChallenge {
    store: Arc<dyn KeyValueStore>,
    size: usize,
}

impl GetDailyChallenge {
    pub fn new(store: Arc<dyn KeyValueStore>, size: usize) -> Self {
        Self { store, size }
    }

    pub fn execute(&self, date: NaiveDate, countries: &[Country]) -> Result<DailyChallenge> {
        if let Some(saved) = self.store.get(DAILY_CHALLENGE_KEY)? {
            match serde_json::from_str::<DailyChallenge>(&saved) {
                Ok(challenge) if challenge.is_for(date) && !challenge.codes.is_empty() => {
                    return Ok(challenge);
                }
                Ok(_) => tracing::debug!("Stored daily challenge is stale, generating a new one"),
                Err(e) => tracing::warn!("Ignoring unreadable daily challenge: {}", e),
            }
        }

        let challenge = DailyChallenge::new(date, daily_codes(date, countries, self.size));
        let json =
            serde_json::to_string(&challenge).context("Failed to serialize daily challenge")?;
        self.store.set(DAILY_CHALLENGE_KEY, &json)?;

        tracing::info!(
            "Generated daily challenge for {} with {} countries",
            date,
            challenge.codes.len()
        );
        Ok(challenge)
    }
}

/// Deterministic pick of `size` codes for a date: every player with the same
/// country list gets the same sequence.
pub fn daily_codes(date: NaiveDate, countries: &[Country], size: usize) -> Vec<String> {
    let seed: usize = date
        .format("%a %b %d %Y")
        .to_string()
        .chars()
        .map(|c| c as usize)
        .sum();

    let mut shuffled: Vec<&Country> = countries.iter().collect();
    for i in (1..shuffled.len()).rev() {
        let j = (seed + i) % (i + 1);
        shuffled.swap(i, j);
    }

    shuffled
        .into_iter()
        .take(size)
        .map(|country| country.code.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Coordinate;
    use crate::infrastructure::MemoryStore;

    fn countries() -> Vec<Country> {
        (0..30)
            .map(|i| {
                let code = format!("{}{}", (b'a' + i / 10) as char, (b'a' + i % 10) as char);
                Country::new(code.clone(), code, Coordinate::new(0.0, 0.0))
            })
            .collect()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_same_day_same_sequence() {
        let list = countries();
        let first = daily_codes(day(16), &list, 10);
        assert_eq!(first.len(), 10);
        assert_eq!(first, daily_codes(day(16), &list, 10));

        let mut unique = first.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_size_is_capped_by_list() {
        assert_eq!(daily_codes(day(1), &countries()[..3], 10).len(), 3);
        assert!(daily_codes(day(1), &[], 10).is_empty());
    }

    #[test]
    fn test_stored_challenge_is_reused_for_the_day() {
        let store = Arc::new(MemoryStore::new());
        let use_case = GetDailyChallenge::new(store.clone(), 5);
        let list = countries();

        let first = use_case.execute(day(16), &list).unwrap();
        // a later list change must not alter today's sequence
        let second = use_case.execute(day(16), &list[..20]).unwrap();
        assert_eq!(first, second);

        let tomorrow = use_case.execute(day(17), &list).unwrap();
        assert_eq!(tomorrow.date, "2026-10-17");
        let stored = store.get(DAILY_CHALLENGE_KEY).unwrap().unwrap();
        assert!(stored.contains("2026-10-17"));
    }

    #[test]
    fn test_corrupt_entry_is_replaced() {
        let store = Arc::new(MemoryStore::new().with_value(DAILY_CHALLENGE_KEY, "{broken"));
        let challenge = GetDailyChallenge::new(store, 4).execute(day(3), &countries()).unwrap();
        assert_eq!(challenge.codes.len(), 4);
    }
}
