//! The single owner of a player's quiz state.

use crate::domain::entities::{Country, GameMode};
use crate::domain::error::QuizError;
use crate::domain::filter::{FilterState, KeyState, PredicateRegistry, describe, describe_count};
use crate::domain::repositories::{DIFFICULTY_KEY, FILTER_KEY, KeyValueStore};
use crate::domain::services::difficulty::{self, Difficulty};
use crate::domain::services::{Guess, GuessOutcome, PoolResolver, RoundSelector, Scoreboard};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

pub struct QuizSession {
    registry: Arc<PredicateRegistry>,
    store: Arc<dyn KeyValueStore>,

    countries: Vec<Country>,
    filter: FilterState,
    draft: FilterState,
    difficulty: Difficulty,
    pool: Vec<Country>,

    mode: GameMode,
    daily_codes: Vec<String>,
    daily: Vec<Country>,
    selector: RoundSelector,
    scoreboard: Scoreboard,
    round: usize,
    total_rounds: usize,
    current: Option<Country>,
    ended: bool,
    rng: StdRng,
}

impl QuizSession {
    pub fn new(
        registry: Arc<PredicateRegistry>,
        store: Arc<dyn KeyValueStore>,
        total_rounds: usize,
    ) -> Self {
        Self::with_rng(registry, store, total_rounds, StdRng::from_entropy())
    }

    pub fn with_rng(
        registry: Arc<PredicateRegistry>,
        store: Arc<dyn KeyValueStore>,
        total_rounds: usize,
        rng: StdRng,
    ) -> Self {
        Self {
            registry,
            store,
            countries: Vec::new(),
            filter: FilterState::default(),
            draft: FilterState::default(),
            difficulty: Difficulty::All,
            pool: Vec::new(),
            mode: GameMode::Classic,
            daily_codes: Vec::new(),
            daily: Vec::new(),
            selector: RoundSelector::new(),
            scoreboard: Scoreboard::new(),
            round: 0,
            total_rounds: total_rounds.max(1),
            current: None,
            ended: false,
            rng,
        }
    }

    pub fn restore(&mut self) -> Result<(), QuizError> {
        let stored_filter = self.store.get(FILTER_KEY).map_err(storage_error)?;
        let stored_difficulty = self.store.get(DIFFICULTY_KEY).map_err(storage_error)?;

        let filter = stored_filter
            .as_deref()
            .map(FilterState::parse)
            .unwrap_or_default();
        self.filter = if difficulty::has_category_filter(&filter) {
            difficulty::without_tier_keys(&filter)
        } else {
            filter
        };
        self.draft = self.filter.clone();
        self.difficulty = match stored_difficulty.as_deref().map(str::parse::<Difficulty>) {
            Some(Ok(difficulty)) => difficulty,
            Some(Err(e)) => {
                tracing::warn!("Ignoring stored difficulty: {}", e);
                Difficulty::All
            }
            None => Difficulty::All,
        };

        tracing::info!("Restored filter '{}' with difficulty {}", self.filter, self.difficulty);

        match self.refresh_pool() {
            Err(QuizError::NotReady) => Ok(()),
            other => other.map(|_| ()),
        }
    }

    /// Accepts a (re)loaded full country list and re-resolves the pool with
    /// the filter already in force.
    pub fn load_countries(&mut self, countries: Vec<Country>) -> Result<usize, QuizError> {
        let refreshed = !self.countries.is_empty();
        self.countries = countries;

        if refreshed && !self.filter.is_default() {
            tracing::info!("Reapplying filter '{}' to refreshed country list", self.filter);
        }

        if !self.daily_codes.is_empty() {
            self.daily = self.map_daily_codes();
        }

        self.refresh_pool()
    }

    pub fn is_ready(&self) -> bool {
        !self.countries.is_empty()
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn draft(&self) -> &FilterState {
        &self.draft
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn pool(&self) -> &[Country] {
        &self.pool
    }

    pub fn eligible_count(&self) -> usize {
        self.pool.len()
    }

    pub fn toggle_filter(&mut self, key: &str) -> KeyState {
        self.draft.toggle(key)
    }

    pub fn set_draft(&mut self, draft: FilterState) {
        self.draft = draft;
    }

    pub fn discard_draft(&mut self) {
        self.draft = self.filter.clone();
    }

    pub fn preview_count(&self) -> usize {
        let candidate = self.planned(&self.draft, self.difficulty);
        let narrows = self.narrows(&candidate, self.difficulty);
        self.countries
            .iter()
            .filter(|country| candidate.matches(&self.registry, country))
            .filter(|country| !narrows || self.difficulty.matches(&self.registry, country))
            .count()
    }

    pub fn preview_label(&self) -> String {
        describe_count(self.preview_count())
    }

    /// Commits the draft. A draft that resolves to no countries is rejected
    /// and left in place for further editing.
    pub fn apply_filter(&mut self) -> Result<usize, QuizError> {
        let candidate = self.planned(&self.draft, self.difficulty);

        if self.countries.is_empty() {
            tracing::info!("Country list not loaded yet, deferring resolution of '{}'", candidate);
            self.commit_filter(candidate);
            self.pool.clear();
            self.persist(FILTER_KEY, &self.filter.serialize())?;
            return Ok(0);
        }

        let pool = self.compute_pool(&candidate, self.difficulty)?;
        self.commit_filter(candidate);
        self.pool = pool;

        tracing::info!("Applied filter '{}': {} countries", self.filter, self.pool.len());
        self.persist(FILTER_KEY, &self.filter.serialize())?;
        Ok(self.pool.len())
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<usize, QuizError> {
        let plan = difficulty::plan(&self.filter, difficulty);
        let candidate = plan.filter().clone();

        let pool = if self.countries.is_empty() {
            Vec::new()
        } else {
            self.compute_pool(&candidate, difficulty)?
        };

        tracing::info!(
            "Difficulty set to {} ({})",
            difficulty,
            if plan.narrows() { "narrowing category filter" } else { "as filter" }
        );

        self.difficulty = difficulty;
        self.commit_filter(candidate);
        self.pool = pool;

        self.persist(DIFFICULTY_KEY, difficulty.as_str())?;
        self.persist(FILTER_KEY, &self.filter.serialize())?;
        Ok(self.pool.len())
    }

    pub fn label(&self) -> String {
        let label = describe(&self.filter, &self.registry);
        if self.narrows(&self.filter, self.difficulty) {
            format!("{} ({})", label, self.difficulty.label())
        } else {
            label
        }
    }

    pub fn draft_label(&self) -> String {
        describe(&self.draft, &self.registry)
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.restart();
    }

    pub fn set_total_rounds(&mut self, total_rounds: usize) {
        self.total_rounds = total_rounds.max(1);
    }

    pub fn set_daily_challenge(&mut self, codes: &[String]) -> usize {
        self.daily_codes = codes.iter().map(|code| code.to_ascii_lowercase()).collect();
        self.daily = self.map_daily_codes();
        self.daily.len()
    }

    pub fn daily(&self) -> &[Country] {
        &self.daily
    }

    /// Starts a new game. Filter, difficulty and daily list are kept.
    pub fn restart(&mut self) {
        self.round = 0;
        self.current = None;
        self.ended = false;
        self.selector.reset();
        self.scoreboard = Scoreboard::new();
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn total_rounds(&self) -> Option<usize> {
        match self.mode {
            GameMode::Endless => None,
            GameMode::Daily => Some(self.daily.len()),
            GameMode::Classic | GameMode::Practice => Some(self.total_rounds),
        }
    }

    pub fn current(&self) -> Option<&Country> {
        self.current.as_ref()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn is_over(&self) -> bool {
        if self.ended {
            return true;
        }
        match self.total_rounds() {
            Some(total) => self.current.is_none() && self.round >= total,
            None => false,
        }
    }

    pub fn next_round(&mut self) -> Result<Country, QuizError> {
        if self.is_over() {
            return Err(QuizError::GameOver);
        }

        let target = match self.mode {
            GameMode::Daily => self.selector.select_sequential(&self.daily, self.round)?,
            _ => {
                if self.countries.is_empty() {
                    return Err(QuizError::NotReady);
                }
                if self.pool.is_empty() {
                    return Err(QuizError::EmptyPool {
                        filter: self.filter.serialize(),
                    });
                }
                self.selector.select_random(&self.pool, &mut self.rng)?
            }
        };

        self.round += 1;
        self.current = Some(target.clone());
        Ok(target)
    }

    pub fn submit_guess(&mut self, guess: &Guess) -> Result<GuessOutcome, QuizError> {
        let target = self.current.take().ok_or(QuizError::NoActiveRound)?;
        let outcome = self
            .scoreboard
            .record(&target, guess, self.mode == GameMode::Practice);

        if self.mode == GameMode::Endless && !outcome.correct {
            tracing::info!("Endless run over after {} rounds", self.round);
            self.ended = true;
        }
        Ok(outcome)
    }

    pub fn factory_reset(&mut self) -> Result<(), QuizError> {
        self.store.remove(FILTER_KEY).map_err(storage_error)?;
        self.store.remove(DIFFICULTY_KEY).map_err(storage_error)?;

        self.filter = FilterState::default();
        self.draft = FilterState::default();
        self.difficulty = Difficulty::All;
        self.restart();
        tracing::info!("Filter and difficulty reset to defaults");

        match self.refresh_pool() {
            Err(QuizError::NotReady) => Ok(()),
            other => other.map(|_| ()),
        }
    }

    fn refresh_pool(&mut self) -> Result<usize, QuizError> {
        match self.compute_pool(&self.filter, self.difficulty) {
            Ok(pool) => {
                self.pool = pool;
                Ok(self.pool.len())
            }
            Err(e) => {
                self.pool.clear();
                Err(e)
            }
        }
    }

    fn compute_pool(
        &self,
        filter: &FilterState,
        difficulty: Difficulty,
    ) -> Result<Vec<Country>, QuizError> {
        let pool = PoolResolver::resolve(&self.countries, filter, &self.registry)?;
        if !self.narrows(filter, difficulty) {
            return Ok(pool);
        }

        let narrowed = difficulty::narrow(&pool, difficulty, &self.registry);
        if narrowed.is_empty() {
            tracing::warn!("Difficulty {} leaves no countries in '{}'", difficulty, filter);
            return Err(QuizError::EmptyPool {
                filter: filter.serialize(),
            });
        }
        Ok(narrowed)
    }

    fn planned(&self, draft: &FilterState, difficulty: Difficulty) -> FilterState {
        difficulty::plan(draft, difficulty).filter().clone()
    }

    fn narrows(&self, filter: &FilterState, difficulty: Difficulty) -> bool {
        difficulty != Difficulty::All && difficulty::has_category_filter(filter)
    }

    fn commit_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.draft = self.filter.clone();
    }

    fn map_daily_codes(&self) -> Vec<Country> {
        self.daily_codes
            .iter()
            .filter_map(|code| {
                let country = self.countries.iter().find(|c| &c.code == code).cloned();
                if country.is_none() && !self.countries.is_empty() {
                    tracing::warn!("Daily challenge country '{}' is not in the country list", code);
                }
                country
            })
            .collect()
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), QuizError> {
        self.store.set(key, value).map_err(storage_error)
    }
}

fn storage_error(e: anyhow::Error) -> QuizError {
    tracing::error!("Storage failure: {:#}", e);
    QuizError::Storage(format!("{:#}", e))
}
