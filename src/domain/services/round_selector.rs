use crate::domain::entities::Country;
use crate::domain::error::QuizError;
use rand::Rng;
use rand::seq::SliceRandom;

const MAX_SELECTION_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct RoundSelector {
    previous: Option<String>,
}

impl RoundSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Shuffles the pool and takes the first entry that differs from the
    /// previous target. A single-entry pool may repeat.
    pub fn select_random<R: Rng + ?Sized>(
        &mut self,
        pool: &[Country],
        rng: &mut R,
    ) -> Result<Country, QuizError> {
        if pool.is_empty() {
            return Err(QuizError::EmptySelection);
        }

        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.shuffle(rng);

        let previous = self.previous.as_deref();
        let index = order
            .iter()
            .take(MAX_SELECTION_ATTEMPTS)
            .copied()
            .find(|&i| Some(pool[i].code.as_str()) != previous)
            .unwrap_or(order[0]);

        let selected = pool[index].clone();
        tracing::debug!("Selected {} from a pool of {}", selected, pool.len());
        self.previous = Some(selected.code.clone());
        Ok(selected)
    }

    pub fn select_sequential(
        &mut self,
        sequence: &[Country],
        round_index: usize,
    ) -> Result<Country, QuizError> {
        if sequence.is_empty() {
            return Err(QuizError::EmptySelection);
        }

        let selected = sequence
            .get(round_index)
            .cloned()
            .ok_or(QuizError::RoundOutOfRange {
                index: round_index,
                len: sequence.len(),
            })?;
        self.previous = Some(selected.code.clone());
        Ok(selected)
    }
}
