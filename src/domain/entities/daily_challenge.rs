use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub date: String,
    pub codes: Vec<String>,
}

impl DailyChallenge {
    pub fn new(date: NaiveDate, codes: Vec<String>) -> Self {
        Self {
            date: date.to_string(),
            codes,
        }
    }

    pub fn is_for(&self, date: NaiveDate) -> bool {
        self.date == date.to_string()
    }
}
