use crate::domain::error::QuizError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Classic,
    Practice,
    Daily,
    Endless,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Practice => "practice",
            GameMode::Daily => "daily",
            GameMode::Endless => "endless",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Classic => write!(f, "Classic"),
            GameMode::Practice => write!(f, "Practice"),
            GameMode::Daily => write!(f, "Daily"),
            GameMode::Endless => write!(f, "Endless"),
        }
    }
}

impl FromStr for GameMode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(GameMode::Classic),
            "practice" => Ok(GameMode::Practice),
            "daily" => Ok(GameMode::Daily),
            "endless" => Ok(GameMode::Endless),
            other => Err(QuizError::UnknownGameMode(other.to_string())),
        }
    }
}
