use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QuizError {
    #[error("country list has not been loaded yet")]
    NotReady,

    #[error("no countries match the filter '{filter}'")]
    EmptyPool { filter: String },

    #[error("cannot pick a round from an empty pool")]
    EmptySelection,

    #[error("round {index} is outside the sequence of {len} countries")]
    RoundOutOfRange { index: usize, len: usize },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("unknown game mode: {0}")]
    UnknownGameMode(String),

    #[error("invalid predicate data: {0}")]
    InvalidPredicateData(String),

    #[error("no round is in progress")]
    NoActiveRound,

    #[error("the game is over")]
    GameOver,

    #[error("storage failure: {0}")]
    Storage(String),
}
