pub mod session;
pub mod use_case_container;
pub mod use_cases;

pub use session::QuizSession;
pub use use_case_container::UseCaseContainer;
