pub mod entities;
pub mod error;
pub mod filter;
pub mod repositories;
pub mod services;

pub use error::QuizError;
