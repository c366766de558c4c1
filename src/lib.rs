//! Country filter and pool-selection engine for a flag quiz.

pub mod application;
pub mod domain;
pub mod infrastructure;
