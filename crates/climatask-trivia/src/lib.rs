//! Trivia service for Climatask
//!
//! Fetches categories and multiple-choice questions from Open Trivia DB.

pub mod client;
pub mod error;
pub mod types;

pub use client::TriviaClient;
pub use error::TriviaError;
pub use types::{Category, QuizQuestion, ResponseCode, OPTION_COUNT};
