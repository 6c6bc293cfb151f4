//! # Bookcard
//!
//! A TUI application that turns a book title into an AI-generated summary card.
//!
//! ## Features
//!
//! - **Structured Intelligence**: Returns a validated `BookCard` with summary, takeaways, a quote and a paged analysis
//! - **Fail Closed**: Model replies are decoded generically and checked field by field before they reach the UI
//! - **Gemini Backed**: Calls the `generateContent` API with JSON output and low temperature

pub mod agent;
pub mod app;
pub mod card;
pub mod config;
pub mod gemini;
pub mod ui;

pub use agent::{CardService, GenerationError};
pub use app::App;
pub use card::BookCard;
pub use config::Config;
