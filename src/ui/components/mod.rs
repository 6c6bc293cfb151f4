//! UI components for the TUI
//!
//! Each component is a ratatui [`Widget`](ratatui::widgets::Widget) borrowing
//! the state it renders.

pub mod card;
pub mod error;
pub mod header;
pub mod input;
pub mod spinner;

pub use card::{CardComponent, CardView};
pub use error::ErrorComponent;
pub use header::HeaderComponent;
pub use input::InputComponent;
pub use spinner::SpinnerComponent;
