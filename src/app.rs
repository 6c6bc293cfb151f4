//! Application state machine.
//!
//! `App` is the single owner of the title input, the current card and the
//! current error. It never performs I/O: `submit` and `retry` hand back a
//! [`CardRequest`] for the UI loop to run, and the outcome comes back through
//! [`App::complete`].

use crate::agent::{BookCard, GenerationError};
use crate::ui::components::card::CardView;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Inline message shown when submitting an empty title
pub const EMPTY_TITLE_NOTICE: &str = "Please enter a book title.";

const SCROLL_PAGE: u16 = 5;

/// Tag identifying one generation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(u64);

/// A generation call the UI loop should start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRequest {
    pub id: RequestId,
    pub title: String,
}

#[derive(Debug)]
pub enum Phase {
    Idle,
    Loading { request: RequestId, title: String },
    Success(CardView),
    Failed { message: String },
}

#[derive(Debug)]
pub struct App {
    pub input: String,
    /// Cursor position in `input`, in bytes
    pub cursor: usize,
    pub phase: Phase,
    /// Inline validation message under the input
    pub notice: Option<String>,
    /// Title of the most recent request, reused by retry
    pub last_title: Option<String>,
    pub should_quit: bool,
    next_request: u64,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            phase: Phase::Idle,
            notice: None,
            last_title: None,
            should_quit: false,
            next_request: 0,
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    /// Submit the current input. Blank input only sets the inline notice.
    pub fn submit(&mut self) -> Option<CardRequest> {
        if !matches!(self.phase, Phase::Idle) {
            return None;
        }

        let title = self.input.trim();
        if title.is_empty() {
            self.notice = Some(EMPTY_TITLE_NOTICE.to_string());
            return None;
        }

        let title = title.to_string();
        self.last_title = Some(title.clone());
        Some(self.start(title))
    }

    /// Re-issue the request that failed, with the same title.
    pub fn retry(&mut self) -> Option<CardRequest> {
        if !matches!(self.phase, Phase::Failed { .. }) {
            return None;
        }
        let title = self.last_title.clone()?;
        Some(self.start(title))
    }

    fn start(&mut self, title: String) -> CardRequest {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.notice = None;
        self.phase = Phase::Loading {
            request: id,
            title: title.clone(),
        };
        tracing::debug!(request = id.0, %title, "request started");
        CardRequest { id, title }
    }

    /// Apply the outcome of a generation call. Outcomes for anything but the
    /// active request are dropped.
    pub fn complete(&mut self, id: RequestId, outcome: Result<BookCard, GenerationError>) {
        match self.phase {
            Phase::Loading { request, .. } if request == id => {}
            _ => {
                tracing::debug!(request = id.0, "discarding stale generation result");
                return;
            }
        }

        self.phase = match outcome {
            Ok(card) => Phase::Success(CardView::new(card)),
            Err(e) => Phase::Failed {
                message: e.to_string(),
            },
        };
    }

    /// Back to an empty input, dropping any card, error or in-flight request.
    pub fn reset(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.phase = Phase::Idle;
        self.notice = None;
        self.last_title = None;
    }

    /// Map a key press to a state change, returning a request to start if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<CardRequest> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match &mut self.phase {
            Phase::Idle => return self.handle_input_key(key),
            Phase::Loading { .. } => {
                if key.code == KeyCode::Esc {
                    self.reset();
                }
            }
            Phase::Failed { .. } => match key.code {
                KeyCode::Enter | KeyCode::Char('r') => return self.retry(),
                KeyCode::Esc | KeyCode::Char('n') => self.reset(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            Phase::Success(view) => match key.code {
                KeyCode::Enter | KeyCode::Char('d') => view.toggle_details(),
                KeyCode::Left | KeyCode::Char('h') => view.prev_page(),
                KeyCode::Right | KeyCode::Char('l') => view.next_page(),
                KeyCode::Up | KeyCode::Char('k') => view.scroll_up(1),
                KeyCode::Down | KeyCode::Char('j') => view.scroll_down(1),
                KeyCode::PageUp => view.scroll_up(SCROLL_PAGE),
                KeyCode::PageDown => view.scroll_down(SCROLL_PAGE),
                KeyCode::Esc | KeyCode::Char('n') => self.reset(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
        }
        None
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<CardRequest> {
        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) => {
                self.input.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                self.notice = None;
            }
            KeyCode::Backspace => {
                if let Some((idx, _)) = self.input[..self.cursor].char_indices().next_back() {
                    self.input.remove(idx);
                    self.cursor = idx;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.input.len() {
                    self.input.remove(self.cursor);
                }
            }
            KeyCode::Left => {
                if let Some((idx, _)) = self.input[..self.cursor].char_indices().next_back() {
                    self.cursor = idx;
                }
            }
            KeyCode::Right => {
                if let Some(c) = self.input[self.cursor..].chars().next() {
                    self.cursor += c.len_utf8();
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.len(),
            _ => {}
        }
        None
    }
}
