//! Error panel with retry affordance

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct ErrorComponent<'a> {
    message: &'a str,
}

impl<'a> ErrorComponent<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl<'a> Widget for ErrorComponent<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(Span::styled(
                "Oops! Something went wrong.",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(self.message, Style::default().fg(Color::Red))),
            Line::default(),
            Line::from(vec![
                Span::styled("Enter/r", key),
                Span::styled(": try again  ", Style::default().fg(Color::DarkGray)),
                Span::styled("Esc/n", key),
                Span::styled(": new title", Style::default().fg(Color::DarkGray)),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
