//! Loading component shown while a generation call is in flight

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct SpinnerComponent<'a> {
    title: &'a str,
    tick: usize,
}

impl<'a> SpinnerComponent<'a> {
    pub fn new(title: &'a str, tick: usize) -> Self {
        Self { title, tick }
    }
}

impl<'a> Widget for SpinnerComponent<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let frame = FRAMES[self.tick % FRAMES.len()];
        let lines = vec![
            Line::default(),
            Line::from(vec![
                Span::styled(frame, Style::default().fg(Color::Magenta)),
                Span::raw(" Writing your card..."),
            ]),
            Line::from(Span::styled(
                self.title,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::ITALIC),
            )),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_shows_title_and_advances() {
        let area = Rect::new(0, 0, 40, 5);
        let mut first = Buffer::empty(area);
        SpinnerComponent::new("Dune", 0).render(area, &mut first);
        let mut second = Buffer::empty(area);
        SpinnerComponent::new("Dune", 1).render(area, &mut second);

        let content: String = first.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Dune"));
        assert!(content.contains("⠋"));
        assert_ne!(first, second);
    }
}
