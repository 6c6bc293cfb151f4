//! Input component for the book title

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const PLACEHOLDER: &str = "e.g. The Hitchhiker's Guide to the Galaxy";

pub struct InputComponent<'a> {
    text: &'a str,
    cursor: usize,
    notice: Option<&'a str>,
    disabled: bool,
}

impl<'a> InputComponent<'a> {
    pub fn new(text: &'a str, cursor: usize) -> Self {
        Self {
            text,
            cursor,
            notice: None,
            disabled: false,
        }
    }

    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn field_line(&self) -> Line<'a> {
        if self.disabled {
            return Line::from(Span::styled(self.text, Style::default().fg(Color::DarkGray)));
        }
        if self.text.is_empty() {
            return Line::from(vec![
                Span::styled(" ", Style::default().bg(Color::Magenta)),
                Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
            ]);
        }

        // Render the char under the cursor inverted
        let cursor = self.cursor.min(self.text.len());
        let (before, rest) = self.text.split_at(cursor);
        let mut chars = rest.chars();
        let under = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
        let after = chars.as_str();

        Line::from(vec![
            Span::styled(before, Style::default().fg(Color::White)),
            Span::styled(under, Style::default().fg(Color::Black).bg(Color::Magenta)),
            Span::styled(after, Style::default().fg(Color::White)),
        ])
    }
}

impl<'a> Widget for InputComponent<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.disabled {
            Color::DarkGray
        } else {
            Color::Magenta
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Enter a book title ")
            .border_style(Style::default().fg(border));

        let mut lines = vec![self.field_line()];
        if let Some(notice) = self.notice {
            lines.push(Line::from(Span::styled(
                notice,
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(component: InputComponent) -> String {
        let area = Rect::new(0, 0, 60, 4);
        let mut buf = Buffer::empty(area);
        component.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_empty_input_shows_placeholder() {
        let content = render(InputComponent::new("", 0));
        assert!(content.contains("Enter a book title"));
        assert!(content.contains("Hitchhiker"));
    }

    #[test]
    fn test_notice_is_rendered_inline() {
        let content = render(InputComponent::new("", 0).notice(Some("Please enter a book title.")));
        assert!(content.contains("Please enter a book title."));
    }

    #[test]
    fn test_text_is_rendered_with_cursor_in_middle() {
        let content = render(InputComponent::new("Dune", 2));
        assert!(content.contains("Dune"));
    }
}
