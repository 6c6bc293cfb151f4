//! Results component: the rendered book card and its detailed analysis pager.

use crate::card::BookCard;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Widget, Wrap},
};
use std::cell::Cell;

const HEADING: Style = Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD);
const BODY: Style = Style::new().fg(Color::Gray);

/// A card on screen together with its view state.
///
/// The details toggle, the page index and the scroll offset live here so they
/// start over for every new card.
#[derive(Debug, Clone)]
pub struct CardView {
    card: BookCard,
    expanded: bool,
    page: usize,
    scroll: u16,
    /// Largest useful scroll offset, as of the last render
    max_scroll: Cell<u16>,
}

impl CardView {
    pub fn new(card: BookCard) -> Self {
        Self {
            card,
            expanded: false,
            page: 0,
            scroll: 0,
            max_scroll: Cell::new(0),
        }
    }

    pub fn card(&self) -> &BookCard {
        &self.card
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn toggle_details(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn next_page(&mut self) {
        let len = self.card.detailed_analysis.len();
        if len > 0 {
            self.page = (self.page + 1) % len;
        }
    }

    pub fn prev_page(&mut self) {
        let len = self.card.detailed_analysis.len();
        if len > 0 {
            self.page = (self.page + len - 1) % len;
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self
            .scroll
            .saturating_add(lines)
            .min(self.max_scroll.get());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn current_page(&self) -> Option<&str> {
        self.card.detailed_analysis.get(self.page).map(String::as_str)
    }

    pub fn page_indicator(&self) -> String {
        format!("{} / {}", self.page + 1, self.card.detailed_analysis.len())
    }

    /// Border colour: the card's theme colour when valid, the default accent otherwise
    pub fn accent(&self) -> Color {
        let (r, g, b) = self.card.accent_rgb();
        Color::Rgb(r, g, b)
    }
}

/// Renders a [`CardView`].
///
/// The details section is pinned to the bottom of the card so the toggle,
/// the current page and the page indicator stay on screen; the rest of the
/// card scrolls above it.
pub struct CardComponent<'a> {
    view: &'a CardView,
}

impl<'a> CardComponent<'a> {
    pub fn new(view: &'a CardView) -> Self {
        Self { view }
    }

    fn body_lines(&self) -> Vec<Line<'a>> {
        let card = self.view.card();
        let accent = self.view.accent();
        let mut lines = Vec::new();

        lines.push(
            Line::from(Span::styled(
                card.title.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        );
        if !card.author.is_empty() {
            lines.push(
                Line::from(Span::styled(
                    format!("by {}", card.author),
                    Style::default().fg(Color::DarkGray),
                ))
                .alignment(Alignment::Center),
            );
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Summary", HEADING)));
        lines.push(Line::from(Span::styled(card.summary.as_str(), BODY)));

        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Key takeaways", HEADING)));
        for (i, takeaway) in card.takeaways.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(accent)),
                Span::styled(takeaway.as_str(), BODY),
            ]));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Quote", HEADING)));
        lines.push(Line::from(vec![
            Span::styled("│ ", Style::default().fg(accent)),
            Span::styled(
                format!("\"{}\"", card.quote),
                BODY.add_modifier(Modifier::ITALIC),
            ),
        ]));

        lines
    }

    fn toggle_line(&self) -> Line<'a> {
        let toggle = if self.view.expanded() {
            "▲ Hide details"
        } else {
            "▼ Show details"
        };
        Line::from(Span::styled(toggle, HEADING))
    }

    fn indicator_line(&self) -> Line<'a> {
        let accent = self.view.accent();
        Line::from(vec![
            Span::styled("◀  ", Style::default().fg(accent)),
            Span::styled(
                self.view.page_indicator(),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled("  ▶", Style::default().fg(accent)),
        ])
        .alignment(Alignment::Center)
    }

    /// Rows the details section needs: toggle, wrapped page text, indicator
    fn details_height(&self, width: u16, available: u16) -> u16 {
        if self.view.card().detailed_analysis.is_empty() {
            return 0;
        }
        if !self.view.expanded() {
            return available.min(1);
        }
        let page_lines = self
            .view
            .current_page()
            .map(|page| {
                Paragraph::new(page)
                    .wrap(Wrap { trim: true })
                    .line_count(width) as u16
            })
            .unwrap_or(0);
        // Separator + toggle + page + indicator
        (page_lines + 3).min(available)
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        if !self.view.expanded() {
            Paragraph::new(self.toggle_line()).render(area, buf);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        Paragraph::new(self.toggle_line()).render(chunks[1], buf);
        if let Some(page) = self.view.current_page() {
            Paragraph::new(Span::styled(page, BODY))
                .wrap(Wrap { trim: true })
                .render(chunks[2], buf);
        }
        Paragraph::new(self.indicator_line()).render(chunks[3], buf);
    }
}

impl<'a> Widget for CardComponent<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.view.accent()))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);

        let details = self.details_height(inner.width, inner.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(details)])
            .split(inner);

        let body = Paragraph::new(self.body_lines()).wrap(Wrap { trim: true });
        let total_lines = body.line_count(chunks[0].width) as u16;
        let max_scroll = total_lines.saturating_sub(chunks[0].height);
        self.view.max_scroll.set(max_scroll);

        body.scroll((self.view.scroll().min(max_scroll), 0))
            .render(chunks[0], buf);
        self.render_details(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(theme_color: &str) -> BookCard {
        BookCard {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            summary: "Spice and sand.".to_string(),
            takeaways: vec!["Fear".to_string(), "Ecology".to_string(), "Power".to_string()],
            quote: "Fear is the mind-killer.".to_string(),
            theme_color: theme_color.to_string(),
            detailed_analysis: vec![
                "Themes page".to_string(),
                "Characters page".to_string(),
                "Ending page".to_string(),
            ],
        }
    }

    fn render(view: &CardView) -> Buffer {
        let area = Rect::new(0, 0, 60, 30);
        let mut buf = Buffer::empty(area);
        CardComponent::new(view).render(area, &mut buf);
        buf
    }

    fn text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_prev_wraps_backward_and_next_wraps_forward() {
        let mut view = CardView::new(card("#4A90E2"));
        view.prev_page();
        assert_eq!(view.page(), 2);
        view.next_page();
        assert_eq!(view.page(), 0);
        view.next_page();
        view.next_page();
        assert_eq!(view.page(), 2);
        assert_eq!(view.page_indicator(), "3 / 3");
    }

    #[test]
    fn test_accent_uses_valid_theme_color() {
        let view = CardView::new(card("#4A90E2"));
        assert_eq!(view.accent(), Color::Rgb(0x4A, 0x90, 0xE2));
        let buf = render(&view);
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(0x4A, 0x90, 0xE2));
    }

    #[test]
    fn test_invalid_theme_color_renders_with_default_accent() {
        let view = CardView::new(card("not-a-color"));
        assert_eq!(view.accent(), Color::Rgb(0xA8, 0x55, 0xF7));
        let content = text(&render(&view));
        assert!(content.contains("Dune"));
        assert!(content.contains("by Frank Herbert"));
    }

    #[test]
    fn test_details_hidden_until_toggled() {
        let mut view = CardView::new(card("#4A90E2"));
        let collapsed = text(&render(&view));
        assert!(collapsed.contains("Show details"));
        assert!(!collapsed.contains("Themes page"));

        view.toggle_details();
        view.next_page();
        let expanded = text(&render(&view));
        assert!(expanded.contains("Hide details"));
        assert!(expanded.contains("Characters page"));
        assert!(expanded.contains("2 / 3"));
    }

    #[test]
    fn test_takeaways_are_numbered() {
        let content = text(&render(&CardView::new(card("#fff"))));
        assert!(content.contains("1. Fear"));
        assert!(content.contains("3. Power"));
    }
}
