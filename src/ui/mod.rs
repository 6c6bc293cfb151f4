//! TUI module using ratatui.
//!
//! One task owns the [`App`] and the terminal. Generation calls run on
//! spawned tasks and report back over a channel tagged with their request id,
//! so a result that arrives after a reset is simply dropped by the app.

pub mod components;

use crate::agent::{BookCard, CardService, GenerationError};
use crate::app::{App, CardRequest, Phase, RequestId};
use crate::gemini::TextModel;
use components::{
    CardComponent, ErrorComponent, HeaderComponent, InputComponent, SpinnerComponent,
};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

type Outcome = (RequestId, Result<BookCard, GenerationError>);

/// Run the interactive TUI until the user quits
pub async fn run<M>(service: Arc<CardService<M>>) -> io::Result<()>
where
    M: TextModel + 'static,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    let result = event_loop(&mut terminal, service).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop<M>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: Arc<CardService<M>>,
) -> io::Result<()>
where
    M: TextModel + 'static,
{
    let mut app = App::new();
    let mut events = EventStream::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    let mut tick = tokio::time::interval(Duration::from_millis(100));
    let mut frame_count: usize = 0;

    tracing::info!("tui started");
    loop {
        terminal.draw(|frame| draw(frame, &app, frame_count))?;

        if app.should_quit {
            break;
        }

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(request) = app.handle_key(key) {
                        spawn_request(&service, &tx, request);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => break,
            },
            Some((id, outcome)) = rx.recv() => {
                app.complete(id, outcome);
            }
            _ = tick.tick() => {
                if app.is_loading() {
                    frame_count = frame_count.wrapping_add(1);
                }
            }
        }
    }
    tracing::info!("tui stopped");
    Ok(())
}

fn spawn_request<M>(
    service: &Arc<CardService<M>>,
    tx: &mpsc::UnboundedSender<Outcome>,
    request: CardRequest,
) where
    M: TextModel + 'static,
{
    let service = Arc::clone(service);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = service.generate_card(&request.title).await;
        // The receiver only goes away when the app is shutting down
        let _ = tx.send((request.id, outcome));
    });
}

/// Draw the whole screen for the current app state
pub fn draw(frame: &mut Frame, app: &App, tick: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(HeaderComponent, chunks[0]);
    render_body(app, tick, centered(chunks[1], 80), frame.buffer_mut());
    frame.render_widget(KeyHints { app }, chunks[2]);
}

fn render_body(app: &App, tick: usize, area: Rect, buf: &mut Buffer) {
    match &app.phase {
        Phase::Idle => {
            let area = Rect {
                height: area.height.min(4),
                ..area
            };
            InputComponent::new(&app.input, app.cursor)
                .notice(app.notice.as_deref())
                .render(area, buf);
        }
        Phase::Loading { title, .. } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Length(5)])
                .split(area);
            InputComponent::new(title, title.len())
                .disabled(true)
                .render(chunks[0], buf);
            SpinnerComponent::new(title, tick).render(chunks[1], buf);
        }
        Phase::Failed { message } => {
            let area = Rect {
                height: area.height.min(9),
                ..area
            };
            ErrorComponent::new(message).render(area, buf);
        }
        Phase::Success(view) => CardComponent::new(view).render(area, buf),
    }
}

/// Horizontally centre a column of at most `width` cells
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

struct KeyHints<'a> {
    app: &'a App,
}

impl<'a> Widget for KeyHints<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hints: &[(&str, &str)] = match &self.app.phase {
            Phase::Idle => &[("Enter", "create card"), ("Esc", "quit")],
            Phase::Loading { .. } => &[("Esc", "cancel"), ("Ctrl+C", "quit")],
            Phase::Failed { .. } => &[
                ("Enter/r", "retry"),
                ("Esc/n", "new title"),
                ("q", "quit"),
            ],
            Phase::Success(_) => &[
                ("d", "details"),
                ("←/→", "page"),
                ("↑/↓", "scroll"),
                ("n", "new card"),
                ("q", "quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" • ", Style::default().fg(Color::Blue)));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(":{label}"),
                Style::default().fg(Color::DarkGray),
            ));
        }

        Paragraph::new(Line::from(spans))
            .centered()
            .render(area, buf);
    }
}
