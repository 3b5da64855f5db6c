//! Terminal UI components
//!
//! Sidebar with search and results on the left, now playing on the right,
//! key bindings in the footer. The renderer only reads `App`.

pub mod player;
pub mod search;
pub mod theme;
pub mod thumbnail;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Notice};

/// Screen regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub search: Rect,
    pub results: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Body
                Constraint::Length(1), // Footer
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Min(1)])
            .split(rows[0]);

        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(body[0]);

        Self {
            search: sidebar[0],
            results: sidebar[1],
            main: body[1],
            footer: rows[1],
        }
    }
}

/// Number of result rows that fit on a screen of `area`
pub fn visible_result_rows(area: Rect) -> usize {
    usize::from(AppLayout::new(area).results.height.saturating_sub(2))
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    let layout = AppLayout::new(area);
    search::render_search_input(frame, layout.search, app);
    search::render_results(frame, layout.results, app);
    player::render_now_playing(frame, layout.main, app);
    render_footer(frame, layout.footer);

    if let Some(notice) = app.notice() {
        render_notice(frame, area, notice);
    }
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let bindings = [
        ("/", "search"),
        ("↵", "play"),
        ("↑↓", "move"),
        ("SPACE", "pause"),
        ("←→", "seek"),
        ("n/p", "next/prev"),
        ("s", "stop"),
        ("9/0", "volume"),
        ("q", "quit"),
    ];

    let mut spans = Vec::with_capacity(bindings.len() * 2);
    for (key, desc) in bindings {
        spans.push(Span::styled(format!(" {} ", key), Theme::keybind()));
        spans.push(Span::styled(format!(" {} ", desc), Theme::dimmed()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::status_bar()), area);
}

/// Toast in the top right corner
fn render_notice(frame: &mut Frame, area: Rect, notice: &Notice) {
    let width = (notice.message.chars().count() as u16 + 4)
        .clamp(16, 60)
        .min(area.width);
    let height = 3.min(area.height);

    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1.min(area.height.saturating_sub(height)),
        width,
        height,
    };

    frame.render_widget(Clear, toast_area);

    let style = Theme::notice(notice.level);
    let toast = Paragraph::new(Span::styled(notice.message.clone(), style))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(style)
                .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        );

    frame.render_widget(toast, toast_area);
}
