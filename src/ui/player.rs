//! Now playing panel
//!
//! Thumbnail art, title and state, progress gauge and the status line.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
    Frame,
};

use super::Theme;
use crate::app::App;

/// Render the main area
pub fn render_now_playing(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(" ▶ NOW PLAYING ", Theme::success()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Thumbnail
            Constraint::Length(2), // Title + uploader
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Elapsed / remaining
            Constraint::Length(1), // Controls
            Constraint::Length(1), // Status
        ])
        .split(inner);

    render_thumbnail(frame, chunks[0], app);
    render_title(frame, chunks[1], app);
    render_progress(frame, chunks[2], chunks[3], app);
    render_controls(frame, chunks[4], app);
    render_status(frame, chunks[5], app);
}

fn render_thumbnail(frame: &mut Frame, area: Rect, app: &App) {
    // playing item first, otherwise whatever is highlighted
    let item = app.session.item().or_else(|| app.cursor.current());

    match item.and_then(|i| app.art(i.id())) {
        Some(art) => frame.render_widget(art, area),
        None => {
            let y = area.y + area.height / 2;
            let placeholder = Paragraph::new(Span::styled("No thumb", Theme::dimmed()))
                .alignment(Alignment::Center);
            frame.render_widget(placeholder, Rect::new(area.x, y, area.width, 1.min(area.height)));
        }
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.session.state();

    let lines = match app.session.item() {
        Some(item) => vec![
            Line::from(vec![
                Span::styled(
                    item.title().to_string(),
                    ratatui::style::Style::default()
                        .fg(Theme::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(format!("[{}]", state.label()), Theme::state(state)),
            ]),
            Line::from(Span::styled(item.uploader().to_string(), Theme::secondary())),
        ],
        None => vec![
            Line::from(vec![
                Span::styled("Nothing playing", Theme::dimmed()),
                Span::raw("  "),
                Span::styled(format!("[{}]", state.label()), Theme::state(state)),
            ]),
            Line::from(""),
        ],
    };

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_progress(frame: &mut Frame, gauge_area: Rect, label_area: Rect, app: &App) {
    let display = app.progress.display();

    let gauge = Gauge::default()
        .gauge_style(Theme::gauge())
        .ratio(display.ratio())
        .label(display.percent_label());
    frame.render_widget(gauge, gauge_area);

    let width = usize::from(label_area.width);
    let used = display.elapsed.chars().count() + display.remaining.chars().count();
    let gap = width.saturating_sub(used);
    let labels = Line::from(vec![
        Span::styled(display.elapsed.clone(), Theme::text()),
        Span::raw(" ".repeat(gap)),
        Span::styled(display.remaining.clone(), Theme::dimmed()),
    ]);
    frame.render_widget(Paragraph::new(labels), label_area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let volume = app
        .volume()
        .map(|v| format!("Vol {}", v))
        .unwrap_or_else(|| "Vol --".to_string());

    let line = Line::from(vec![
        Span::styled(" ⏮ p ", Theme::keybind()),
        Span::raw(" "),
        Span::styled(" ⏯ SPACE ", Theme::keybind()),
        Span::raw(" "),
        Span::styled(" ⏹ s ", Theme::keybind()),
        Span::raw(" "),
        Span::styled(" ⏭ n ", Theme::keybind()),
        Span::raw("   "),
        Span::styled(volume, Theme::text()),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let Some(status) = app.status.as_deref() else {
        return;
    };
    let style = if app.session.error().is_some() {
        Theme::error()
    } else {
        Theme::dimmed()
    };
    frame.render_widget(
        Paragraph::new(Span::styled(status.to_string(), style)).alignment(Alignment::Center),
        area,
    );
}
