//! Sidebar: search input and result list

use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::Theme;
use crate::app::{App, InputMode};

/// Marker shown next to results whose thumbnail is cached
const THUMB_MARKER: &str = "▣ ";
const NO_THUMB_MARKER: &str = "  ";

/// Render the search box
pub fn render_search_input(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Editing;
    let border_style = if editing {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let content = if app.query.text.is_empty() && !editing {
        Line::from(Span::styled("Press / to search", Theme::dimmed()))
    } else {
        Line::from(Span::styled(app.query.text.as_str(), Theme::input()))
    };

    let input = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(" SEARCH ", Theme::title())),
    );
    frame.render_widget(input, area);

    if editing {
        let max_x = area.x.saturating_add(area.width.saturating_sub(2));
        let offset = u16::try_from(app.query.cursor).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(offset).min(max_x);
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// Render the result list
pub fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let title = if app.search.is_busy() {
        Span::styled(" SEARCHING... ", Theme::loading())
    } else {
        Span::styled(format!(" RESULTS ({}) ", app.cursor.len()), Theme::title())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.cursor.is_empty() {
        let hint = if app.search.is_busy() {
            Span::styled("Searching...", Theme::loading())
        } else {
            Span::styled("No results", Theme::dimmed())
        };
        frame.render_widget(Paragraph::new(Line::from(hint)), inner);
        return;
    }

    let rows = usize::from(inner.height);
    let offset = app.cursor.offset();
    let selected = app.cursor.index();
    let playing_id = app.session.item().map(|i| i.id().to_string());

    let items: Vec<ListItem> = app
        .cursor
        .visible(rows)
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if app.thumbnails.contains(item.id()) {
                THUMB_MARKER
            } else {
                NO_THUMB_MARKER
            };
            let now = if playing_id.as_deref() == Some(item.id()) {
                "♪ "
            } else {
                ""
            };
            let line = Line::from(vec![
                Span::styled(marker, Theme::dimmed()),
                Span::raw(now),
                Span::raw(item.title().to_string()),
                Span::styled(format!("  {}", item.uploader()), Theme::secondary()),
            ]);

            if selected == Some(offset + i) {
                ListItem::new(line).style(Theme::list_item_selected())
            } else {
                ListItem::new(line).style(Theme::text())
            }
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}
