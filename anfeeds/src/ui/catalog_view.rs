//! Catalog and genre menu renderers.
//!
//! The catalog is one `List` with a heading row per genre section followed by
//! that section's entries. Only entry rows are selectable; the cursor in
//! `AppState` indexes entries, so it is mapped to a list row here.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use anfeeds_core::{CatalogEntry, Genre};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the left genre menu. The active filter is highlighted; while a search
/// is active the menu is dimmed since the query overrides it.
pub fn render_genre_menu(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let active = state.genre.menu_index();
    let dimmed = state.search_active && !state.search_query.trim().is_empty();

    let labels = std::iter::once("All").chain(Genre::ALL.iter().map(|g| g.label()));
    let lines: Vec<Line> = labels
        .enumerate()
        .map(|(i, label)| {
            let marker = if i == active { "▶" } else { " " };
            let style = if dimmed {
                Style::default().fg(theme.muted)
            } else if i == active {
                Style::default().fg(theme.heading).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(format!("{marker} {} ", i + 1), Style::default().fg(theme.muted)),
                Span::styled(label.to_owned(), style),
            ])
        })
        .collect();

    frame.render_widget(panel_block(" Genres ", false, theme), area);
    frame.render_widget(Paragraph::new(lines), inner_rect(area));
}

/// Renders the catalog panel from the current filter and query.
///
/// Uses `render_stateful_widget` so the selection highlight follows the cursor.
/// The inner height is cached for half-page movement on the next keypress.
pub fn render_catalog(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    state.catalog_viewport_height = inner_rect(area).height;

    let is_focused = matches!(state.mode, Mode::Browse | Mode::Search) && state.login.is_none();
    let title = if state.search_active {
        format!(" Search: {}▏", state.search_query)
    } else {
        format!(" {} ", state.genre.page_title())
    };

    let sections = state.catalog.sections(state.genre, &state.search_query);
    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_row = None;
    let mut entry_index = 0usize;

    for section in &sections {
        items.push(ListItem::new(Line::from(Span::styled(
            section.genre.label().to_owned(),
            Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
        ))));
        if section.entries.is_empty() {
            items.push(ListItem::new(Line::styled("  (no titles)", Style::default().fg(theme.muted))));
        }
        for entry in &section.entries {
            if entry_index == state.catalog_cursor {
                selected_row = Some(items.len());
            }
            items.push(entry_item(entry, theme));
            entry_index += 1;
        }
    }

    if sections.is_empty() {
        let msg = format!("No anime found for \"{}\"", state.search_query.trim());
        items.push(ListItem::new(Line::styled(msg, Style::default().fg(theme.muted))));
    }

    let list = List::new(items)
        .block(panel_block(title, is_focused, theme))
        .highlight_style(Style::default().fg(theme.border_active).add_modifier(Modifier::REVERSED));

    state.catalog_list_state.select(selected_row);
    frame.render_stateful_widget(list, area, &mut state.catalog_list_state);
}

/// One catalog row: `  Frieren  ★ 9.3  2023 · 28 eps`.
fn entry_item<'a>(entry: &CatalogEntry, theme: &Theme) -> ListItem<'a> {
    ListItem::new(Line::from(vec![
        Span::styled(format!("  {}", entry.title), Style::default().fg(theme.text)),
        Span::styled(format!("  ★ {}", entry.rating), Style::default().fg(theme.score)),
        Span::styled(
            format!("  {} · {} eps", entry.year, entry.episodes),
            Style::default().fg(theme.muted),
        ),
    ]))
}
