//! Detail modal: entry info, the review form (or a login prompt), and the
//! review list of the open entry.
//!
//! The review list reads the `CommentFeed` view model the review board renders
//! into; the form visibility comes from the `ProfileBadge` the session manager
//! renders into.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{AppState, ComposeFocus, Mode};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};
use crate::view::{CommentRow, stars};

/// Renders the detail modal for the entry the review board has open.
///
/// Does nothing when no entry is open or the entry is missing from the catalog.
pub fn render_detail(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let Some(entry) = state
        .board
        .active_entry()
        .and_then(|id| state.catalog.get(id))
    else {
        return;
    };

    let area = frame
        .area()
        .centered(Constraint::Percentage(85), Constraint::Percentage(85));
    frame.render_widget(Clear, area);

    let focused = state.login.is_none() && matches!(state.mode, Mode::Detail | Mode::Compose);
    let title = format!(" {} ", entry.title);
    frame.render_widget(panel_block(title, focused, theme), area);

    let [info, form, reviews] = inner_rect(area).layout(&Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Fill(1),
    ]));

    let info_text = Text::from(vec![
        Line::from(vec![
            Span::styled(format!("★ {}", entry.rating), Style::default().fg(theme.score)),
            Span::styled(
                format!("  {}  ·  {} episodes  ·  {}", entry.year, entry.episodes, entry.genre.label()),
                Style::default().fg(theme.muted),
            ),
        ]),
        Line::from(""),
        Line::styled(entry.description.clone(), Style::default().fg(theme.text)),
    ]);
    frame.render_widget(Paragraph::new(info_text).wrap(Wrap { trim: true }), info);

    render_form(frame, form, state, theme);
    render_reviews(frame, reviews, state, theme);
}

/// The review form for signed-in users, a login prompt for everyone else.
fn render_form(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    if !state.session.sink().comment_form_visible {
        let prompt = Text::from(vec![
            Line::styled("Sign in to leave a review.", Style::default().fg(theme.text)),
            Line::styled("Press a or c to sign in.", Style::default().fg(theme.muted)),
        ]);
        frame.render_widget(
            Paragraph::new(prompt).block(panel_block(" Write a review ", false, theme)),
            area,
        );
        return;
    }

    let composing = state.mode == Mode::Compose && state.login.is_none();
    let draft = state.board.draft();
    let focus_style = |field: ComposeFocus| {
        if composing && state.compose_focus == field {
            Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        }
    };

    let cursor = if composing && state.compose_focus == ComposeFocus::Text { "▏" } else { "" };
    let body = if draft.text.is_empty() && cursor.is_empty() {
        Span::styled("Share your thoughts… (c to start)", Style::default().fg(theme.muted))
    } else {
        Span::styled(format!("{}{cursor}", draft.text), Style::default().fg(theme.text))
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Rating  ", focus_style(ComposeFocus::Stars)),
            Span::styled(stars(draft.displayed_rating()), Style::default().fg(theme.star)),
        ]),
        Line::from(vec![Span::styled("Review  ", focus_style(ComposeFocus::Text)), body]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(panel_block(" Write a review ", composing, theme)),
        area,
    );
}

/// Newest-first review list with the highlighted row in `Detail` mode.
fn render_reviews(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let rows = &state.board.sink().rows;
    let title = format!(" Reviews ({}) ", rows.len());

    let items: Vec<ListItem> = if rows.is_empty() {
        vec![ListItem::new(Line::styled(
            "No reviews yet. Be the first!",
            Style::default().fg(theme.muted),
        ))]
    } else {
        rows.iter().map(|row| review_item(row, theme)).collect()
    };

    let mut list_state = ListState::default();
    if state.mode == Mode::Detail && !rows.is_empty() {
        list_state.select(Some(state.comment_cursor.min(rows.len() - 1)));
    }

    let list = List::new(items)
        .block(panel_block(title, false, theme))
        .highlight_symbol("▌")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn review_item<'a>(row: &CommentRow, theme: &Theme) -> ListItem<'a> {
    let heart = if row.liked {
        Span::styled(format!("♥ {}", row.likes), Style::default().fg(theme.liked))
    } else {
        Span::styled(format!("♡ {}", row.likes), Style::default().fg(theme.muted))
    };
    ListItem::new(Text::from(vec![
        Line::from(vec![
            Span::styled(row.author.clone(), Style::default().fg(theme.author).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(row.stars.clone(), Style::default().fg(theme.star)),
            Span::styled(format!("  {}", row.date), Style::default().fg(theme.muted)),
        ]),
        Line::styled(row.text.clone(), Style::default().fg(theme.text)),
        Line::from(heart),
    ]))
}
