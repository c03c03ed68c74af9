//! Screen layout for anfeeds.
//!
//! This module is pure layout arithmetic plus the two fixed chrome rows (header
//! and status bar). It is called inside `Screen::draw()` on every render so every
//! frame gets a fresh layout that reflects the current terminal size.
//!
//! # Geometry
//!
//! A 1-row header, the main area, and a 1-row status bar. The main area holds the
//! genre menu on the left and the catalog on the right; below 60 columns the menu
//! collapses and the catalog fills the full width.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single column.

use anfeeds_core::FormMode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Width of the genre menu when shown.
const MENU_WIDTH: u16 = 22;

/// Returns `[header, menu, catalog, status_bar]` `Rect`s for the current frame.
///
/// The returned rects are valid only for the current draw closure; never store
/// them across frames. `menu` has zero width on narrow terminals.
pub fn compute_layout(frame: &Frame) -> [Rect; 4] {
    let term_width = frame.area().width;

    let [header, main_area, status_bar] = frame.area().layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    let menu_width = if term_width >= 60 { MENU_WIDTH } else { 0 };
    let [menu, catalog] = main_area.layout(
        &Layout::horizontal([Constraint::Length(menu_width), Constraint::Fill(1)])
            .spacing(Spacing::Overlap(1)),
    );

    [header, menu, catalog, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel or modal.
///
/// Applies `BorderType::Thick` when the panel has focus and `BorderType::Plain`
/// otherwise. Uses `MergeStrategy::Fuzzy` because `Exact` produces incorrect
/// junctions when mixing `Thick` and `Plain` borders.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the header row: app name and page title on the left, the profile
/// badge on the right.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let badge = state.session.sink();

    let title = if state.search_active {
        format!("Search: \"{}\"", state.search_query)
    } else {
        state.genre.page_title()
    };
    let left = Line::from(vec![
        Span::styled(
            " AnFeeds ",
            Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("│ {title}"), Style::default().fg(theme.text)),
    ]);

    let right = (if badge.signed_in {
        Line::from(vec![
            Span::styled(
                format!("● {}", badge.display_name),
                Style::default().fg(theme.author).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" <{}> ", badge.email), Style::default().fg(theme.muted)),
        ])
    } else {
        let label = match badge.form_mode {
            FormMode::SignIn => "a: sign in ",
            FormMode::SignUp => "a: sign up ",
        };
        Line::from(Span::styled(label, Style::default().fg(theme.muted)))
    })
    .right_aligned();

    frame.render_widget(Paragraph::new(left), area);
    frame.render_widget(Paragraph::new(right), area);
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Always shows a mode indicator followed by the keys that matter on the current
/// screen. Never renders blank.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg, hints) = if state.login.is_some() {
        (
            " LOGIN ",
            theme.status_mode_insert,
            "Tab next field  Enter submit  Ctrl-s switch  Esc close",
        )
    } else {
        match state.mode {
            Mode::Browse => (
                " BROWSE ",
                theme.status_mode_normal,
                "j/k move  Enter open  1-6 genre  / search  t theme  ? help  q quit",
            ),
            Mode::Search => (" SEARCH ", theme.status_mode_insert, "type to filter  Enter keep  Esc clear"),
            Mode::Detail => (
                " DETAIL ",
                theme.status_mode_normal,
                "j/k review  l like  s share  c write  Esc back",
            ),
            Mode::Compose => (
                " REVIEW ",
                theme.status_mode_insert,
                "0-5 stars  ←/→ preview  Tab text  Enter post  Esc discard",
            ),
            Mode::HelpOverlay => (" HELP ", theme.status_mode_normal, "j/k scroll  Esc close"),
            Mode::ConfirmQuit => (" QUIT? ", theme.status_mode_normal, "y quit  n stay"),
        }
    };

    let status_line = Line::from(vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::raw(hints),
    ]);

    frame.render_widget(
        Paragraph::new(status_line)
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
