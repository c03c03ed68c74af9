//! Help overlay renderer for anfeeds.
//!
//! Provides `render_help_overlay()` which draws a centred modal box over the current
//! screen using ratatui's `Clear` widget to erase the background first. The
//! overlay is rendered inside the same `Screen::draw()` closure as everything else.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal.
///
/// The paragraph scrolls vertically by `help_scroll` rows so the full key list
/// stays reachable on short terminals. Skipped below 40 columns to avoid a
/// zero-height `Rect`.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to dismiss ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let heading = Style::default().fg(theme.heading).add_modifier(Modifier::BOLD);
    Text::from(vec![
        Line::styled("Catalog", heading),
        Line::from("  j / k         Move down / up"),
        Line::from("  g / G         First / last title"),
        Line::from("  Ctrl-d / u    Half page down / up"),
        Line::from("  Enter / l     Open details and reviews"),
        Line::from("  Alt-1 .. 6    All, Action, Horror, Comedy, Fantasy, Romance"),
        Line::from("  /             Search titles and descriptions (Esc clears)"),
        Line::from(""),
        Line::styled("Details", heading),
        Line::from("  j / k         Select review"),
        Line::from("  l             Like / unlike the selected review"),
        Line::from("  s             Share the selected review"),
        Line::from("  c             Write a review (asks you to sign in first)"),
        Line::from("  Esc / h       Back to the catalog"),
        Line::from(""),
        Line::styled("Writing a review", heading),
        Line::from("  1 .. 5        Pick a rating (0 clears)"),
        Line::from("  Left / Right  Preview a rating, Space to keep it"),
        Line::from("  Tab           Switch between stars and text"),
        Line::from("  Enter         Post"),
        Line::from("  Esc           Discard the draft"),
        Line::from(""),
        Line::styled("Account", heading),
        Line::from("  a             Sign in, or sign out when signed in"),
        Line::from("  Tab           Next field"),
        Line::from("  Ctrl-s        Switch between sign in and sign up"),
        Line::from("  Ctrl-t        Show / hide password"),
        Line::from("  Esc           Close (cancels a running sign-in)"),
        Line::from(""),
        Line::styled("General", heading),
        Line::from("  t             Toggle light / dark theme"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q             Quit (confirms if a review draft exists)"),
    ])
}
