//! Transient overlays: the notification toast (top right), the genre indicator
//! (bottom left, above the status bar), and the quit-confirmation dialog.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Clear, Paragraph},
};

use crate::app::AppState;
use crate::theme::Theme;

/// Renders the notification toast if one is live.
pub fn render_toast(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let Some(toast) = state.toast.as_ref() else {
        return;
    };
    let screen = frame.area();
    let width = (toast.message.chars().count() as u16 + 4).min(screen.width);
    if width == 0 || screen.height < 4 {
        return;
    }
    let area = Rect {
        x: screen.x + screen.width - width,
        y: screen.y + 1,
        width,
        height: 3,
    };
    let style = Style::default().bg(theme.toast_bg).fg(theme.toast_fg);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Line::styled(toast.message.as_str(), Style::default().add_modifier(Modifier::BOLD)))
            .centered()
            .block(Block::bordered().style(style))
            .style(style),
        area,
    );
}

/// Renders the "Showing: <genre>" indicator if one is live.
pub fn render_genre_indicator(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let Some(indicator) = state.genre_indicator.as_ref() else {
        return;
    };
    let screen = frame.area();
    let width = (indicator.message.chars().count() as u16 + 2).min(screen.width);
    if screen.height < 3 {
        return;
    }
    let area = Rect {
        x: screen.x,
        y: screen.y + screen.height - 2,
        width,
        height: 1,
    };
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(format!(" {} ", indicator.message))
            .style(Style::default().bg(theme.heading).fg(theme.toast_fg)),
        area,
    );
}

/// Renders the quit-confirmation dialog shown while a review draft is open.
pub fn render_confirm_quit(frame: &mut Frame, theme: &Theme) {
    let area = frame.area().centered(Constraint::Length(44), Constraint::Length(5));
    frame.render_widget(Clear, area);
    let text = vec![
        Line::from("Your review has not been posted."),
        Line::from("Quit anyway?  y / n"),
    ];
    frame.render_widget(
        Paragraph::new(text).centered().block(
            Block::bordered()
                .title(" Quit ")
                .border_style(Style::default().fg(theme.border_active)),
        ),
        area,
    );
}
