//! Login modal renderer.
//!
//! Draws the sign-in / sign-up form over whatever screen is open. The password is
//! masked unless the user toggled it visible; the submit line turns into a loading
//! label while an attempt is in flight.

use anfeeds_core::FormMode;
use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::app::{AppState, LoginField};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the login modal if one is open.
pub fn render_login(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let Some(form) = state.login.as_ref() else {
        return;
    };
    let mode = state.session.session().form_mode;
    let pending = state.session.login_pending();

    let height = if mode == FormMode::SignUp { 11 } else { 10 };
    let area = frame.area().centered(Constraint::Length(56), Constraint::Length(height));
    frame.render_widget(Clear, area);

    let (title, button, busy, switch_hint) = match mode {
        FormMode::SignIn => (" Sign In ", "Sign In", "Signing in…", "Ctrl-s: create an account"),
        FormMode::SignUp => (" Sign Up ", "Sign Up", "Creating account…", "Ctrl-s: have an account? Sign in"),
    };

    let field_line = |field: LoginField, label: &'static str, value: String| {
        let focused = form.field == field;
        let marker = if focused { "▶ " } else { "  " };
        let cursor = if focused && !pending { "▏" } else { "" };
        let label_style = if focused {
            Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        Line::from(vec![
            Span::styled(format!("{marker}{label:<10}"), label_style),
            Span::styled(format!("{value}{cursor}"), Style::default().fg(theme.text)),
        ])
    };

    let password = if form.show_password {
        form.password.clone()
    } else {
        "•".repeat(form.password.chars().count())
    };

    let mut lines = vec![
        Line::from(""),
        field_line(LoginField::Email, "Email", form.email.clone()),
        field_line(LoginField::Password, "Password", password),
    ];
    if mode == FormMode::SignUp {
        lines.push(field_line(LoginField::FullName, "Full name", form.full_name.clone()));
    }
    lines.push(Line::from(""));
    lines.push(if pending {
        Line::styled(format!("  [ {busy} ]"), Style::default().fg(theme.muted))
    } else {
        Line::styled(
            format!("  [ Enter: {button} ]"),
            Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
        )
    });
    lines.push(Line::from(""));
    lines.push(Line::styled(
        format!("  {switch_hint}   Ctrl-t: show password"),
        Style::default().fg(theme.muted),
    ));

    frame.render_widget(Paragraph::new(lines).block(panel_block(title, true, theme)), area);
}
