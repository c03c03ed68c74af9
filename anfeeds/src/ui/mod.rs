//! UI rendering module for anfeeds.
//!
//! This is the module root for `ui/`. It exposes `render()` as the single entry
//! point called by the event loop through `Screen::draw()`.
//!
//! All layout arithmetic lives in `layout.rs`. The catalog and genre menu live in
//! `catalog_view.rs`; the detail modal with reviews in `detail_view.rs`. Modals and
//! transient overlays are drawn last, in stacking order.

pub mod catalog_view;
pub mod detail_view;
pub mod help;
pub mod keybindings;
mod layout;
pub mod login;
pub mod toast;

use ratatui::{Frame, style::Style, widgets::Block};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, render_header, render_status_bar};

/// Renders one complete frame.
///
/// Called exactly once per `AppEvent::Render` inside `Screen::draw()`. The
/// catalog caches its viewport height into `state` for half-page movement on the
/// next keypress.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `Screen::draw()`
/// * `state`: mutable reference to app state (viewport heights are cached here)
/// * `theme`: active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        frame.area(),
    );

    let [header, menu, catalog, status_bar] = compute_layout(frame);

    render_header(frame, header, state, theme);
    if menu.width > 0 {
        catalog_view::render_genre_menu(frame, menu, state, theme);
    }
    catalog_view::render_catalog(frame, catalog, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    let underlying = if matches!(state.mode, Mode::HelpOverlay | Mode::ConfirmQuit) {
        state.return_mode
    } else {
        state.mode
    };
    if matches!(underlying, Mode::Detail | Mode::Compose) {
        detail_view::render_detail(frame, state, theme);
    }

    login::render_login(frame, state, theme);
    toast::render_genre_indicator(frame, state, theme);

    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmQuit => toast::render_confirm_quit(frame, theme),
        _ => {}
    }

    toast::render_toast(frame, state, theme);
}
