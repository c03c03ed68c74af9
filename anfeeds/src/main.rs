//! anfeeds: anime catalog browser with reviews, in the terminal.
//!
//! Entry point for the `anfeeds` binary. Wires together configuration and logging
//! (`config`), the terminal lifecycle (`tui`), the unified event bus (`event`), the
//! UI (`ui`, `view`, `theme`), and the session manager, review board, and
//! preference store from `anfeeds-core`.
//!
//! # Startup sequence
//!
//! 1. Load config and install the file logger. Both happen before the terminal
//!    enters raw mode, so config errors are still readable on stderr.
//! 2. Load the catalog and open the preferences database; read the saved theme.
//! 3. `sigterm_flag()` returns an `Arc<AtomicBool>` polled in the event loop.
//! 4. `Screen::enter()` installs the panic hook, enters the alternate screen, and
//!    enables raw mode.
//! 5. Create the event channel and `spawn_event_task()`.
//!
//! `Screen::leave()` runs after the event loop exits, whatever the reason.

mod app;
mod config;
mod event;
mod theme;
mod tui;
mod ui;
mod view;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use anfeeds_core::{MockAuthenticator, ThemePreference, db};
use tracing::{error, info, warn};

use crate::app::AppState;
use crate::event::{AppEvent, EventHandler, spawn_event_task};
use crate::theme::Theme;
use crate::ui::keybindings::{KeyAction, handle_key, handle_mouse};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Step 1: config and logging, before the terminal is touched.
    let config = config::load_config();
    if let Err(e) = config::init_logging(&config) {
        eprintln!("anfeeds: logging disabled: {}", e);
    }
    info!(data_dir = %config.data_dir.display(), "anfeeds starting");

    // Step 2: catalog, preferences database, saved theme.
    let catalog = config::load_catalog(&config);
    std::fs::create_dir_all(&config.data_dir)?;
    let db = db::open_db(&config.db_path().to_string_lossy())
        .await
        .map_err(std::io::Error::other)?;
    let theme_pref = match db::load_theme(&db).await {
        Ok(pref) => pref,
        Err(e) => {
            warn!(error = %e, "could not read theme preference, using dark");
            ThemePreference::default()
        }
    };
    let mut theme = Theme::from_preference(theme_pref);

    let authenticator = Arc::new(MockAuthenticator::new(config.login.latency()));
    let mut state = AppState::new(
        catalog,
        authenticator,
        config.login.policy(),
        theme_pref,
        config.notification_ttl(),
    );

    // Step 3: SIGTERM flag, polled in the heartbeat arm below.
    let term_flag = tui::sigterm_flag()?;

    // Step 4: panic hook, alternate screen, raw mode.
    let mut screen = tui::Screen::enter()?;

    // Step 5: event channel and the background event task.
    let handler = EventHandler::new();
    spawn_event_task(handler.tx.clone());
    state.event_tx = Some(handler.tx.clone());
    let mut rx = handler.rx;

    // Event loop: exits only via `break`, so `Screen::leave()` is always reached.
    let mut outcome = Ok(());
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: a quiet terminal would otherwise block in rx.recv()
            // and never see the SIGTERM flag.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = screen.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            error!(error = %e, "draw failed");
                            outcome = Err(e);
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => match handle_key(key, &mut state) {
                        KeyAction::Quit => break 'event_loop,
                        KeyAction::PersistTheme(pref) => {
                            theme = Theme::from_preference(pref);
                            if let Err(e) = db::save_theme(&db, pref).await {
                                warn!(error = %e, theme = pref.as_str(), "failed to save theme");
                                state.notify("Could not save your theme preference.");
                            }
                        }
                        KeyAction::Continue => {}
                    },
                    Some(AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, &mut state);
                    }
                    Some(AppEvent::Tick) => state.on_tick(Instant::now()),
                    Some(AppEvent::LoginFinished(login)) => state.apply_login_outcome(*login),
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => {}
                    Some(AppEvent::Quit) | None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    state.session.cancel_login();
    screen.leave()?;
    info!("anfeeds stopped");
    outcome
}
