//! Keybinding dispatcher for anfeeds.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop what to do next. The login modal sits above
//! every screen, so it is checked first; otherwise the dispatcher branches on
//! `state.mode` so that each screen has an isolated handler function.

use anfeeds_core::{GenreFilter, ThemePreference, board::MAX_RATING};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{AppState, CommentAction, ComposeFocus, Mode};
use crate::event::forward_login;

/// Control-flow signal returned from the key dispatcher.
///
/// The event loop checks this after every keypress: `Quit` tears down the terminal
/// and exits; `PersistTheme` writes the new preference before the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly (any confirmation has already happened).
    Quit,
    /// The theme was toggled; store the new preference.
    PersistTheme(ThemePreference),
}

/// Dispatches a key event to the login modal or the handler for the current mode.
///
/// # Arguments
///
/// * `key`: the raw crossterm key event (code + modifiers)
/// * `state`: mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if state.login.is_some() {
        return handle_login(key, state);
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Browse => handle_browse(key, state),
        Mode::Search => handle_search(key, state),
        Mode::Detail => handle_detail(key, state),
        Mode::Compose => handle_compose(key, state),
    }
}

/// Maps `1`..`6` (with or without Alt) to a genre menu entry.
fn genre_shortcut(key: KeyEvent) -> Option<GenreFilter> {
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let digit = c.to_digit(10)? as usize;
    if digit == 0 {
        return None;
    }
    GenreFilter::from_menu_index(digit - 1)
}

fn quit(state: &mut AppState) -> KeyAction {
    if state.request_quit() {
        KeyAction::Quit
    } else {
        KeyAction::Continue
    }
}

/// Signs out when signed in, otherwise opens the login modal.
fn toggle_account(state: &mut AppState) {
    if state.session.session().is_authenticated() {
        state.logout();
    } else {
        state.open_login();
    }
}

// ---------------------------------------------------------------------------
// Browse mode
// ---------------------------------------------------------------------------

/// Handles a key event on the catalog screen.
fn handle_browse(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_catalog_scroll(key, state) {
        return action;
    }
    if let Some(filter) = genre_shortcut(key) {
        state.set_genre(filter);
        return KeyAction::Continue;
    }

    match key.code {
        KeyCode::Enter | KeyCode::Char('l') => {
            state.open_detail();
            KeyAction::Continue
        }
        KeyCode::Char('/') => {
            state.open_search();
            KeyAction::Continue
        }
        KeyCode::Char('t') => KeyAction::PersistTheme(state.toggle_theme()),
        KeyCode::Char('a') => {
            toggle_account(state);
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            state.open_help();
            KeyAction::Continue
        }
        KeyCode::Esc if state.search_active => {
            state.close_search();
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => quit(state),
        _ => KeyAction::Continue,
    }
}

/// Cursor movement over the visible catalog entries: j / k / g / G and Ctrl-d / u.
///
/// Returns `Some(KeyAction)` when the key was consumed, `None` when the key
/// should fall through to the rest of the handler.
fn handle_catalog_scroll(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let half_page = usize::from(state.catalog_viewport_height / 2).max(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.select_next(1),
        KeyCode::Char('k') | KeyCode::Up => state.select_prev(1),
        KeyCode::Char('g') | KeyCode::Home => state.select_first(),
        KeyCode::Char('G') | KeyCode::End => state.select_last(),
        KeyCode::Char('d') if ctrl => state.select_next(half_page),
        KeyCode::Char('u') if ctrl => state.select_prev(half_page),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Search mode
// ---------------------------------------------------------------------------

/// Typing into the search box. `Enter` keeps the results and returns to browsing.
fn handle_search(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => state.close_search(),
        KeyCode::Enter => state.mode = Mode::Browse,
        KeyCode::Backspace => state.pop_search_char(),
        KeyCode::Down => state.select_next(1),
        KeyCode::Up => state.select_prev(1),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.push_search_char(c)
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Detail mode
// ---------------------------------------------------------------------------

/// Handles keys in the detail modal: comment navigation and comment actions.
fn handle_detail(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.select_next_comment(),
        KeyCode::Char('k') | KeyCode::Up => state.select_prev_comment(),
        KeyCode::Char('l') => {
            if let Some(id) = state.selected_comment() {
                state.dispatch_comment_action(CommentAction::Like, id);
            }
        }
        KeyCode::Char('s') => {
            if let Some(id) = state.selected_comment() {
                state.dispatch_comment_action(CommentAction::Share, id);
            }
        }
        KeyCode::Char('c') | KeyCode::Char('i') => state.start_compose(),
        KeyCode::Char('a') => toggle_account(state),
        KeyCode::Char('t') => return KeyAction::PersistTheme(state.toggle_theme()),
        KeyCode::Char('?') => state.open_help(),
        KeyCode::Esc | KeyCode::Char('h') => state.close_detail(),
        KeyCode::Char('q') => return quit(state),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Compose mode
// ---------------------------------------------------------------------------

/// Handles keys while writing a review.
///
/// `Tab` moves between the star input and the text box. On the star input,
/// `0`..`5` select (0 clears), `Left` / `Right` preview, `Space` keeps the
/// previewed value. `Enter` posts from either field; `Esc` discards the draft.
fn handle_compose(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return quit(state);
    }

    match key.code {
        KeyCode::Esc => state.cancel_compose(),
        KeyCode::Enter => state.post_draft(),
        KeyCode::Tab | KeyCode::BackTab => {
            state.board.preview_rating(None);
            state.compose_focus = match state.compose_focus {
                ComposeFocus::Stars => ComposeFocus::Text,
                ComposeFocus::Text => ComposeFocus::Stars,
            };
        }
        _ => match state.compose_focus {
            ComposeFocus::Stars => handle_star_input(key, state),
            ComposeFocus::Text => handle_text_input(key, state),
        },
    }
    KeyAction::Continue
}

fn handle_star_input(key: KeyEvent, state: &mut AppState) {
    let shown = state.board.draft().displayed_rating();
    match key.code {
        KeyCode::Char(c @ '0'..='9') => {
            let rating = c.to_digit(10).map_or(0, |d| d as u8);
            state.board.preview_rating(None);
            if let Err(e) = state.board.set_pending_rating(rating) {
                state.notify(crate::app::message_for(&e));
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.board.preview_rating(Some(shown.saturating_sub(1)));
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.board.preview_rating(Some((shown + 1).min(MAX_RATING)));
        }
        KeyCode::Char(' ') => {
            state.board.preview_rating(None);
            if let Err(e) = state.board.set_pending_rating(shown) {
                state.notify(crate::app::message_for(&e));
            }
        }
        _ => {}
    }
}

fn handle_text_input(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Backspace => state.board.pop_draft_char(),
        KeyCode::Char(c) => state.board.push_draft_char(c),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Login modal
// ---------------------------------------------------------------------------

/// Handles keys while the login modal is open.
///
/// `Ctrl-t` shows or hides the password, `Ctrl-s` switches between sign-in and
/// sign-up. While an attempt is in flight the form is frozen and only `Esc`
/// (which cancels the attempt) is accepted.
fn handle_login(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let mode = state.session.session().form_mode;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if state.session.login_pending() {
        if key.code == KeyCode::Esc {
            state.close_login();
        }
        return KeyAction::Continue;
    }

    match key.code {
        KeyCode::Esc => state.close_login(),
        KeyCode::Char('t') if ctrl => {
            if let Some(form) = state.login.as_mut() {
                form.show_password = !form.show_password;
            }
        }
        KeyCode::Char('s') if ctrl => state.switch_login_mode(),
        KeyCode::Enter => submit_login(state),
        KeyCode::Tab => {
            if let Some(form) = state.login.as_mut() {
                form.field = form.field.next(mode);
            }
        }
        KeyCode::BackTab => {
            if let Some(form) = state.login.as_mut() {
                form.field = form.field.prev(mode);
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = state.login.as_mut() {
                form.focused_mut().pop();
            }
        }
        KeyCode::Char(c) if !ctrl => {
            if let Some(form) = state.login.as_mut() {
                form.focused_mut().push(c);
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Starts an attempt and hands it to the event loop.
fn submit_login(state: &mut AppState) {
    let Some(pending) = state.submit_login() else {
        return;
    };
    match &state.event_tx {
        Some(tx) => forward_login(pending, tx.clone()),
        // Nobody would receive the outcome.
        None => {
            state.session.cancel_login();
        }
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is visible.
///
/// Any of `?`, `Esc`, or `q` dismisses the overlay and returns to the previous
/// screen. `j` / `k` / `g` / `G` scroll.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.close_overlay(),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// ConfirmQuit mode
// ---------------------------------------------------------------------------

/// Handles a key event while the quit-confirmation dialog is active.
///
/// `y` / `Y` confirms the quit and returns `Quit`. `n` / `N` / `Esc` cancels
/// and returns to the draft. All other keys are ignored.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.close_overlay();
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles the scroll wheel: three steps in the help overlay, one row in the
/// catalog or the comment list.
///
/// # Arguments
///
/// * `mouse`: the crossterm mouse event
/// * `state`: mutable reference to all UI state
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    if state.login.is_some() {
        return KeyAction::Continue;
    }
    match (mouse.kind, state.mode) {
        (MouseEventKind::ScrollUp, Mode::HelpOverlay) => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        (MouseEventKind::ScrollDown, Mode::HelpOverlay) => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        (MouseEventKind::ScrollUp, Mode::Detail | Mode::Compose) => state.select_prev_comment(),
        (MouseEventKind::ScrollDown, Mode::Detail | Mode::Compose) => state.select_next_comment(),
        (MouseEventKind::ScrollUp, Mode::Browse | Mode::Search) => state.select_prev(1),
        (MouseEventKind::ScrollDown, Mode::Browse | Mode::Search) => state.select_next(1),
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_state;
    use crate::event::AppEvent;
    use anfeeds_core::{EntryId, FormMode};
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(press(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn alt_digit_selects_genre() {
        let mut state = test_state();
        let key = KeyEvent::new(KeyCode::Char('3'), KeyModifiers::ALT);
        assert_eq!(handle_key(key, &mut state), KeyAction::Continue);
        assert_eq!(state.genre.page_title(), "Horror Anime");

        handle_key(press(KeyCode::Char('1')), &mut state);
        assert_eq!(state.genre, GenreFilter::All);
    }

    #[test]
    fn search_overrides_genre_until_escape() {
        let mut state = test_state();
        handle_key(press(KeyCode::Char('5')), &mut state);
        handle_key(press(KeyCode::Char('/')), &mut state);
        type_str(&mut state, "Horimiya");
        assert_eq!(state.visible_entries(), vec![EntryId(14)]);

        handle_key(press(KeyCode::Esc), &mut state);
        assert_eq!(state.mode, Mode::Browse);
        assert!(state.search_query.is_empty());
        assert_eq!(state.genre.page_title(), "Fantasy Anime");
    }

    #[test]
    fn theme_toggle_asks_for_persistence() {
        let mut state = test_state();
        let action = handle_key(press(KeyCode::Char('t')), &mut state);
        assert_eq!(action, KeyAction::PersistTheme(ThemePreference::Light));
        let action = handle_key(press(KeyCode::Char('t')), &mut state);
        assert_eq!(action, KeyAction::PersistTheme(ThemePreference::Dark));
    }

    #[test]
    fn q_quits_from_browse_and_help_returns() {
        let mut state = test_state();
        handle_key(press(KeyCode::Char('?')), &mut state);
        assert_eq!(state.mode, Mode::HelpOverlay);
        handle_key(press(KeyCode::Char('q')), &mut state);
        assert_eq!(state.mode, Mode::Browse);
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Quit);
    }

    #[test]
    fn compose_without_login_opens_modal() {
        let mut state = test_state();
        handle_key(press(KeyCode::Enter), &mut state);
        assert_eq!(state.mode, Mode::Detail);
        handle_key(press(KeyCode::Char('c')), &mut state);
        assert!(state.login.is_some());

        handle_key(ctrl('s'), &mut state);
        assert_eq!(state.session.session().form_mode, FormMode::SignUp);
        handle_key(press(KeyCode::Esc), &mut state);
        assert!(state.login.is_none());
        assert_eq!(state.session.session().form_mode, FormMode::SignIn);
    }

    #[tokio::test]
    async fn login_and_review_through_keys() {
        let mut state = test_state();
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.event_tx = Some(tx);

        handle_key(press(KeyCode::Enter), &mut state);
        handle_key(press(KeyCode::Char('c')), &mut state);
        type_str(&mut state, "fan@example.com");
        handle_key(press(KeyCode::Tab), &mut state);
        type_str(&mut state, "secret");
        handle_key(ctrl('t'), &mut state);
        assert!(state.login.as_ref().unwrap().show_password);
        handle_key(press(KeyCode::Enter), &mut state);
        assert!(state.session.login_pending());

        match rx.recv().await {
            Some(AppEvent::LoginFinished(outcome)) => state.apply_login_outcome(*outcome),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(state.login.is_none());
        assert!(state.session.sink().signed_in);

        handle_key(press(KeyCode::Char('c')), &mut state);
        assert_eq!(state.mode, Mode::Compose);
        handle_key(press(KeyCode::Right), &mut state);
        handle_key(press(KeyCode::Right), &mut state);
        assert_eq!(state.board.draft().displayed_rating(), 2);
        assert_eq!(state.board.draft().pending_rating(), 0, "preview does not select");
        handle_key(press(KeyCode::Char('4')), &mut state);
        handle_key(press(KeyCode::Tab), &mut state);
        type_str(&mut state, "Loved it");
        handle_key(press(KeyCode::Enter), &mut state);

        assert_eq!(state.mode, Mode::Detail);
        let row = &state.board.sink().rows[0];
        assert_eq!(row.text, "Loved it");
        assert_eq!(row.stars, "★★★★☆");

        handle_key(press(KeyCode::Char('l')), &mut state);
        assert_eq!(state.board.sink().rows[0].likes, 1);
        assert!(state.board.sink().rows[0].liked);

        handle_key(press(KeyCode::Char('s')), &mut state);
        assert_eq!(
            state.toast.as_ref().map(|t| t.message.as_str()),
            Some("Anime review link copied to clipboard!")
        );
    }

    #[tokio::test]
    async fn login_form_is_frozen_while_pending() {
        let mut state = test_state();
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.event_tx = Some(tx);

        handle_key(press(KeyCode::Char('a')), &mut state);
        type_str(&mut state, "fan@example.com");
        handle_key(press(KeyCode::Tab), &mut state);
        type_str(&mut state, "secret");
        handle_key(press(KeyCode::Enter), &mut state);
        assert!(state.session.login_pending());

        handle_key(ctrl('s'), &mut state);
        handle_key(press(KeyCode::Backspace), &mut state);
        type_str(&mut state, "xyz");
        handle_key(press(KeyCode::Tab), &mut state);
        let form = state.login.as_ref().unwrap();
        assert_eq!(form.password, "secret");
        assert_eq!(form.email, "fan@example.com");
        assert_eq!(form.field, crate::app::LoginField::Password);
        assert_eq!(state.session.session().form_mode, FormMode::SignIn);

        match rx.recv().await {
            Some(AppEvent::LoginFinished(outcome)) => state.apply_login_outcome(*outcome),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(
            state.toast.as_ref().map(|t| t.message.as_str()),
            Some("Welcome back, fellow otaku!")
        );
    }

    #[tokio::test]
    async fn space_keeps_previewed_rating() {
        let mut state = test_state();
        state.open_detail();
        crate::app::tests::sign_in(&mut state).await;
        handle_key(press(KeyCode::Char('c')), &mut state);
        for _ in 0..7 {
            handle_key(press(KeyCode::Right), &mut state);
        }
        handle_key(press(KeyCode::Char(' ')), &mut state);
        assert_eq!(state.board.draft().pending_rating(), MAX_RATING);
        assert!(state.toast.as_ref().map_or(true, |t| !t.message.contains("rating")));
    }

    #[tokio::test]
    async fn escape_in_compose_discards_draft() {
        let mut state = test_state();
        state.open_detail();
        crate::app::tests::sign_in(&mut state).await;
        handle_key(press(KeyCode::Char('c')), &mut state);
        handle_key(press(KeyCode::Char('3')), &mut state);
        handle_key(press(KeyCode::Tab), &mut state);
        type_str(&mut state, "draft");

        assert_eq!(handle_key(ctrl('c'), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::ConfirmQuit);
        handle_key(press(KeyCode::Char('n')), &mut state);
        assert_eq!(state.mode, Mode::Compose);

        handle_key(press(KeyCode::Esc), &mut state);
        assert_eq!(state.mode, Mode::Detail);
        assert!(!state.has_unsaved_draft());
    }
}
