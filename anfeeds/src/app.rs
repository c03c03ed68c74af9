//! Central application state for anfeeds.
//!
//! This module owns all mutable UI state: the current mode, catalog selection,
//! genre filter and search query, the login form, notifications, and the two core
//! components (session manager and review board) together with their view-model
//! sinks. No ratatui rendering happens here: `app.rs` is pure state that is read
//! by the render module and mutated by the keybinding dispatcher.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anfeeds_core::{
    Authenticator, Catalog, CommentId, EntryId, Error, FormMode, GenreFilter, LoginOutcome,
    LoginPolicy, PendingLogin, ReviewBoard, SessionManager, ThemePreference, ValidationError,
};
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::event::AppEvent;
use crate::view::{CommentFeed, ProfileBadge};

/// How long the "Showing: <genre>" indicator stays visible.
const INDICATOR_TTL: Duration = Duration::from_secs(2);

/// Screen the keybinding dispatcher is serving.
///
/// The login form is a separate modal layer (`AppState::login`) that can sit on
/// top of any of these.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Catalog grid with the genre menu (default).
    #[default]
    Browse,
    /// Typing into the search box.
    Search,
    /// Detail modal for one entry, with its reviews.
    Detail,
    /// Writing a review inside the detail modal.
    Compose,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
    /// Quit-confirmation dialog shown when a review draft would be lost.
    ConfirmQuit,
}

/// Input field focused in the login form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
    FullName,
}

impl LoginField {
    /// Next field in tab order. The full-name field only exists when signing up.
    pub fn next(self, mode: FormMode) -> Self {
        match (self, mode) {
            (LoginField::Email, _) => LoginField::Password,
            (LoginField::Password, FormMode::SignUp) => LoginField::FullName,
            (LoginField::Password, FormMode::SignIn) => LoginField::Email,
            (LoginField::FullName, _) => LoginField::Email,
        }
    }

    pub fn prev(self, mode: FormMode) -> Self {
        match (self, mode) {
            (LoginField::Email, FormMode::SignUp) => LoginField::FullName,
            (LoginField::Email, FormMode::SignIn) => LoginField::Password,
            (LoginField::Password, _) => LoginField::Email,
            (LoginField::FullName, _) => LoginField::Password,
        }
    }
}

/// Contents of the login modal.
#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub field: LoginField,
    /// Password shown in clear text instead of masked.
    pub show_password: bool,
}

impl LoginForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
            LoginField::FullName => &mut self.full_name,
        }
    }
}

/// Which half of the review form receives keys in `Mode::Compose`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ComposeFocus {
    #[default]
    Stars,
    Text,
}

/// A transient message with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

/// Actions available on a single comment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Like,
    Share,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    /// Current screen governing which keybindings are active.
    pub mode: Mode,

    /// Read-only catalog data.
    pub catalog: Catalog,
    /// Genre chosen in the menu; restored when the search closes.
    pub genre: GenreFilter,
    /// True while the search box is open (typing or showing results).
    pub search_active: bool,
    /// Current search text. Blank means "filter by genre only".
    pub search_query: String,
    /// Index into `visible_entries()` of the highlighted entry.
    pub catalog_cursor: usize,
    /// List widget state backing the catalog panel; selection is set at render time.
    pub catalog_list_state: ListState,
    /// Inner height of the catalog panel after borders, cached after each render.
    pub catalog_viewport_height: u16,

    /// Index into the comment feed of the highlighted review.
    pub comment_cursor: usize,
    /// Which part of the review form is focused while composing.
    pub compose_focus: ComposeFocus,

    /// Open login modal, if any.
    pub login: Option<LoginForm>,

    /// Authentication state, rendered into the header badge.
    pub session: SessionManager<ProfileBadge>,
    /// Review lists per entry, rendered into the detail feed.
    pub board: ReviewBoard<CommentFeed>,

    /// Current light/dark choice.
    pub theme_pref: ThemePreference,

    /// Notification in the top-right corner.
    pub toast: Option<Toast>,
    /// Genre indicator in the bottom-left corner.
    pub genre_indicator: Option<Toast>,
    /// Lifetime of a notification.
    pub notification_ttl: Duration,

    /// Vertical scroll offset of the help overlay.
    pub help_scroll: u16,
    /// Mode restored when the help overlay or the quit dialog closes.
    pub return_mode: Mode,

    /// Channel back into the event loop for background work (login attempts).
    pub event_tx: Option<UnboundedSender<AppEvent>>,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        authenticator: Arc<dyn Authenticator>,
        policy: LoginPolicy,
        theme_pref: ThemePreference,
        notification_ttl: Duration,
    ) -> Self {
        Self {
            mode: Mode::default(),
            catalog,
            genre: GenreFilter::All,
            search_active: false,
            search_query: String::new(),
            catalog_cursor: 0,
            catalog_list_state: ListState::default(),
            catalog_viewport_height: 0,
            comment_cursor: 0,
            compose_focus: ComposeFocus::default(),
            login: None,
            session: SessionManager::new(authenticator, policy, ProfileBadge::default()),
            board: ReviewBoard::new(CommentFeed::default()),
            theme_pref,
            toast: None,
            genre_indicator: None,
            notification_ttl,
            help_scroll: 0,
            return_mode: Mode::Browse,
            event_tx: None,
        }
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// Ids of every entry currently shown, in display order.
    pub fn visible_entries(&self) -> Vec<EntryId> {
        self.catalog
            .sections(self.genre, &self.search_query)
            .iter()
            .flat_map(|s| s.entries.iter().map(|e| e.id))
            .collect()
    }

    pub fn selected_entry(&self) -> Option<EntryId> {
        self.visible_entries().get(self.catalog_cursor).copied()
    }

    /// Moves the catalog highlight down by `n`, stopping at the last entry.
    pub fn select_next(&mut self, n: usize) {
        let last = self.visible_entries().len().saturating_sub(1);
        self.catalog_cursor = self.catalog_cursor.saturating_add(n).min(last);
    }

    pub fn select_prev(&mut self, n: usize) {
        self.catalog_cursor = self.catalog_cursor.saturating_sub(n);
    }

    pub fn select_first(&mut self) {
        self.catalog_cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.catalog_cursor = self.visible_entries().len().saturating_sub(1);
    }

    /// Switches the genre filter and flashes the genre indicator.
    pub fn set_genre(&mut self, filter: GenreFilter) {
        self.genre = filter;
        self.catalog_cursor = 0;
        self.genre_indicator = Some(Toast {
            message: filter.indicator(),
            expires_at: Instant::now() + INDICATOR_TTL,
        });
        info!(page = %filter.page_title(), "genre changed");
    }

    pub fn open_search(&mut self) {
        self.search_active = true;
        self.mode = Mode::Search;
    }

    /// Closes the search box, clears the query, and goes back to the genre view.
    pub fn close_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.catalog_cursor = 0;
        self.mode = Mode::Browse;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
        self.catalog_cursor = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
        self.catalog_cursor = 0;
    }

    // -----------------------------------------------------------------------
    // Detail view and reviews
    // -----------------------------------------------------------------------

    /// Opens the detail modal for the highlighted entry and loads its reviews.
    pub fn open_detail(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        self.board.open_entry(entry);
        self.comment_cursor = 0;
        self.mode = Mode::Detail;
    }

    pub fn close_detail(&mut self) {
        self.board.close_entry();
        self.mode = Mode::Browse;
    }

    /// Starts a review, or asks the user to sign in first.
    pub fn start_compose(&mut self) {
        if !self.session.session().is_authenticated() {
            self.open_login();
            return;
        }
        self.compose_focus = ComposeFocus::Stars;
        self.mode = Mode::Compose;
    }

    /// Posts the current draft.
    pub fn post_draft(&mut self) {
        let text = self.board.draft().text.clone();
        let rating = self.board.draft().pending_rating();
        match self.board.post_comment(self.session.session(), &text, rating) {
            Ok(_) => {
                self.comment_cursor = 0;
                self.mode = Mode::Detail;
                self.notify("Your anime review has been posted!");
            }
            Err(Error::AuthRequired) => self.open_login(),
            Err(e) => self.notify(message_for(&e)),
        }
    }

    /// Throws the draft away and returns to the review list.
    pub fn cancel_compose(&mut self) {
        self.board.cancel_draft();
        self.mode = Mode::Detail;
    }

    pub fn selected_comment(&self) -> Option<CommentId> {
        self.board.sink().rows.get(self.comment_cursor).map(|r| r.id)
    }

    pub fn select_next_comment(&mut self) {
        let last = self.board.sink().rows.len().saturating_sub(1);
        self.comment_cursor = (self.comment_cursor + 1).min(last);
    }

    pub fn select_prev_comment(&mut self) {
        self.comment_cursor = self.comment_cursor.saturating_sub(1);
    }

    /// Runs a comment-row action against comment `id`.
    pub fn dispatch_comment_action(&mut self, action: CommentAction, id: CommentId) {
        match action {
            CommentAction::Like => match self.board.toggle_like(self.session.session(), id) {
                Ok(_) => {}
                Err(Error::AuthRequired) => self.open_login(),
                Err(e) => self.notify(message_for(&e)),
            },
            CommentAction::Share => {
                debug!(%id, "review shared");
                self.notify("Anime review link copied to clipboard!");
            }
        }
    }

    /// True when leaving now would lose a half-written review.
    pub fn has_unsaved_draft(&self) -> bool {
        !self.board.draft().is_empty()
    }

    // -----------------------------------------------------------------------
    // Login
    // -----------------------------------------------------------------------

    pub fn open_login(&mut self) {
        if self.login.is_none() {
            self.login = Some(LoginForm::default());
        }
    }

    /// Closes the login modal, abandoning any attempt in flight.
    pub fn close_login(&mut self) {
        self.session.cancel_login();
        self.session.reset_form_mode();
        self.login = None;
    }

    /// Switches between sign-in and sign-up, keeping focus on a field that exists.
    /// Ignored while an attempt is in flight.
    pub fn switch_login_mode(&mut self) {
        if self.session.login_pending() {
            return;
        }
        let mode = self.session.switch_form_mode().form_mode;
        if let Some(form) = self.login.as_mut() {
            if mode == FormMode::SignIn && form.field == LoginField::FullName {
                form.field = LoginField::Email;
            }
        }
    }

    /// Submits the login form. Returns the pending attempt for the caller to
    /// forward, or `None` when nothing was started.
    pub fn submit_login(&mut self) -> Option<PendingLogin> {
        if self.session.login_pending() {
            return None;
        }
        let form = self.login.as_ref()?;
        let submitted = self
            .session
            .submit_login(&form.email, &form.password, &form.full_name);
        match submitted {
            Ok(pending) => Some(pending),
            Err(e) => {
                self.notify(message_for(&e));
                None
            }
        }
    }

    /// Applies a finished login attempt posted back through the event loop.
    pub fn apply_login_outcome(&mut self, outcome: LoginOutcome) {
        let mode = outcome.mode;
        match self.session.complete_login(outcome) {
            Ok(_) => {
                self.login = None;
                self.session.reset_form_mode();
                self.notify(match mode {
                    FormMode::SignIn => "Welcome back, fellow otaku!",
                    FormMode::SignUp => "Welcome to the anime community!",
                });
            }
            Err(Error::Cancelled) => {}
            Err(e) => self.notify(message_for(&e)),
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.board.cancel_draft();
        if self.mode == Mode::Compose {
            self.mode = Mode::Detail;
        }
        self.notify("Sayonara! Come back soon!");
    }

    // -----------------------------------------------------------------------
    // Overlays
    // -----------------------------------------------------------------------

    pub fn open_help(&mut self) {
        self.return_mode = self.mode;
        self.help_scroll = 0;
        self.mode = Mode::HelpOverlay;
    }

    /// Leaves the help overlay or the quit dialog.
    pub fn close_overlay(&mut self) {
        self.mode = self.return_mode;
    }

    /// Returns `true` when the app may exit right away. With a review draft in
    /// progress the quit dialog opens instead.
    pub fn request_quit(&mut self) -> bool {
        if !self.has_unsaved_draft() {
            return true;
        }
        self.return_mode = self.mode;
        self.mode = Mode::ConfirmQuit;
        false
    }

    // -----------------------------------------------------------------------
    // Theme and notifications
    // -----------------------------------------------------------------------

    /// Flips light/dark and returns the new preference for the caller to persist.
    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.theme_pref = self.theme_pref.toggled();
        self.theme_pref
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + self.notification_ttl,
        });
    }

    /// Drops notifications whose time is up.
    pub fn on_tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.expires_at <= now) {
            self.toast = None;
        }
        if self.genre_indicator.as_ref().is_some_and(|t| t.expires_at <= now) {
            self.genre_indicator = None;
        }
    }
}

/// User-facing text for a failed action.
pub fn message_for(error: &Error) -> String {
    match error {
        Error::Validation(ValidationError::EmptyText | ValidationError::RatingOutOfRange(_)) => {
            "Please provide both a rating and review!".to_owned()
        }
        Error::Validation(ValidationError::MissingEmail | ValidationError::MissingPassword) => {
            "Please enter your email and password.".to_owned()
        }
        Error::AuthRequired => "Please sign in first.".to_owned(),
        Error::InvalidCredentials => "Invalid email or password.".to_owned(),
        Error::Network(_) => "Network error. Please try again.".to_owned(),
        Error::Timeout(_) => "Login timed out. Please try again.".to_owned(),
        other => other.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anfeeds_core::MockAuthenticator;

    pub(crate) fn test_state() -> AppState {
        AppState::new(
            Catalog::default(),
            Arc::new(MockAuthenticator::new(Duration::ZERO)),
            LoginPolicy::default(),
            ThemePreference::Dark,
            Duration::from_secs(3),
        )
    }

    pub(crate) async fn sign_in(state: &mut AppState) {
        state.open_login();
        let form = state.login.as_mut().unwrap();
        form.email = "a@b.com".to_owned();
        form.password = "pw".to_owned();
        let pending = state.submit_login().unwrap();
        state.apply_login_outcome(pending.finish().await);
    }

    #[test]
    fn genre_change_resets_cursor_and_shows_indicator() {
        let mut state = test_state();
        state.select_next(4);
        state.set_genre(GenreFilter::from_menu_index(3).unwrap());
        assert_eq!(state.catalog_cursor, 0);
        assert_eq!(state.visible_entries().len(), 3);
        assert_eq!(
            state.genre_indicator.as_ref().map(|t| t.message.as_str()),
            Some("Showing: Comedy")
        );
    }

    #[test]
    fn closing_search_restores_genre_view() {
        let mut state = test_state();
        state.set_genre(GenreFilter::from_menu_index(1).unwrap());
        state.open_search();
        for c in "piano".chars() {
            state.push_search_char(c);
        }
        assert_eq!(state.visible_entries(), vec![EntryId(13)], "search spans genres");

        state.close_search();
        assert_eq!(state.mode, Mode::Browse);
        assert_eq!(state.visible_entries(), vec![EntryId(1), EntryId(2), EntryId(3)]);
    }

    #[test]
    fn compose_while_logged_out_opens_login() {
        let mut state = test_state();
        state.open_detail();
        state.start_compose();
        assert_eq!(state.mode, Mode::Detail);
        assert!(state.login.is_some());
    }

    #[tokio::test]
    async fn login_then_post_review() {
        let mut state = test_state();
        state.open_detail();
        sign_in(&mut state).await;
        assert!(state.login.is_none(), "modal closes on success");
        assert!(state.session.sink().signed_in);
        assert_eq!(
            state.toast.as_ref().map(|t| t.message.as_str()),
            Some("Welcome back, fellow otaku!")
        );

        state.start_compose();
        assert_eq!(state.mode, Mode::Compose);
        state.board.set_pending_rating(5).unwrap();
        state.board.set_draft_text("Great show!");
        state.post_draft();

        assert_eq!(state.mode, Mode::Detail);
        let rows = &state.board.sink().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Great show!");
        assert_eq!(rows[0].stars, "★★★★★");
        assert!(!state.has_unsaved_draft());
    }

    #[tokio::test]
    async fn incomplete_review_shows_hint_and_keeps_draft() {
        let mut state = test_state();
        state.open_detail();
        sign_in(&mut state).await;
        state.start_compose();
        state.board.set_draft_text("no stars yet");
        state.post_draft();

        assert_eq!(state.mode, Mode::Compose);
        assert_eq!(
            state.toast.as_ref().map(|t| t.message.as_str()),
            Some("Please provide both a rating and review!")
        );
        assert!(state.has_unsaved_draft());
    }

    #[tokio::test]
    async fn like_while_logged_out_prompts_login() {
        let mut state = test_state();
        state.open_detail();
        sign_in(&mut state).await;
        state.start_compose();
        state.board.set_pending_rating(4).unwrap();
        state.board.set_draft_text("nice");
        state.post_draft();
        let id = state.selected_comment().unwrap();

        state.logout();
        state.dispatch_comment_action(CommentAction::Like, id);
        assert!(state.login.is_some());
        assert_eq!(state.board.sink().rows[0].likes, 0);
    }

    #[tokio::test]
    async fn closing_login_cancels_attempt() {
        let mut state = AppState::new(
            Catalog::default(),
            Arc::new(MockAuthenticator::new(Duration::from_secs(60))),
            LoginPolicy::default(),
            ThemePreference::Dark,
            Duration::from_secs(3),
        );
        state.open_login();
        state.switch_login_mode();
        let form = state.login.as_mut().unwrap();
        form.email = "a@b.com".to_owned();
        form.password = "pw".to_owned();
        let pending = state.submit_login().unwrap();
        assert!(state.submit_login().is_none(), "button disabled while pending");

        state.close_login();
        state.apply_login_outcome(pending.finish().await);
        assert!(!state.session.session().is_authenticated());
        assert_eq!(state.session.session().form_mode, FormMode::SignIn);
        assert!(state.toast.is_none());
    }

    #[tokio::test]
    async fn quit_with_draft_asks_first() {
        let mut state = test_state();
        assert!(state.request_quit());

        state.open_detail();
        sign_in(&mut state).await;
        state.start_compose();
        state.board.push_draft_char('x');
        assert!(!state.request_quit());
        assert_eq!(state.mode, Mode::ConfirmQuit);
        state.close_overlay();
        assert_eq!(state.mode, Mode::Compose);
    }

    #[test]
    fn toasts_expire_on_tick() {
        let mut state = test_state();
        state.notify("hello");
        state.set_genre(GenreFilter::All);
        let now = Instant::now();
        state.on_tick(now);
        assert!(state.toast.is_some());
        state.on_tick(now + Duration::from_secs(5));
        assert!(state.toast.is_none());
        assert!(state.genre_indicator.is_none());
    }

    #[test]
    fn login_field_cycle_skips_full_name_when_signing_in() {
        assert_eq!(LoginField::Password.next(FormMode::SignIn), LoginField::Email);
        assert_eq!(LoginField::Password.next(FormMode::SignUp), LoginField::FullName);
        assert_eq!(LoginField::Email.prev(FormMode::SignUp), LoginField::FullName);
        assert_eq!(LoginField::Email.prev(FormMode::SignIn), LoginField::Password);
    }
}
