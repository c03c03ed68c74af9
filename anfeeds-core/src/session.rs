//! Session manager: authentication state and the login-form mode.
//!
//! Logging in is asynchronous. [`SessionManager::submit_login`] spawns the
//! attempt on the tokio runtime and returns a [`PendingLogin`]; the host awaits
//! it wherever suits its event loop and hands the [`LoginOutcome`] back to
//! [`SessionManager::complete_login`]. Only one attempt may be in flight, and
//! each carries a UUID so that an outcome arriving after a cancel is dropped
//! instead of mutating the session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result, ValidationError};
use crate::render::SessionSink;
use crate::types::{FormMode, Profile, Session, DEFAULT_AVATAR_URL};

/// Display name given to every mock sign-in.
pub const SIGN_IN_DISPLAY_NAME: &str = "Otaku Master";
/// Display name for a sign-up that left the full-name field blank.
pub const SIGN_UP_FALLBACK_NAME: &str = "Anime Fan";

/// Fields submitted from the login form, already trimmed.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub mode: FormMode,
}

/// Backend that turns a login request into a profile.
///
/// Implementations report transport problems as [`Error::Network`] (retried by
/// the session manager) and bad credentials as [`Error::InvalidCredentials`]
/// (never retried).
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, request: &LoginRequest) -> Result<Profile>;
}

/// Accepts any credentials after a fixed delay.
#[derive(Debug, Clone)]
pub struct MockAuthenticator {
    latency: Duration,
}

impl MockAuthenticator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockAuthenticator {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn authenticate(&self, request: &LoginRequest) -> Result<Profile> {
        tokio::time::sleep(self.latency).await;
        let display_name = match request.mode {
            FormMode::SignIn => SIGN_IN_DISPLAY_NAME.to_owned(),
            FormMode::SignUp if request.full_name.is_empty() => SIGN_UP_FALLBACK_NAME.to_owned(),
            FormMode::SignUp => request.full_name.clone(),
        };
        Ok(Profile {
            display_name,
            email: request.email.clone(),
            avatar_url: DEFAULT_AVATAR_URL.to_owned(),
        })
    }
}

/// Timeout and retry settings for one login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginPolicy {
    /// Upper bound on a single authenticator call.
    pub timeout: Duration,
    /// How many times a network failure is retried before it is surfaced.
    pub retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub backoff: Duration,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Handle to a login attempt running on the tokio runtime.
#[derive(Debug)]
pub struct PendingLogin {
    attempt: Uuid,
    mode: FormMode,
    handle: JoinHandle<Result<Profile>>,
}

impl PendingLogin {
    pub fn attempt(&self) -> Uuid {
        self.attempt
    }

    /// Waits for the attempt to finish. An aborted attempt yields [`Error::Cancelled`].
    pub async fn finish(self) -> LoginOutcome {
        let result = match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::Cancelled),
            Err(e) => Err(Error::Network(format!("login task failed: {e}"))),
        };
        LoginOutcome {
            attempt: self.attempt,
            mode: self.mode,
            result,
        }
    }
}

/// Result of a finished login attempt, to be applied with
/// [`SessionManager::complete_login`].
#[derive(Debug)]
pub struct LoginOutcome {
    pub attempt: Uuid,
    /// Form mode at submission time (sign-in and sign-up greet differently).
    pub mode: FormMode,
    pub result: Result<Profile>,
}

struct InFlight {
    attempt: Uuid,
    abort: AbortHandle,
}

/// Owns the [`Session`] and renders it to `S` after every transition.
pub struct SessionManager<S> {
    session: Session,
    authenticator: Arc<dyn Authenticator>,
    policy: LoginPolicy,
    in_flight: Option<InFlight>,
    sink: S,
}

impl<S: SessionSink> SessionManager<S> {
    /// Creates a logged-out manager in sign-in mode and renders it once.
    pub fn new(authenticator: Arc<dyn Authenticator>, policy: LoginPolicy, sink: S) -> Self {
        let mut manager = Self {
            session: Session::default(),
            authenticator,
            policy,
            in_flight: None,
            sink,
        };
        manager.render();
        manager
    }

    /// Snapshot of the current session.
    pub fn current_session(&self) -> Session {
        self.session.clone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// True while a submitted attempt has not been completed or cancelled.
    pub fn login_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validates the form and starts an attempt in the current form mode.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when email or password is blank,
    /// [`Error::LoginInFlight`] when an earlier attempt is still running.
    pub fn submit_login(
        &mut self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<PendingLogin> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingEmail.into());
        }
        if password.trim().is_empty() {
            return Err(ValidationError::MissingPassword.into());
        }
        if self.in_flight.is_some() {
            return Err(Error::LoginInFlight);
        }

        let mode = self.session.form_mode;
        let request = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            full_name: full_name.trim().to_owned(),
            mode,
        };
        let attempt = Uuid::new_v4();
        let handle = tokio::spawn(run_attempt(
            Arc::clone(&self.authenticator),
            request,
            self.policy,
        ));
        self.in_flight = Some(InFlight {
            attempt,
            abort: handle.abort_handle(),
        });
        info!(%attempt, ?mode, "login submitted");
        self.render();

        Ok(PendingLogin {
            attempt,
            mode,
            handle,
        })
    }

    /// Applies a finished attempt.
    ///
    /// Outcomes for anything other than the attempt in flight are dropped with
    /// [`Error::Cancelled`] and leave the session untouched.
    pub fn complete_login(&mut self, outcome: LoginOutcome) -> Result<Session> {
        match &self.in_flight {
            Some(current) if current.attempt == outcome.attempt => {}
            _ => {
                debug!(attempt = %outcome.attempt, "dropping stale login outcome");
                return Err(Error::Cancelled);
            }
        }
        self.in_flight = None;

        let result = match outcome.result {
            Ok(profile) => {
                info!(attempt = %outcome.attempt, user = %profile.display_name, "logged in");
                self.session = Session::authenticated_as(profile, self.session.form_mode);
                Ok(self.session.clone())
            }
            Err(e) => {
                warn!(attempt = %outcome.attempt, error = %e, "login failed");
                Err(e)
            }
        };
        self.render();
        result
    }

    /// Submits, waits, and completes in one call.
    pub async fn login(&mut self, email: &str, password: &str, full_name: &str) -> Result<Session> {
        let pending = self.submit_login(email, password, full_name)?;
        let outcome = pending.finish().await;
        self.complete_login(outcome)
    }

    /// Aborts the attempt in flight, if any. Returns whether one was cancelled.
    pub fn cancel_login(&mut self) -> bool {
        let Some(current) = self.in_flight.take() else {
            return false;
        };
        current.abort.abort();
        info!(attempt = %current.attempt, "login cancelled");
        self.render();
        true
    }

    /// Back to the initial logged-out, sign-in state.
    pub fn logout(&mut self) -> Session {
        if let Some(current) = self.in_flight.take() {
            current.abort.abort();
        }
        self.session = Session::default();
        info!("logged out");
        self.render();
        self.session.clone()
    }

    pub fn switch_form_mode(&mut self) -> Session {
        self.session.form_mode = self.session.form_mode.toggled();
        self.render();
        self.session.clone()
    }

    /// Puts the form back into sign-in mode (used when the login form closes).
    pub fn reset_form_mode(&mut self) {
        if self.session.form_mode != FormMode::SignIn {
            self.session.form_mode = FormMode::SignIn;
            self.render();
        }
    }

    fn render(&mut self) {
        self.sink.render_session(&self.session);
    }
}

/// Runs one login attempt: every call is bounded by the policy timeout, and
/// network failures are retried with doubling backoff.
async fn run_attempt(
    authenticator: Arc<dyn Authenticator>,
    request: LoginRequest,
    policy: LoginPolicy,
) -> Result<Profile> {
    let mut backoff = policy.backoff;
    let mut retries_left = policy.retries;
    loop {
        match tokio::time::timeout(policy.timeout, authenticator.authenticate(&request)).await {
            Err(_elapsed) => return Err(Error::Timeout(policy.timeout)),
            Ok(Err(Error::Network(reason))) if retries_left > 0 => {
                warn!(%reason, retries_left, ?backoff, "login network error, retrying");
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
                retries_left -= 1;
            }
            Ok(result) => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Recorder {
        renders: Vec<Session>,
    }

    impl SessionSink for Recorder {
        fn render_session(&mut self, session: &Session) {
            self.renders.push(session.clone());
        }
    }

    fn instant_manager() -> SessionManager<Recorder> {
        SessionManager::new(
            Arc::new(MockAuthenticator::new(Duration::ZERO)),
            LoginPolicy::default(),
            Recorder::default(),
        )
    }

    /// Fails with a network error a fixed number of times, then succeeds.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Authenticator for Flaky {
        async fn authenticate(&self, request: &LoginRequest) -> Result<Profile> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(Error::Network("connection reset".to_owned()));
            }
            MockAuthenticator::new(Duration::ZERO).authenticate(request).await
        }
    }

    struct Rejecting;

    #[async_trait]
    impl Authenticator for Rejecting {
        async fn authenticate(&self, _request: &LoginRequest) -> Result<Profile> {
            Err(Error::InvalidCredentials)
        }
    }

    fn quick_retry_policy(retries: u32) -> LoginPolicy {
        LoginPolicy {
            timeout: Duration::from_secs(5),
            retries,
            backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn starts_logged_out_in_sign_in_mode() {
        let manager = instant_manager();
        let session = manager.current_session();
        assert!(!session.is_authenticated());
        assert!(session.profile().is_none());
        assert_eq!(session.form_mode, FormMode::SignIn);
        assert_eq!(manager.sink().renders.len(), 1, "initial render");
    }

    #[test]
    fn switch_form_mode_twice_restores_mode() {
        let mut manager = instant_manager();
        assert_eq!(manager.switch_form_mode().form_mode, FormMode::SignUp);
        assert_eq!(manager.switch_form_mode().form_mode, FormMode::SignIn);
        assert!(!manager.session().is_authenticated());
    }

    #[tokio::test]
    async fn sign_in_uses_default_display_name() {
        let mut manager = instant_manager();
        let session = manager.login("a@b.com", "pw", "").await.unwrap();
        assert!(session.is_authenticated());
        let profile = session.profile().unwrap();
        assert_eq!(profile.display_name, SIGN_IN_DISPLAY_NAME);
        assert_eq!(profile.email, "a@b.com");
        assert_eq!(profile.avatar_url, DEFAULT_AVATAR_URL);
        assert!(!manager.login_pending());
    }

    #[tokio::test]
    async fn sign_up_uses_full_name_or_fallback() {
        let mut manager = instant_manager();
        manager.switch_form_mode();
        let session = manager.login("kai@example.com", "pw", "  Kai  ").await.unwrap();
        assert_eq!(session.profile().unwrap().display_name, "Kai");

        manager.logout();
        manager.switch_form_mode();
        let session = manager.login("kai@example.com", "pw", "").await.unwrap();
        assert_eq!(session.profile().unwrap().display_name, SIGN_UP_FALLBACK_NAME);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_without_starting_an_attempt() {
        let mut manager = instant_manager();
        let err = manager.submit_login("   ", "pw", "").unwrap_err();
        assert_eq!(err, Error::Validation(ValidationError::MissingEmail));
        let err = manager.submit_login("a@b.com", "", "").unwrap_err();
        assert_eq!(err, Error::Validation(ValidationError::MissingPassword));
        assert!(!manager.login_pending());
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_rejected() {
        let mut manager = SessionManager::new(
            Arc::new(MockAuthenticator::new(Duration::from_secs(60))),
            LoginPolicy::default(),
            Recorder::default(),
        );
        let _pending = manager.submit_login("a@b.com", "pw", "").unwrap();
        assert!(manager.login_pending());
        assert_eq!(
            manager.submit_login("a@b.com", "pw", "").unwrap_err(),
            Error::LoginInFlight
        );
        assert!(manager.cancel_login());
    }

    #[tokio::test]
    async fn cancelled_attempt_never_mutates_session() {
        let mut manager = SessionManager::new(
            Arc::new(MockAuthenticator::new(Duration::from_secs(60))),
            LoginPolicy::default(),
            Recorder::default(),
        );
        let pending = manager.submit_login("a@b.com", "pw", "").unwrap();
        assert!(manager.cancel_login());

        let outcome = pending.finish().await;
        assert_eq!(outcome.result, Err(Error::Cancelled));
        assert_eq!(manager.complete_login(outcome).unwrap_err(), Error::Cancelled);
        assert!(!manager.session().is_authenticated());
        assert!(!manager.login_pending());
    }

    #[tokio::test]
    async fn stale_outcome_is_dropped() {
        let mut manager = instant_manager();
        let first = manager.submit_login("a@b.com", "pw", "").unwrap();
        manager.cancel_login();
        let second = manager.submit_login("c@d.com", "pw", "").unwrap();

        // The first attempt was aborted; fabricate a late success for it anyway.
        let stale = LoginOutcome {
            attempt: first.attempt(),
            mode: FormMode::SignIn,
            result: Ok(Profile {
                display_name: "ghost".to_owned(),
                email: "a@b.com".to_owned(),
                avatar_url: DEFAULT_AVATAR_URL.to_owned(),
            }),
        };
        assert_eq!(manager.complete_login(stale).unwrap_err(), Error::Cancelled);
        assert!(manager.login_pending(), "current attempt still in flight");

        let session = manager.complete_login(second.finish().await).unwrap();
        assert_eq!(session.profile().unwrap().email, "c@d.com");
    }

    #[tokio::test]
    async fn network_errors_are_retried() {
        let flaky = Arc::new(Flaky { failures: 2, calls: AtomicU32::new(0) });
        let mut manager =
            SessionManager::new(flaky.clone(), quick_retry_policy(2), Recorder::default());
        let session = manager.login("a@b.com", "pw", "").await.unwrap();
        assert!(session.is_authenticated());
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn network_errors_surface_once_retries_run_out() {
        let flaky = Arc::new(Flaky { failures: 5, calls: AtomicU32::new(0) });
        let mut manager =
            SessionManager::new(flaky.clone(), quick_retry_policy(1), Recorder::default());
        let err = manager.login("a@b.com", "pw", "").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
        assert!(!manager.session().is_authenticated());
        assert!(!manager.login_pending());
    }

    #[tokio::test]
    async fn invalid_credentials_are_not_retried() {
        let mut manager =
            SessionManager::new(Arc::new(Rejecting), quick_retry_policy(3), Recorder::default());
        let err = manager.login("a@b.com", "pw", "").await.unwrap_err();
        assert_eq!(err, Error::InvalidCredentials);
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let policy = LoginPolicy {
            timeout: Duration::from_millis(20),
            retries: 0,
            backoff: Duration::ZERO,
        };
        let mut manager = SessionManager::new(
            Arc::new(MockAuthenticator::new(Duration::from_secs(30))),
            policy,
            Recorder::default(),
        );
        let err = manager.login("a@b.com", "pw", "").await.unwrap_err();
        assert_eq!(err, Error::Timeout(Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn logout_resets_and_renders() {
        let mut manager = instant_manager();
        manager.switch_form_mode();
        manager.login("a@b.com", "pw", "Kai").await.unwrap();
        let before = manager.sink().renders.len();

        let session = manager.logout();
        assert_eq!(session, Session::default());
        assert_eq!(manager.sink().renders.len(), before + 1);
        assert_eq!(manager.sink().renders.last(), Some(&Session::default()));
    }
}
