use std::fmt;

use serde::Deserialize;

/// Avatar shown for every mock account until profiles carry real pictures.
pub const DEFAULT_AVATAR_URL: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=100";

/// Which variant of the login form is showing.
///
/// Only changes form labels and whether the full-name field is shown; it has
/// no effect on whether the session is authenticated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    SignIn,
    SignUp,
}

impl FormMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            FormMode::SignIn => FormMode::SignUp,
            FormMode::SignUp => FormMode::SignIn,
        }
    }
}

/// Identity of a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub display_name: String,
    pub email: String,
    pub avatar_url: String,
}

/// Authentication state plus login-form mode.
///
/// `authenticated` is derived from `profile` so the two can never disagree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    profile: Option<Profile>,
    pub form_mode: FormMode,
}

impl Session {
    /// A session holding `profile`, keeping the given form mode.
    pub fn authenticated_as(profile: Profile, form_mode: FormMode) -> Self {
        Self { profile: Some(profile), form_mode }
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }
}

/// Identifier of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u32);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a comment: creation time in milliseconds, bumped to stay unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single review posted against a catalog entry.
///
/// `like_count` moves by exactly one per like toggle and never goes below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub avatar_url: String,
    pub text: String,          // trimmed, never empty
    pub rating: u8,            // 1..=5
    pub created_label: String, // display only, e.g. "Just now"
    pub like_count: u32,
    pub liked_by_current_user: bool,
}

/// Light/dark choice, the one piece of state that survives a restart.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }

    /// Parses a stored value. Anything unrecognised reads as the default.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "light" => ThemePreference::Light,
            _ => ThemePreference::Dark,
        }
    }
}
