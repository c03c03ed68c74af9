//! Core state for the AnFeeds catalog browser.
//!
//! Holds everything that does not depend on how the UI is drawn: the session
//! manager, the review board, the catalog, the render-sink traits, and the
//! small SQLite store for the theme preference.

pub mod board;
pub mod catalog;
pub mod db;
pub mod error;
pub mod render;
pub mod schema;
pub mod session;
pub mod types;

pub use board::{Draft, RatingState, ReviewBoard};
pub use catalog::{Catalog, CatalogEntry, Genre, GenreFilter};
pub use error::{Error, Result, ValidationError};
pub use render::{CommentSink, NullSink, SessionSink};
pub use session::{
    Authenticator, LoginOutcome, LoginPolicy, MockAuthenticator, PendingLogin, SessionManager,
};
pub use types::{Comment, CommentId, EntryId, FormMode, Profile, Session, ThemePreference};
