//! Error kinds shared by the session manager and the review board.
//!
//! Every variant is recoverable: the front end reports it as a transient
//! notification and carries on.

use std::time::Duration;

use thiserror::Error;

use crate::types::CommentId;

/// Input rejected before any state was touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("review text is empty")]
    EmptyText,
    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(u8),
    #[error("pending rating {0} is outside 0..=5")]
    PendingRatingOutOfRange(u8),
    #[error("comment id {0} is used more than once")]
    DuplicateCommentId(CommentId),
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("you need to sign in first")]
    AuthRequired,
    #[error("no comment with id {0}")]
    NotFound(CommentId),
    #[error("no catalog entry is open")]
    NoEntryOpen,
    #[error("no comment ids left on this board")]
    IdsExhausted,
    #[error("a login attempt is already in progress")]
    LoginInFlight,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("network error: {0}")]
    Network(String),
    #[error("login timed out after {0:?}")]
    Timeout(Duration),
    #[error("login was cancelled")]
    Cancelled,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
