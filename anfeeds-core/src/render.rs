//! Render sinks.
//!
//! The core never draws anything. After each state change the owning component
//! hands its new state to a sink, and whatever front end is attached turns that
//! into visible output.

use crate::types::{Comment, EntryId, Session};

/// Receives the session after every session-manager transition.
pub trait SessionSink {
    fn render_session(&mut self, session: &Session);
}

/// Receives the active entry's comment list after every review-board change.
///
/// `entry` is `None` when no detail view is open; `comments` is then empty.
pub trait CommentSink {
    fn render_comments(&mut self, entry: Option<EntryId>, comments: &[Comment]);
}

/// A sink that discards everything. Useful for headless callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SessionSink for NullSink {
    fn render_session(&mut self, _session: &Session) {}
}

impl CommentSink for NullSink {
    fn render_comments(&mut self, _entry: Option<EntryId>, _comments: &[Comment]) {}
}
