//! Review board: per-entry comment lists, the review draft, and like toggling.
//!
//! Lists are keyed by [`EntryId`]; only the active entry's list is rendered.
//! New comments are prepended, so every list reads newest first.

use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::error::{Error, Result, ValidationError};
use crate::render::CommentSink;
use crate::types::{Comment, CommentId, EntryId, Session};

/// Highest star rating.
pub const MAX_RATING: u8 = 5;
/// Label given to freshly posted comments.
pub const JUST_NOW: &str = "Just now";

/// Where the star input stands for the current draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingState {
    Idle,
    Selected(u8),
}

/// The not-yet-posted review.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pending_rating: u8,
    preview: Option<u8>,
}

impl Draft {
    pub fn pending_rating(&self) -> u8 {
        self.pending_rating
    }

    pub fn rating_state(&self) -> RatingState {
        match self.pending_rating {
            0 => RatingState::Idle,
            n => RatingState::Selected(n),
        }
    }

    /// The hover preview when one is active, otherwise the pending rating.
    pub fn displayed_rating(&self) -> u8 {
        self.preview.unwrap_or(self.pending_rating)
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.pending_rating == 0
    }
}

/// Owns every entry's comments and renders the active one to `S`.
pub struct ReviewBoard<S> {
    lists: HashMap<EntryId, Vec<Comment>>,
    active: Option<EntryId>,
    draft: Draft,
    last_id: u64,
    sink: S,
}

impl<S: CommentSink> ReviewBoard<S> {
    pub fn new(sink: S) -> Self {
        Self {
            lists: HashMap::new(),
            active: None,
            draft: Draft::default(),
            last_id: 0,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn active_entry(&self) -> Option<EntryId> {
        self.active
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Makes `entry` the active list, discards the draft, and renders.
    pub fn open_entry(&mut self, entry: EntryId) {
        self.active = Some(entry);
        self.draft = Draft::default();
        debug!(%entry, "review board opened");
        self.render();
    }

    pub fn close_entry(&mut self) {
        self.active = None;
        self.draft = Draft::default();
        self.render();
    }

    /// Seeds `entry` with existing comments, replacing its list.
    ///
    /// Every comment must have non-blank text, a rating in 1..=5, and an id not
    /// used anywhere else on the board. The list is stored newest first and the
    /// id generator is moved past the largest seeded id.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] on the first offending comment; the board is
    /// untouched.
    pub fn restore(&mut self, entry: EntryId, mut comments: Vec<Comment>) -> Result<()> {
        let mut taken: HashSet<CommentId> = self
            .lists
            .iter()
            .filter(|(id, _)| **id != entry)
            .flat_map(|(_, list)| list.iter().map(|c| c.id))
            .collect();
        for comment in &comments {
            if comment.text.trim().is_empty() {
                return Err(ValidationError::EmptyText.into());
            }
            if !(1..=MAX_RATING).contains(&comment.rating) {
                return Err(ValidationError::RatingOutOfRange(comment.rating).into());
            }
            if !taken.insert(comment.id) {
                return Err(ValidationError::DuplicateCommentId(comment.id).into());
            }
        }

        comments.sort_by(|a, b| b.id.cmp(&a.id));
        if let Some(max) = comments.first().map(|c| c.id.0) {
            self.last_id = self.last_id.max(max);
        }
        debug!(%entry, count = comments.len(), "comments restored");
        self.lists.insert(entry, comments);
        if self.active == Some(entry) {
            self.render();
        }
        Ok(())
    }

    /// The active entry's comments, newest first; empty when nothing is open.
    pub fn list_comments(&self) -> &[Comment] {
        self.active
            .and_then(|entry| self.lists.get(&entry))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.list_comments().iter().find(|c| c.id == id)
    }

    /// Posts a review on the active entry.
    ///
    /// # Errors
    ///
    /// [`Error::AuthRequired`] when logged out, [`Error::Validation`] for blank
    /// text or a rating outside 1..=5, [`Error::NoEntryOpen`] when no entry is
    /// active, [`Error::IdsExhausted`] once the id space is used up. The list is
    /// untouched on every error.
    pub fn post_comment(&mut self, session: &Session, text: &str, rating: u8) -> Result<Comment> {
        let profile = session.profile().ok_or(Error::AuthRequired)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        if !(1..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating).into());
        }
        let entry = self.active.ok_or(Error::NoEntryOpen)?;

        let comment = Comment {
            id: self.next_id()?,
            author: profile.display_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            text: text.to_owned(),
            rating,
            created_label: JUST_NOW.to_owned(),
            like_count: 0,
            liked_by_current_user: false,
        };
        self.lists.entry(entry).or_default().insert(0, comment.clone());
        self.draft = Draft::default();
        info!(%entry, id = %comment.id, rating, "review posted");
        self.render();
        Ok(comment)
    }

    /// Flips the current user's like on `id` in the active list.
    ///
    /// # Errors
    ///
    /// [`Error::AuthRequired`] when logged out, [`Error::NotFound`] when the
    /// active list has no such comment.
    pub fn toggle_like(&mut self, session: &Session, id: CommentId) -> Result<Comment> {
        if !session.is_authenticated() {
            return Err(Error::AuthRequired);
        }
        let comment = self
            .active
            .and_then(|entry| self.lists.get_mut(&entry))
            .and_then(|list| list.iter_mut().find(|c| c.id == id))
            .ok_or(Error::NotFound(id))?;

        if comment.liked_by_current_user {
            comment.liked_by_current_user = false;
            comment.like_count = comment.like_count.saturating_sub(1);
        } else {
            comment.liked_by_current_user = true;
            comment.like_count = comment.like_count.saturating_add(1);
        }
        let updated = comment.clone();
        debug!(id = %id, liked = updated.liked_by_current_user, likes = updated.like_count, "like toggled");
        self.render();
        Ok(updated)
    }

    /// Sets the star rating for the draft. `0` clears it.
    pub fn set_pending_rating(&mut self, rating: u8) -> Result<()> {
        if rating > MAX_RATING {
            return Err(ValidationError::PendingRatingOutOfRange(rating).into());
        }
        self.draft.pending_rating = rating;
        Ok(())
    }

    /// Shows `rating` on the star input without selecting it; `None` ends the preview.
    pub fn preview_rating(&mut self, rating: Option<u8>) {
        self.draft.preview = rating.map(|r| r.min(MAX_RATING));
    }

    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn push_draft_char(&mut self, c: char) {
        self.draft.text.push(c);
    }

    pub fn pop_draft_char(&mut self) {
        self.draft.text.pop();
    }

    /// Clears the draft text and rating. Never fails.
    pub fn cancel_draft(&mut self) {
        self.draft = Draft::default();
    }

    fn next_id(&mut self) -> Result<CommentId> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let next = self.last_id.checked_add(1).ok_or(Error::IdsExhausted)?;
        self.last_id = now.max(next);
        Ok(CommentId(self.last_id))
    }

    fn render(&mut self) {
        let comments = self
            .active
            .and_then(|entry| self.lists.get(&entry))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        self.sink.render_comments(self.active, comments);
    }
}
