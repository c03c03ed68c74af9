//! View models fed by the core render sinks.
//!
//! `ProfileBadge` and `CommentFeed` are the terminal's implementations of
//! `SessionSink` and `CommentSink`. They flatten core state into display-ready
//! strings once per change so the per-frame render code only formats rows.

use anfeeds_core::{Comment, CommentId, CommentSink, EntryId, FormMode, Session, SessionSink};

/// Everything the header and the comment form need to know about the session.
#[derive(Debug, Default, Clone)]
pub struct ProfileBadge {
    pub signed_in: bool,
    pub display_name: String,
    pub email: String,
    pub avatar_url: String,
    pub form_mode: FormMode,
    /// The review form is shown only to signed-in users; others get a login prompt.
    pub comment_form_visible: bool,
}

impl SessionSink for ProfileBadge {
    fn render_session(&mut self, session: &Session) {
        self.form_mode = session.form_mode;
        match session.profile() {
            Some(profile) => {
                self.signed_in = true;
                self.display_name = profile.display_name.clone();
                self.email = profile.email.clone();
                self.avatar_url = profile.avatar_url.clone();
            }
            None => {
                self.signed_in = false;
                self.display_name.clear();
                self.email.clear();
                self.avatar_url.clear();
            }
        }
        self.comment_form_visible = self.signed_in;
    }
}

/// One pre-formatted comment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub id: CommentId,
    pub author: String,
    pub stars: String,
    pub date: String,
    pub text: String,
    pub likes: u32,
    pub liked: bool,
}

/// The comment list of the open detail view.
#[derive(Debug, Default, Clone)]
pub struct CommentFeed {
    pub entry: Option<EntryId>,
    pub rows: Vec<CommentRow>,
}

impl CommentSink for CommentFeed {
    fn render_comments(&mut self, entry: Option<EntryId>, comments: &[Comment]) {
        self.entry = entry;
        self.rows = comments
            .iter()
            .map(|c| CommentRow {
                id: c.id,
                author: c.author.clone(),
                stars: stars(c.rating),
                date: c.created_label.clone(),
                text: c.text.clone(),
                likes: c.like_count,
                liked: c.liked_by_current_user,
            })
            .collect();
    }
}

/// Five-star gauge, e.g. `★★★☆☆` for 3.
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
