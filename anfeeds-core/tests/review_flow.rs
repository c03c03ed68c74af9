//! End-to-end review flow: sign in through the session manager, then post and
//! like comments on the review board.

use std::sync::Arc;
use std::time::Duration;

use anfeeds_core::{
    Comment, CommentId, CommentSink, EntryId, Error, LoginPolicy, MockAuthenticator, NullSink,
    ReviewBoard, Session, SessionManager, ValidationError,
};

#[derive(Default)]
struct RecordingFeed {
    renders: usize,
    last: Vec<Comment>,
    last_entry: Option<EntryId>,
}

impl CommentSink for RecordingFeed {
    fn render_comments(&mut self, entry: Option<EntryId>, comments: &[Comment]) {
        self.renders += 1;
        self.last_entry = entry;
        self.last = comments.to_vec();
    }
}

async fn signed_in_session() -> Session {
    let mut manager = SessionManager::new(
        Arc::new(MockAuthenticator::new(Duration::ZERO)),
        LoginPolicy::default(),
        NullSink,
    );
    manager.login("a@b.com", "pw", "").await.unwrap()
}

fn board_on(entry: u32) -> ReviewBoard<RecordingFeed> {
    let mut board = ReviewBoard::new(RecordingFeed::default());
    board.open_entry(EntryId(entry));
    board
}

fn seeded(id: u64, likes: u32) -> Comment {
    Comment {
        id: CommentId(id),
        author: "Someone".to_owned(),
        avatar_url: String::new(),
        text: "seeded".to_owned(),
        rating: 4,
        created_label: "yesterday".to_owned(),
        like_count: likes,
        liked_by_current_user: false,
    }
}

#[tokio::test]
async fn login_scenario_sets_otaku_master() {
    let session = signed_in_session().await;
    assert!(session.is_authenticated());
    assert_eq!(session.profile().unwrap().display_name, "Otaku Master");
}

#[tokio::test]
async fn first_post_on_empty_board() {
    let session = signed_in_session().await;
    let mut board = board_on(1);

    board.post_comment(&session, "Great show!", 5).unwrap();

    let list = board.list_comments();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].text, "Great show!");
    assert_eq!(list[0].rating, 5);
    assert_eq!(list[0].like_count, 0);
    assert!(!list[0].liked_by_current_user);
    assert_eq!(list[0].author, "Otaku Master");
    assert_eq!(list[0].created_label, "Just now");
    assert_eq!(board.sink().last, list, "sink saw the new list");
}

#[tokio::test]
async fn posts_are_newest_first() {
    let session = signed_in_session().await;
    let mut board = board_on(1);
    for (i, text) in ["first", "second", "third", "fourth"].iter().enumerate() {
        board.post_comment(&session, text, (i % 5) as u8 + 1).unwrap();
    }
    let texts: Vec<&str> = board.list_comments().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["fourth", "third", "second", "first"]);
}

#[tokio::test]
async fn invalid_posts_leave_list_untouched() {
    let session = signed_in_session().await;
    let mut board = board_on(1);
    board.post_comment(&session, "keep me", 3).unwrap();
    let renders = board.sink().renders;

    assert_eq!(
        board.post_comment(&session, "fine text", 0).unwrap_err(),
        Error::Validation(ValidationError::RatingOutOfRange(0))
    );
    assert_eq!(
        board.post_comment(&session, "", 4).unwrap_err(),
        Error::Validation(ValidationError::EmptyText)
    );
    assert_eq!(
        board.post_comment(&session, "   \t ", 4).unwrap_err(),
        Error::Validation(ValidationError::EmptyText)
    );
    assert_eq!(
        board.post_comment(&Session::default(), "Great show!", 5).unwrap_err(),
        Error::AuthRequired
    );

    assert_eq!(board.list_comments().len(), 1);
    assert_eq!(board.sink().renders, renders, "failures do not render");
}

#[tokio::test]
async fn toggle_like_twice_is_identity() {
    let session = signed_in_session().await;
    let mut board = board_on(7);
    board.restore(EntryId(7), vec![seeded(42, 3)]).unwrap();

    let liked = board.toggle_like(&session, CommentId(42)).unwrap();
    assert_eq!(liked.like_count, 4);
    assert!(liked.liked_by_current_user);

    let unliked = board.toggle_like(&session, CommentId(42)).unwrap();
    assert_eq!(unliked.like_count, 3);
    assert!(!unliked.liked_by_current_user);
    assert_eq!(board.comment(CommentId(42)), Some(&seeded(42, 3)));
}

#[tokio::test]
async fn toggle_like_on_missing_id_is_not_found() {
    let session = signed_in_session().await;
    let mut board = board_on(7);
    board.restore(EntryId(7), vec![seeded(42, 3)]).unwrap();
    let before = board.list_comments().to_vec();

    assert_eq!(
        board.toggle_like(&session, CommentId(999)).unwrap_err(),
        Error::NotFound(CommentId(999))
    );
    assert_eq!(board.list_comments(), before.as_slice());
}

#[tokio::test]
async fn toggle_like_requires_login() {
    let mut board = board_on(7);
    board.restore(EntryId(7), vec![seeded(42, 3)]).unwrap();
    assert_eq!(
        board.toggle_like(&Session::default(), CommentId(42)).unwrap_err(),
        Error::AuthRequired
    );
    assert_eq!(board.comment(CommentId(42)).unwrap().like_count, 3);
}

#[tokio::test]
async fn like_count_never_goes_negative() {
    let session = signed_in_session().await;
    let mut board = board_on(7);
    let mut odd = seeded(5, 0);
    odd.liked_by_current_user = true;
    board.restore(EntryId(7), vec![odd]).unwrap();

    let c = board.toggle_like(&session, CommentId(5)).unwrap();
    assert_eq!(c.like_count, 0);
    assert!(!c.liked_by_current_user);
}

#[tokio::test]
async fn lists_are_kept_per_entry() {
    let session = signed_in_session().await;
    let mut board = board_on(1);
    board.post_comment(&session, "about entry one", 5).unwrap();

    board.open_entry(EntryId(2));
    assert!(board.list_comments().is_empty());
    assert_eq!(board.sink().last_entry, Some(EntryId(2)));
    board.post_comment(&session, "about entry two", 2).unwrap();

    board.open_entry(EntryId(1));
    let texts: Vec<&str> = board.list_comments().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["about entry one"]);

    board.close_entry();
    assert!(board.list_comments().is_empty());
    assert_eq!(board.sink().last_entry, None);
}
