//! Integration test for the preference store.
//!
//! Exercises: open_db, migrate, get_preference, set_preference, load_theme,
//! save_theme, and reopening the same file.

use anfeeds_core::db;
use anfeeds_core::ThemePreference;

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("prefs.db");
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn theme_preference_lifecycle() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();

    // Verify schema_version = 1
    let version: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT MAX(version) FROM schema_version",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    // Verify WAL mode
    let journal: String = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(
                db.query_row("PRAGMA journal_mode", [], |r| r.get(0))?,
            )
        })
        .await
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    // Nothing stored yet: dark by default
    assert_eq!(db::get_preference(&conn, db::THEME_KEY).await.unwrap(), None);
    assert_eq!(db::load_theme(&conn).await.unwrap(), ThemePreference::Dark);

    // Toggle to light and back, writing on every toggle
    db::save_theme(&conn, ThemePreference::Light).await.unwrap();
    assert_eq!(db::load_theme(&conn).await.unwrap(), ThemePreference::Light);
    db::save_theme(&conn, ThemePreference::Dark).await.unwrap();
    db::save_theme(&conn, ThemePreference::Light).await.unwrap();

    // Upsert keeps a single row per key
    let rows: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(
                db.query_row("SELECT COUNT(*) FROM preferences", [], |r| r.get(0))?,
            )
        })
        .await
        .unwrap();
    assert_eq!(rows, 1, "preferences should hold one row");

    // Verify persistence: open a second connection to same DB
    let conn2 = db::open_db(&path).await.unwrap();
    assert_eq!(
        db::load_theme(&conn2).await.unwrap(),
        ThemePreference::Light,
        "theme should persist across connections"
    );
}

#[tokio::test]
async fn unknown_stored_theme_reads_as_dark() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("odd.db").to_string_lossy().to_string();
    let conn = db::open_db(&path).await.unwrap();

    db::set_preference(&conn, db::THEME_KEY, "sepia").await.unwrap();
    assert_eq!(db::load_theme(&conn).await.unwrap(), ThemePreference::Dark);
}

#[tokio::test]
async fn reopening_does_not_rerun_migration() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("twice.db").to_string_lossy().to_string();

    drop(db::open_db(&path).await.unwrap());
    let conn = db::open_db(&path).await.unwrap();

    let versions: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(
                db.query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))?,
            )
        })
        .await
        .unwrap();
    assert_eq!(versions, 1, "migration should be recorded exactly once");
}
