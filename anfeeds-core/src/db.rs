use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::types::ThemePreference;

/// Preference key holding the light/dark choice.
pub const THEME_KEY: &str = "theme";

/// Opens (or creates) the preferences database at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL configuration
/// fails, or schema DDL fails.
pub async fn open_db(path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    conn.call(|db| {
        crate::schema::migrate(db)?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    Ok(conn)
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Reads one preference. Absent keys yield `None`.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn get_preference(
    conn: &Connection,
    key: &str,
) -> Result<Option<String>, tokio_rusqlite::Error> {
    let key = key.to_owned();

    conn.call(move |db| {
        db.query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            rusqlite::params![&key],
            |r| r.get::<_, String>(0),
        )
        .optional()
    })
    .await
}

/// Writes one preference, replacing any previous value.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the upsert transaction fails.
pub async fn set_preference(
    conn: &Connection,
    key: &str,
    value: &str,
) -> Result<(), tokio_rusqlite::Error> {
    let key = key.to_owned();
    let value = value.to_owned();

    conn.call(move |db| {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key)
             DO UPDATE SET value = excluded.value,
                           updated_at = excluded.updated_at",
            rusqlite::params![&key, &value, now_secs()],
        )?;
        tx.commit()?;
        Ok::<_, rusqlite::Error>(())
    })
    .await
}

/// Loads the saved theme, defaulting to dark when nothing was stored yet.
pub async fn load_theme(conn: &Connection) -> Result<ThemePreference, tokio_rusqlite::Error> {
    let stored = get_preference(conn, THEME_KEY).await?;
    Ok(stored
        .as_deref()
        .map(ThemePreference::from_stored)
        .unwrap_or_default())
}

/// Persists the theme. Called on every toggle.
pub async fn save_theme(
    conn: &Connection,
    theme: ThemePreference,
) -> Result<(), tokio_rusqlite::Error> {
    set_preference(conn, THEME_KEY, theme.as_str()).await
}
