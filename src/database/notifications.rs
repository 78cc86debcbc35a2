use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Notification;

pub fn insert(
    conn: &Connection,
    user_id: i64,
    title: &str,
    body: &str,
    kind: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO notifications (user_id, title, body, kind) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, title, body, kind],
    )
    .context("Failed to insert notification")
    .map(|_| ())
}

pub fn list_for_user(conn: &Connection, user_id: i64, limit: usize) -> Result<Vec<Notification>> {
    let sql = "SELECT id, user_id, title, body, kind, read_at, created_at \
               FROM notifications WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![user_id, limit as i64], parse_notification_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn find_for_user(conn: &Connection, id: i64, user_id: i64) -> Result<Option<Notification>> {
    let sql = "SELECT id, user_id, title, body, kind, read_at, created_at \
               FROM notifications WHERE id = ?1 AND user_id = ?2";

    conn.query_row(sql, params![id, user_id], parse_notification_row)
        .optional()
        .context("Failed to query notification")
}

pub fn mark_read(conn: &Connection, id: i64, user_id: i64) -> Result<usize> {
    conn.execute(
        "UPDATE notifications SET read_at = CURRENT_TIMESTAMP \
         WHERE id = ?1 AND user_id = ?2 AND read_at IS NULL",
        params![id, user_id],
    )
    .context("Failed to mark notification read")
}

fn parse_notification_row(row: &rusqlite::Row) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        kind: row.get(4)?,
        read_at: row.get(5)?,
        created_at: row.get(6)?,
    })
}
