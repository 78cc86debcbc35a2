use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::models::ReportStatus;

use super::models::UserReport;
use super::text_column;

const REPORT_COLUMNS: &str = "id, reporter_id, reported_id, reason, description, status, \
     handled_by, handled_at, created_at";

pub fn insert_report(
    conn: &Connection,
    reporter_id: i64,
    reported_id: i64,
    reason: &str,
    description: Option<&str>,
) -> Result<UserReport> {
    let sql = format!(
        "INSERT INTO user_reports (reporter_id, reported_id, reason, description) \
         VALUES (?1, ?2, ?3, ?4) RETURNING {REPORT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![reporter_id, reported_id, reason, description],
        parse_report_row,
    )
    .context("Failed to insert user report")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<UserReport>> {
    let sql = format!("SELECT {REPORT_COLUMNS} FROM user_reports WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_report_row)
        .optional()
        .context("Failed to query user report")
}

/// Resolves a pending report. Conditional on `pending` so a report is
/// handled at most once.
pub fn resolve(
    conn: &Connection,
    id: i64,
    status: ReportStatus,
    handled_by: i64,
    handled_at: NaiveDateTime,
) -> Result<usize> {
    conn.execute(
        "UPDATE user_reports SET status = ?1, handled_by = ?2, handled_at = ?3 \
         WHERE id = ?4 AND status = ?5",
        params![
            status.as_str(),
            handled_by,
            handled_at,
            id,
            ReportStatus::Pending.as_str(),
        ],
    )
    .context("Failed to resolve user report")
}

pub fn list_by_status(conn: &Connection, status: ReportStatus) -> Result<Vec<UserReport>> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM user_reports WHERE status = ?1 ORDER BY created_at"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![status.as_str()], parse_report_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_by_status(conn: &Connection, status: ReportStatus) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM user_reports WHERE status = ?1",
        params![status.as_str()],
        |row| row.get(0),
    )
    .context("Failed to count user reports")
}

fn parse_report_row(row: &rusqlite::Row) -> rusqlite::Result<UserReport> {
    Ok(UserReport {
        id: row.get(0)?,
        reporter_id: row.get(1)?,
        reported_id: row.get(2)?,
        reason: row.get(3)?,
        description: row.get(4)?,
        status: text_column(5, row.get(5)?, ReportStatus::parse)?,
        handled_by: row.get(6)?,
        handled_at: row.get(7)?,
        created_at: row.get(8)?,
    })
}
