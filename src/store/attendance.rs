use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

const ATTENDANCE_COLUMNS: &str = "id, user_id, date, status, marked_at";

/// All of a user's records, newest first.
pub async fn for_user(pool: &MySqlPool, user_id: u64) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE user_id = ? ORDER BY date DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn on_date(
    pool: &MySqlPool,
    user_id: u64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE user_id = ? AND date = ?"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

pub async fn in_range(
    pool: &MySqlPool,
    user_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE user_id = ? AND date BETWEEN ? AND ?"
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// Fails with a unique violation if the user already has a row for `date`.
pub async fn insert_present(
    pool: &MySqlPool,
    user_id: u64,
    date: NaiveDate,
    marked_at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO attendance (user_id, date, status, marked_at) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(date)
    .bind(AttendanceStatus::Present.to_string())
    .bind(marked_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

/// Rows removed by [`reset_history`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResetCounts {
    pub attendance: u64,
    pub leaves: u64,
}

/// Drop attendance dated before `new_start` and leave starting before it,
/// both or neither.
pub async fn reset_history(
    pool: &MySqlPool,
    user_id: u64,
    new_start: NaiveDate,
) -> Result<ResetCounts, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let attendance = sqlx::query("DELETE FROM attendance WHERE user_id = ? AND date < ?")
        .bind(user_id)
        .bind(new_start)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let leaves = sqlx::query("DELETE FROM leave_applications WHERE user_id = ? AND start_date < ?")
        .bind(user_id)
        .bind(new_start)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    Ok(ResetCounts { attendance, leaves })
}
