use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::{
    guards::leave::LeaveRange,
    model::leave_application::{LeaveApplication, LeaveStatus},
};

const LEAVE_COLUMNS: &str = "id, user_id, start_date, end_date, reason, status, created_at";

/// All of a user's applications regardless of status, latest start first.
pub async fn for_user(pool: &MySqlPool, user_id: u64) -> Result<Vec<LeaveApplication>, sqlx::Error> {
    sqlx::query_as::<_, LeaveApplication>(&format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_applications WHERE user_id = ? ORDER BY start_date DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Approved applications of the user that share at least one day with `[start, end]`.
pub async fn approved_overlapping(
    pool: &MySqlPool,
    user_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<LeaveApplication>, sqlx::Error> {
    sqlx::query_as::<_, LeaveApplication>(&format!(
        r#"
        SELECT {LEAVE_COLUMNS} FROM leave_applications
        WHERE user_id = ? AND status = ? AND start_date <= ? AND end_date >= ?
        "#
    ))
    .bind(user_id)
    .bind(LeaveStatus::Approved.to_string())
    .bind(end)
    .bind(start)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &MySqlPool, id: u64) -> Result<Option<LeaveApplication>, sqlx::Error> {
    sqlx::query_as::<_, LeaveApplication>(&format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_applications WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert(
    pool: &MySqlPool,
    user_id: u64,
    range: &LeaveRange,
    status: LeaveStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO leave_applications (user_id, start_date, end_date, reason, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(range.start_date)
    .bind(range.end_date)
    .bind(&range.reason)
    .bind(status.to_string())
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}
