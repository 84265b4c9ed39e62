use futures::{Stream, StreamExt};
use sqlx::MySqlPool;

use crate::{guards::user::UserProfile, model::user::User};

const USER_COLUMNS: &str =
    "id, name, email, phone, role, position, start_date, password, created_at";

pub async fn find_by_id(pool: &MySqlPool, id: u64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &MySqlPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Newest first, optionally narrowed to one position.
pub async fn list(pool: &MySqlPool, position: Option<&str>) -> Result<Vec<User>, sqlx::Error> {
    match position {
        Some(position) => {
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE position = ? ORDER BY created_at DESC, id DESC"
            ))
            .bind(position)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
            ))
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn email_exists(pool: &MySqlPool, email: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn count_admins(pool: &MySqlPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'Admin'")
        .fetch_one(pool)
        .await
}

pub async fn insert(
    pool: &MySqlPool,
    profile: &UserProfile,
    password_hash: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, phone, password, role, position, start_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&profile.name)
    .bind(&profile.email)
    .bind(&profile.phone)
    .bind(password_hash)
    .bind(profile.role.to_string())
    .bind(&profile.position)
    .bind(profile.start_date)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn update(pool: &MySqlPool, id: u64, profile: &UserProfile) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = ?, email = ?, phone = ?, role = ?, position = ?, start_date = ?
        WHERE id = ?
        "#,
    )
    .bind(&profile.name)
    .bind(&profile.email)
    .bind(&profile.phone)
    .bind(profile.role.to_string())
    .bind(&profile.position)
    .bind(profile.start_date)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn update_password(
    pool: &MySqlPool,
    email: &str,
    password_hash: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password = ? WHERE email = ?")
        .bind(password_hash)
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &MySqlPool, id: u64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub fn stream_emails(pool: &MySqlPool) -> impl Stream<Item = Result<String, sqlx::Error>> + '_ {
    sqlx::query_as::<_, (String,)>("SELECT email FROM users")
        .fetch(pool)
        .map(|row| row.map(|(email,)| email))
}
