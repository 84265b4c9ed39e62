use sqlx::{FromRow, MySqlPool};

#[derive(Debug, FromRow)]
pub struct RefreshTokenRow {
    pub id: u64,
    pub user_id: u64,
    pub revoked: bool,
}

pub async fn insert(pool: &MySqlPool, user_id: u64, jti: &str, exp: usize) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(user_id)
    .bind(jti)
    .bind(exp as i64)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_jti(pool: &MySqlPool, jti: &str) -> Result<Option<RefreshTokenRow>, sqlx::Error> {
    sqlx::query_as::<_, RefreshTokenRow>(
        "SELECT id, user_id, revoked FROM refresh_tokens WHERE jti = ?",
    )
    .bind(jti)
    .fetch_optional(pool)
    .await
}

/// Idempotent.
pub async fn revoke(pool: &MySqlPool, jti: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE jti = ?")
        .bind(jti)
        .execute(pool)
        .await?;
    Ok(())
}
