use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::{guards::holiday::HolidayDraft, model::holiday::Holiday};

const HOLIDAY_COLUMNS: &str = "id, name, start_date, end_date, reason, created_at, updated_at";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HolidayScope {
    /// Not over yet: `end_date >= today`
    #[default]
    Upcoming,
    Past,
    #[serde(other)]
    All,
}

pub async fn list_all(pool: &MySqlPool) -> Result<Vec<Holiday>, sqlx::Error> {
    sqlx::query_as::<_, Holiday>(&format!(
        "SELECT {HOLIDAY_COLUMNS} FROM local_holidays ORDER BY start_date ASC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn list_scoped(
    pool: &MySqlPool,
    scope: HolidayScope,
    today: NaiveDate,
) -> Result<Vec<Holiday>, sqlx::Error> {
    let filter = match scope {
        HolidayScope::Upcoming => "WHERE end_date >= ?",
        HolidayScope::Past => "WHERE end_date < ?",
        HolidayScope::All => return list_all(pool).await,
    };

    sqlx::query_as::<_, Holiday>(&format!(
        "SELECT {HOLIDAY_COLUMNS} FROM local_holidays {filter} ORDER BY start_date ASC"
    ))
    .bind(today)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &MySqlPool, id: u64) -> Result<Option<Holiday>, sqlx::Error> {
    sqlx::query_as::<_, Holiday>(&format!(
        "SELECT {HOLIDAY_COLUMNS} FROM local_holidays WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert(pool: &MySqlPool, draft: &HolidayDraft) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO local_holidays (name, start_date, end_date, reason) VALUES (?, ?, ?, ?)",
    )
    .bind(&draft.name)
    .bind(draft.start_date)
    .bind(draft.end_date)
    .bind(&draft.reason)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn update(pool: &MySqlPool, id: u64, draft: &HolidayDraft) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE local_holidays
        SET name = ?, start_date = ?, end_date = ?, reason = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&draft.name)
    .bind(draft.start_date)
    .bind(draft.end_date)
    .bind(&draft.reason)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete(pool: &MySqlPool, id: u64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM local_holidays WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::HolidayScope;

    #[derive(serde::Deserialize)]
    struct Query {
        #[serde(default, rename = "type")]
        scope: HolidayScope,
    }

    #[test]
    fn scope_defaults_to_upcoming_and_unknown_means_all() {
        let q: Query = serde_json::from_str("{}").unwrap();
        assert_eq!(q.scope, HolidayScope::Upcoming);
        let q: Query = serde_json::from_str(r#"{"type": "past"}"#).unwrap();
        assert_eq!(q.scope, HolidayScope::Past);
        let q: Query = serde_json::from_str(r#"{"type": "everything"}"#).unwrap();
        assert_eq!(q.scope, HolidayScope::All);
    }
}
