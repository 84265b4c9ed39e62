use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::role::Role;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 7,
    "name": "Asha Rao",
    "email": "asha@company.com",
    "phone": "9876543210",
    "role": "Employee",
    "position": "Backend Engineer",
    "start_date": "2024-01-01",
    "created_at": "2024-01-01T00:00:00Z"
}))]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub position: String,
    /// First working day, inclusive
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[serde(skip_serializing)]
    pub password: String,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
