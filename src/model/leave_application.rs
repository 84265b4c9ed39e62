use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LeaveStatus {
    Approved,
    Pending,
    Rejected,
    /// Synthesized for a failed-to-mark day, never stored
    AutoGenerated,
}

impl TryFrom<String> for LeaveStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveApplication {
    pub id: u64,
    pub user_id: u64,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    /// Inclusive
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
    pub reason: String,
    #[sqlx(try_from = "String")]
    pub status: LeaveStatus,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LeaveApplication {
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leave(start: &str, end: &str) -> LeaveApplication {
        LeaveApplication {
            id: 1,
            user_id: 1,
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            reason: "trip".into(),
            status: LeaveStatus::Approved,
            created_at: None,
        }
    }

    #[test]
    fn status_uses_kebab_case_names() {
        assert_eq!(LeaveStatus::AutoGenerated.to_string(), "auto-generated");
        assert_eq!("approved".parse::<LeaveStatus>(), Ok(LeaveStatus::Approved));
    }

    #[test]
    fn overlap_is_inclusive_at_both_ends() {
        let l = leave("2024-03-04", "2024-03-06");
        let d = |s: &str| s.parse::<NaiveDate>().unwrap();
        assert!(l.overlaps(d("2024-03-06"), d("2024-03-08")));
        assert!(l.overlaps(d("2024-03-01"), d("2024-03-04")));
        assert!(l.overlaps(d("2024-03-05"), d("2024-03-05")));
        assert!(!l.overlaps(d("2024-03-07"), d("2024-03-09")));
        assert!(l.covers(d("2024-03-04")) && !l.covers(d("2024-03-03")));
    }
}
