use chrono::NaiveDate;
use derive_more::Display;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    model::{attendance::AttendanceRecord, holiday::Holiday, leave_application::LeaveApplication},
    models::{blank_date_as_none, blank_str_as_none},
    reconcile::calendar::{holiday_on, is_weekend},
};

#[derive(Debug, Display, PartialEq, Eq)]
pub enum LeaveError {
    #[display(fmt = "All fields are required")]
    MissingFields,
    #[display(fmt = "Cannot apply leave for dates before today")]
    PastStart,
    #[display(fmt = "End date must be after start date")]
    InvertedRange,
    #[display(fmt = "Attendance already marked for some dates in this range")]
    ConflictingAttendance,
    #[display(fmt = "Leave already applied for some dates in this range")]
    ConflictingLeave,
    #[display(fmt = "Cannot apply leave for a single day that falls on a weekend")]
    SingleDayWeekend,
    #[display(fmt = "Cannot apply leave for a local holiday ({})", _0)]
    SingleDayHoliday(String),
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[serde(default, deserialize_with = "blank_date_as_none")]
    #[schema(example = "2026-11-09", value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    #[schema(example = "2026-11-10", value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_str_as_none")]
    #[schema(example = "Family function")]
    pub reason: Option<String>,
}

/// A leave request that passed the field checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

/// Field-level checks; run before anything is loaded for the conflict checks.
pub fn validate_leave_request(req: &ApplyLeave, today: NaiveDate) -> Result<LeaveRange, LeaveError> {
    let (Some(start_date), Some(end_date), Some(reason)) =
        (req.start_date, req.end_date, req.reason.as_deref())
    else {
        return Err(LeaveError::MissingFields);
    };

    if start_date < today {
        return Err(LeaveError::PastStart);
    }
    if start_date > end_date {
        return Err(LeaveError::InvertedRange);
    }

    Ok(LeaveRange {
        start_date,
        end_date,
        reason: reason.to_string(),
    })
}

/// `attendance` and `leaves` are the user's rows; only those touching the
/// range matter, so callers may pass a pre-filtered or a complete set.
pub fn check_leave_conflicts(
    range: &LeaveRange,
    attendance: &[AttendanceRecord],
    leaves: &[LeaveApplication],
    holidays: &[Holiday],
) -> Result<(), LeaveError> {
    if attendance
        .iter()
        .any(|a| range.start_date <= a.date && a.date <= range.end_date)
    {
        return Err(LeaveError::ConflictingAttendance);
    }

    if leaves
        .iter()
        .any(|l| l.is_approved() && l.overlaps(range.start_date, range.end_date))
    {
        return Err(LeaveError::ConflictingLeave);
    }

    // A longer range may span weekends and holidays; those days just don't count later.
    if range.start_date == range.end_date {
        let day = range.start_date;
        if is_weekend(day) {
            return Err(LeaveError::SingleDayWeekend);
        }
        if let Some(holiday) = holiday_on(day, holidays) {
            return Err(LeaveError::SingleDayHoliday(holiday.name.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{attendance::AttendanceStatus, leave_application::LeaveStatus};
    use chrono::{TimeZone, Utc};

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn req(start: Option<&str>, end: Option<&str>, reason: Option<&str>) -> ApplyLeave {
        ApplyLeave {
            start_date: start.map(d),
            end_date: end.map(d),
            reason: reason.map(str::to_string),
        }
    }

    fn range(start: &str, end: &str) -> LeaveRange {
        LeaveRange {
            start_date: d(start),
            end_date: d(end),
            reason: "trip".into(),
        }
    }

    fn leave(start: &str, end: &str, status: LeaveStatus) -> LeaveApplication {
        LeaveApplication {
            id: 1,
            user_id: 1,
            start_date: d(start),
            end_date: d(end),
            reason: "earlier".into(),
            status,
            created_at: None,
        }
    }

    const TODAY: &str = "2024-03-04"; // Monday

    #[test]
    fn missing_fields() {
        let today = d(TODAY);
        for r in [
            req(None, Some("2024-03-05"), Some("x")),
            req(Some("2024-03-05"), None, Some("x")),
            req(Some("2024-03-05"), Some("2024-03-05"), None),
        ] {
            assert_eq!(validate_leave_request(&r, today), Err(LeaveError::MissingFields));
        }
    }

    #[test]
    fn today_is_allowed_yesterday_is_not() {
        let today = d(TODAY);
        assert!(validate_leave_request(&req(Some(TODAY), Some(TODAY), Some("x")), today).is_ok());
        assert_eq!(
            validate_leave_request(&req(Some("2024-03-03"), Some(TODAY), Some("x")), today),
            Err(LeaveError::PastStart)
        );
    }

    #[test]
    fn inverted_range() {
        assert_eq!(
            validate_leave_request(&req(Some("2024-03-06"), Some("2024-03-05"), Some("x")), d(TODAY)),
            Err(LeaveError::InvertedRange)
        );
    }

    #[test]
    fn attendance_inside_range_conflicts() {
        let att = [AttendanceRecord {
            id: 1,
            user_id: 1,
            date: d("2024-03-04"),
            status: AttendanceStatus::Present,
            marked_at: Utc.with_ymd_and_hms(2024, 3, 4, 5, 0, 0).unwrap(),
        }];
        assert_eq!(
            check_leave_conflicts(&range("2024-03-04", "2024-03-08"), &att, &[], &[]),
            Err(LeaveError::ConflictingAttendance)
        );
        assert!(check_leave_conflicts(&range("2024-03-05", "2024-03-08"), &att, &[], &[]).is_ok());
    }

    #[test]
    fn partial_overlap_with_approved_leave_conflicts() {
        let leaves = [leave("2024-03-07", "2024-03-12", LeaveStatus::Approved)];
        assert_eq!(
            check_leave_conflicts(&range("2024-03-05", "2024-03-07"), &[], &leaves, &[]),
            Err(LeaveError::ConflictingLeave)
        );
        let rejected = [leave("2024-03-07", "2024-03-12", LeaveStatus::Rejected)];
        assert!(check_leave_conflicts(&range("2024-03-05", "2024-03-07"), &[], &rejected, &[]).is_ok());
    }

    #[test]
    fn single_weekend_day_rejected_but_spanning_range_allowed() {
        assert_eq!(
            check_leave_conflicts(&range("2024-03-09", "2024-03-09"), &[], &[], &[]),
            Err(LeaveError::SingleDayWeekend)
        );
        assert!(check_leave_conflicts(&range("2024-03-08", "2024-03-11"), &[], &[], &[]).is_ok());
    }

    #[test]
    fn single_holiday_rejected() {
        let holidays = [Holiday {
            id: 2,
            name: "Holi".into(),
            start_date: d("2024-03-25"),
            end_date: d("2024-03-25"),
            reason: "Festival".into(),
            created_at: None,
            updated_at: None,
        }];
        assert_eq!(
            check_leave_conflicts(&range("2024-03-25", "2024-03-25"), &[], &[], &holidays),
            Err(LeaveError::SingleDayHoliday("Holi".into()))
        );
        assert!(check_leave_conflicts(&range("2024-03-25", "2024-03-26"), &[], &[], &holidays).is_ok());
    }
}
