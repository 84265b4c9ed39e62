//! Attendance / leave / holiday reconciliation.
//!
//! Every endpoint that reports attendance figures goes through [`reconcile`],
//! which walks a user's working days, classifies each of them and tallies
//! the result.

pub mod calendar;
pub mod classify;
pub mod stats;

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{
    attendance::AttendanceRecord,
    holiday::Holiday,
    leave_application::{LeaveApplication, LeaveStatus},
};
use calendar::WorkingDays;
use classify::{DayStatus, classify_day};
use stats::AttendanceStats;

pub const FAILED_TO_MARK_REASON: &str = "Failed to Mark Attendance";

/// Local hours during which attendance can be marked: `[opens_at, closes_at)`.
/// `closes_at` is also the cutoff after which an unmarked today counts as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkingWindow {
    pub opens_at: u32,
    pub closes_at: u32,
}

impl Default for MarkingWindow {
    fn default() -> Self {
        Self {
            opens_at: 9,
            closes_at: 17,
        }
    }
}

impl MarkingWindow {
    pub fn contains_hour(&self, hour: u32) -> bool {
        self.opens_at <= hour && hour < self.closes_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedDay {
    pub date: NaiveDate,
    pub status: DayStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub days: Vec<ClassifiedDay>,
    pub stats: AttendanceStats,
}

/// Reconcile one user from `start_date` up to and including `now`'s date.
pub fn reconcile(
    start_date: NaiveDate,
    now: NaiveDateTime,
    window: &MarkingWindow,
    attendance: &[AttendanceRecord],
    leaves: &[LeaveApplication],
    holidays: &[Holiday],
) -> Reconciliation {
    let marked: BTreeSet<NaiveDate> = attendance.iter().map(|a| a.date).collect();

    let days: Vec<ClassifiedDay> = WorkingDays::new(start_date, now.date(), holidays)
        .map(|date| ClassifiedDay {
            date,
            status: classify_day(date, now, window, &marked, leaves),
        })
        .collect();

    let stats = AttendanceStats::tally(days.iter().map(|d| d.status));

    Reconciliation { days, stats }
}

impl Reconciliation {
    pub fn failed_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days
            .iter()
            .filter(|d| d.status == DayStatus::FailedToMark)
            .map(|d| d.date)
    }

    /// Stored leave rows plus one synthesized entry per failed day, newest first.
    pub fn merged_leaves(&self, user_id: u64, leaves: Vec<LeaveApplication>) -> Vec<LeaveEntry> {
        let mut merged: Vec<LeaveEntry> = leaves.into_iter().map(LeaveEntry::from).collect();
        merged.extend(self.failed_days().map(|date| LeaveEntry::failed_to_mark(user_id, date)));
        merged.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        merged
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum LeaveEntryId {
    Stored(u64),
    /// `failed-YYYY-MM-DD`
    Synthetic(String),
}

/// Row of the merged leave list returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaveEntry {
    pub id: LeaveEntryId,
    pub user_id: u64,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<chrono::DateTime<Utc>>,
}

impl LeaveEntry {
    fn failed_to_mark(user_id: u64, date: NaiveDate) -> Self {
        let midnight = date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
        Self {
            id: LeaveEntryId::Synthetic(format!("failed-{date}")),
            user_id,
            start_date: date,
            end_date: date,
            reason: FAILED_TO_MARK_REASON.to_string(),
            status: LeaveStatus::AutoGenerated,
            created_at: midnight,
        }
    }
}

impl From<LeaveApplication> for LeaveEntry {
    fn from(leave: LeaveApplication) -> Self {
        Self {
            id: LeaveEntryId::Stored(leave.id),
            user_id: leave.user_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason,
            status: leave.status,
            created_at: leave.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn at(date: &str, hour: u32) -> NaiveDateTime {
        d(date).and_hms_opt(hour, 0, 0).unwrap()
    }

    fn marked(date: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            user_id: 1,
            date: d(date),
            status: AttendanceStatus::Present,
            marked_at: Utc.from_utc_datetime(&at(date, 10)),
        }
    }

    fn approved(id: u64, start: &str, end: &str) -> LeaveApplication {
        LeaveApplication {
            id,
            user_id: 1,
            start_date: d(start),
            end_date: d(end),
            reason: "travel".into(),
            status: LeaveStatus::Approved,
            created_at: None,
        }
    }

    fn holiday(start: &str, end: &str) -> Holiday {
        Holiday {
            id: 1,
            name: "Harvest".into(),
            start_date: d(start),
            end_date: d(end),
            reason: "Festival".into(),
            created_at: None,
            updated_at: None,
        }
    }

    fn run(now: NaiveDateTime, att: &[AttendanceRecord], leaves: &[LeaveApplication], hol: &[Holiday]) -> Reconciliation {
        reconcile(d("2024-01-01"), now, &MarkingWindow::default(), att, leaves, hol)
    }

    #[test]
    fn first_week_with_nothing_recorded() {
        let r = run(at("2024-01-05", 18), &[], &[], &[]);
        assert_eq!(r.stats.total_working_days, 5);
        assert_eq!(r.stats.present_days, 0);
        assert_eq!(r.stats.failed_to_mark, 5);
        assert_eq!(r.stats.attendance_percentage, 0);
    }

    #[test]
    fn attendance_and_leave_week() {
        let att: Vec<_> = ["2024-01-01", "2024-01-02", "2024-01-03"].into_iter().map(marked).collect();
        let leaves = [approved(4, "2024-01-04", "2024-01-05")];
        let r = run(at("2024-01-05", 18), &att, &leaves, &[]);
        assert_eq!(r.stats.present_days, 3);
        assert_eq!(r.stats.leave_days, 2);
        assert_eq!(r.stats.failed_to_mark, 0);
        assert_eq!(r.stats.attendance_percentage, 60);
    }

    #[test]
    fn unresolved_today_is_left_out() {
        let att = [marked("2024-01-01")];
        let r = run(at("2024-01-02", 11), &att, &[], &[]);
        assert_eq!(r.stats.total_working_days, 1);
        assert_eq!(r.stats.attendance_percentage, 100);
        assert_eq!(r.days.last().map(|d| d.status), Some(DayStatus::Pending));
    }

    #[test]
    fn new_hire_before_any_working_day() {
        let r = reconcile(d("2024-01-08"), at("2024-01-08", 8), &MarkingWindow::default(), &[], &[], &[]);
        assert_eq!(r.stats.total_working_days, 0);
        assert_eq!(r.stats.attendance_percentage, 0);
    }

    #[test]
    fn future_start_date_yields_nothing() {
        let r = reconcile(d("2024-02-01"), at("2024-01-08", 12), &MarkingWindow::default(), &[], &[], &[]);
        assert!(r.days.is_empty());
        assert_eq!(r.stats, AttendanceStats::default());
    }

    #[test]
    fn weekend_attendance_never_counts() {
        // 2024-01-06/07 is a weekend
        let att = [marked("2024-01-06"), marked("2024-01-07")];
        let r = run(at("2024-01-08", 18), &att, &[], &[]);
        assert_eq!(r.stats.total_working_days, 6);
        assert_eq!(r.stats.present_days, 0);
    }

    #[test]
    fn holiday_attendance_is_recorded_but_not_counted() {
        let att = [marked("2024-01-03")];
        let hol = [holiday("2024-01-03", "2024-01-03")];
        let r = run(at("2024-01-05", 18), &att, &[], &hol);
        assert_eq!(r.stats.total_working_days, 4);
        assert_eq!(r.stats.present_days, 0);
        assert!(r.days.iter().all(|day| day.date != d("2024-01-03")));
    }

    #[test]
    fn counters_always_sum_to_total() {
        let att = [marked("2024-01-02"), marked("2024-01-09")];
        let leaves = [approved(1, "2024-01-04", "2024-01-08"), approved(2, "2024-01-02", "2024-01-02")];
        let hol = [holiday("2024-01-10", "2024-01-11")];
        let r = run(at("2024-01-15", 12), &att, &leaves, &hol);
        let s = r.stats;
        assert_eq!(s.present_days + s.on_leave_days + s.failed_to_mark, s.total_working_days);
        assert_eq!(s.present_days, 2);
        assert_eq!(s.on_leave_days, 3);
    }

    #[test]
    fn merged_leaves_are_newest_first() {
        let leaves = vec![approved(7, "2024-01-03", "2024-01-03")];
        let r = run(at("2024-01-05", 18), &[], &leaves, &[]);
        let merged = r.merged_leaves(1, leaves);

        assert_eq!(merged.len(), 5);
        let starts: Vec<_> = merged.iter().map(|l| l.start_date).collect();
        let mut sorted = starts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(starts, sorted);

        assert_eq!(merged[0].id, LeaveEntryId::Synthetic("failed-2024-01-05".into()));
        assert_eq!(merged[0].status, LeaveStatus::AutoGenerated);
        assert_eq!(merged[0].reason, FAILED_TO_MARK_REASON);
        assert!(merged.iter().any(|l| l.id == LeaveEntryId::Stored(7)));
    }

    #[test]
    fn marking_window_is_half_open() {
        let w = MarkingWindow::default();
        assert!(!w.contains_hour(8));
        assert!(w.contains_hour(9));
        assert!(w.contains_hour(16));
        assert!(!w.contains_hour(17));
    }
}
