use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::MarkingWindow;
use crate::model::leave_application::LeaveApplication;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Present,
    OnLeave,
    FailedToMark,
    /// Today, before the marking window closes, with nothing recorded yet.
    Pending,
}

/// Classify one working day. Attendance wins over any leave window.
pub fn classify_day(
    date: NaiveDate,
    now: NaiveDateTime,
    window: &MarkingWindow,
    marked: &BTreeSet<NaiveDate>,
    leaves: &[LeaveApplication],
) -> DayStatus {
    if marked.contains(&date) {
        return DayStatus::Present;
    }

    if leaves.iter().any(|l| l.is_approved() && l.covers(date)) {
        return DayStatus::OnLeave;
    }

    let today = now.date();
    if date < today || (date == today && now.hour() >= window.closes_at) {
        DayStatus::FailedToMark
    } else {
        DayStatus::Pending
    }
}
