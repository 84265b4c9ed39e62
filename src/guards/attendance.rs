use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use derive_more::Display;
use serde::Serialize;
use strum_macros::Display as StrumDisplay;
use utoipa::ToSchema;

use crate::{
    model::{attendance::AttendanceRecord, holiday::Holiday, leave_application::LeaveApplication},
    reconcile::{
        MarkingWindow,
        calendar::{holiday_on, is_weekend, weekday_name},
    },
};

/// Hour of day shown on a 12-hour clock: `9 AM`, `5 PM`, `12 PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockHour(pub u32);

impl fmt::Display for ClockHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = self.0 % 24;
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let twelve = match hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{twelve} {suffix}")
    }
}

/// Which side of the marking window a request fell on, with the boundary hour.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum WindowMiss {
    #[display(fmt = "Attendance cannot be marked before {}", _0)]
    NotOpenYet(ClockHour),
    #[display(fmt = "Attendance marking time for today is over (after {})", _0)]
    Closed(ClockHour),
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum MarkError {
    #[display(fmt = "{}", _0)]
    OutsideWindow(WindowMiss),
    #[display(fmt = "Cannot mark attendance before start date")]
    BeforeStart,
    #[display(fmt = "Attendance already marked for today")]
    AlreadyMarked,
    #[display(fmt = "Cannot mark attendance on leave days")]
    OnApprovedLeave,
    #[display(fmt = "Attendance cannot be marked as today is a weekend ({})", _0)]
    Weekend(&'static str),
    #[display(fmt = "Attendance cannot be marked as today is a local holiday due to: {}", _0)]
    Holiday(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, StrumDisplay, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimePeriod {
    Morning,
    Afternoon,
    Evening,
}

impl TimePeriod {
    pub fn of_hour(hour: u32) -> Self {
        match hour {
            0..=11 => TimePeriod::Morning,
            12..=14 => TimePeriod::Afternoon,
            _ => TimePeriod::Evening,
        }
    }
}

/// What the mark guard needs to know about the user on `now`'s date.
pub struct MarkContext<'a> {
    pub start_date: NaiveDate,
    pub today_record: Option<&'a AttendanceRecord>,
    pub leaves: &'a [LeaveApplication],
    pub holidays: &'a [Holiday],
}

pub fn check_mark(
    now: NaiveDateTime,
    window: &MarkingWindow,
    ctx: &MarkContext<'_>,
) -> Result<TimePeriod, MarkError> {
    let today = now.date();
    let hour = now.hour();

    if !window.contains_hour(hour) {
        let miss = if hour < window.opens_at {
            WindowMiss::NotOpenYet(ClockHour(window.opens_at))
        } else {
            WindowMiss::Closed(ClockHour(window.closes_at))
        };
        return Err(MarkError::OutsideWindow(miss));
    }

    if ctx.start_date > today {
        return Err(MarkError::BeforeStart);
    }

    if ctx.today_record.is_some() {
        return Err(MarkError::AlreadyMarked);
    }

    if ctx.leaves.iter().any(|l| l.is_approved() && l.covers(today)) {
        return Err(MarkError::OnApprovedLeave);
    }

    if is_weekend(today) {
        return Err(MarkError::Weekend(weekday_name(today)));
    }

    if let Some(holiday) = holiday_on(today, ctx.holidays) {
        return Err(MarkError::Holiday(holiday.reason.clone()));
    }

    Ok(TimePeriod::of_hour(hour))
}
