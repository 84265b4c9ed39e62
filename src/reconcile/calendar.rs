//! Working-day enumeration.

use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::holiday::Holiday;

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// First holiday window containing `date`, if any.
pub fn holiday_on(date: NaiveDate, holidays: &[Holiday]) -> Option<&Holiday> {
    holidays.iter().find(|h| h.covers(date))
}

/// Ascending walk over `[start, end]` that skips weekends and holiday windows.
///
/// Borrows the holiday set; a clone continues from the current position.
#[derive(Debug, Clone)]
pub struct WorkingDays<'a> {
    next: Option<NaiveDate>,
    end: NaiveDate,
    holidays: &'a [Holiday],
}

impl<'a> WorkingDays<'a> {
    pub fn new(start: NaiveDate, end: NaiveDate, holidays: &'a [Holiday]) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
            holidays,
        }
    }
}

impl Iterator for WorkingDays<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            let date = self.next?;
            self.next = date.succ_opt().filter(|d| *d <= self.end);

            if is_weekend(date) || holiday_on(date, self.holidays).is_some() {
                continue;
            }
            return Some(date);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(next) => {
                let span = (self.end - next).num_days() as usize + 1;
                (0, Some(span))
            }
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for WorkingDays<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn holiday(start: &str, end: &str) -> Holiday {
        Holiday {
            id: 1,
            name: "Closure".into(),
            start_date: d(start),
            end_date: d(end),
            reason: "Office maintenance".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn skips_weekends() {
        // 2024-01-05 is a Friday, 2024-01-08 a Monday
        let days: Vec<_> = WorkingDays::new(d("2024-01-05"), d("2024-01-08"), &[]).collect();
        assert_eq!(days, vec![d("2024-01-05"), d("2024-01-08")]);
    }

    #[test]
    fn skips_holiday_windows_inclusively() {
        let holidays = [holiday("2024-01-02", "2024-01-03")];
        let days: Vec<_> = WorkingDays::new(d("2024-01-01"), d("2024-01-05"), &holidays).collect();
        assert_eq!(days, vec![d("2024-01-01"), d("2024-01-04"), d("2024-01-05")]);
    }

    #[test]
    fn start_after_end_is_empty() {
        assert_eq!(WorkingDays::new(d("2024-01-10"), d("2024-01-09"), &[]).count(), 0);
    }

    #[test]
    fn weekend_start_moves_to_next_working_day() {
        let mut days = WorkingDays::new(d("2024-01-06"), d("2024-01-12"), &[]);
        assert_eq!(days.next(), Some(d("2024-01-08")));
    }

    #[test]
    fn clones_restart_independently() {
        let days = WorkingDays::new(d("2024-01-01"), d("2024-01-31"), &[]);
        let first: Vec<_> = days.clone().collect();
        let second: Vec<_> = days.collect();
        assert_eq!(first.len(), 23);
        assert_eq!(first, second);
    }

    #[test]
    fn single_day_range() {
        let days: Vec<_> = WorkingDays::new(d("2024-01-03"), d("2024-01-03"), &[]).collect();
        assert_eq!(days, vec![d("2024-01-03")]);
    }
}
