use chrono::NaiveDate;
use derive_more::Display;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    model::holiday::Holiday,
    models::{blank_date_as_none, blank_str_as_none},
    reconcile::calendar::is_weekend,
};

#[derive(Debug, Display, PartialEq, Eq)]
pub enum HolidayError {
    #[display(fmt = "All fields are required")]
    MissingFields,
    #[display(fmt = "Cannot add holiday for dates before today")]
    PastStart,
    #[display(fmt = "End date must be after start date")]
    InvertedRange,
    #[display(fmt = "Weekends are already holidays")]
    Weekend,
    #[display(fmt = "Cannot edit past holidays")]
    PastHoliday,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct HolidayInput {
    #[serde(default, deserialize_with = "blank_str_as_none")]
    #[schema(example = "Founders Day")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    #[schema(example = "2026-11-02", value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    #[schema(example = "2026-11-03", value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_str_as_none")]
    #[schema(example = "Office closed")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayDraft {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

fn required_fields(input: &HolidayInput) -> Result<HolidayDraft, HolidayError> {
    match (&input.name, input.start_date, input.end_date, &input.reason) {
        (Some(name), Some(start_date), Some(end_date), Some(reason)) => Ok(HolidayDraft {
            name: name.clone(),
            start_date,
            end_date,
            reason: reason.clone(),
        }),
        _ => Err(HolidayError::MissingFields),
    }
}

fn check_dates(draft: &HolidayDraft, today: NaiveDate) -> Result<(), HolidayError> {
    if draft.start_date < today {
        return Err(HolidayError::PastStart);
    }
    if draft.start_date > draft.end_date {
        return Err(HolidayError::InvertedRange);
    }
    Ok(())
}

pub fn check_create(input: &HolidayInput, today: NaiveDate) -> Result<HolidayDraft, HolidayError> {
    let draft = required_fields(input)?;
    check_dates(&draft, today)?;

    if is_weekend(draft.start_date) || is_weekend(draft.end_date) {
        return Err(HolidayError::Weekend);
    }

    Ok(draft)
}

pub fn check_update(
    existing: &Holiday,
    input: &HolidayInput,
    today: NaiveDate,
) -> Result<HolidayDraft, HolidayError> {
    if existing.end_date < today {
        return Err(HolidayError::PastHoliday);
    }

    let draft = required_fields(input)?;
    check_dates(&draft, today)?;
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn input(start: &str, end: &str) -> HolidayInput {
        HolidayInput {
            name: Some("Founders Day".into()),
            start_date: Some(d(start)),
            end_date: Some(d(end)),
            reason: Some("Office closed".into()),
        }
    }

    fn existing(start: &str, end: &str) -> Holiday {
        Holiday {
            id: 5,
            name: "Old".into(),
            start_date: d(start),
            end_date: d(end),
            reason: "r".into(),
            created_at: None,
            updated_at: None,
        }
    }

    const TODAY: &str = "2024-03-04"; // Monday

    #[test]
    fn next_saturday_is_rejected() {
        let err = check_create(&input("2024-03-09", "2024-03-09"), d(TODAY)).unwrap_err();
        assert_eq!(err.to_string(), "Weekends are already holidays");
    }

    #[test]
    fn endpoint_on_sunday_is_rejected() {
        assert_eq!(
            check_create(&input("2024-03-08", "2024-03-10"), d(TODAY)),
            Err(HolidayError::Weekend)
        );
    }

    #[test]
    fn range_spanning_weekend_with_weekday_ends_is_fine() {
        assert!(check_create(&input("2024-03-08", "2024-03-11"), d(TODAY)).is_ok());
    }

    #[test]
    fn today_allowed_past_rejected() {
        assert!(check_create(&input(TODAY, TODAY), d(TODAY)).is_ok());
        assert_eq!(
            check_create(&input("2024-03-01", "2024-03-05"), d(TODAY)),
            Err(HolidayError::PastStart)
        );
    }

    #[test]
    fn missing_and_inverted() {
        let mut blank = input("2024-03-05", "2024-03-05");
        blank.reason = None;
        assert_eq!(check_create(&blank, d(TODAY)), Err(HolidayError::MissingFields));
        assert_eq!(
            check_create(&input("2024-03-06", "2024-03-05"), d(TODAY)),
            Err(HolidayError::InvertedRange)
        );
    }

    #[test]
    fn past_holidays_are_frozen() {
        let old = existing("2024-02-01", "2024-03-01");
        assert_eq!(
            check_update(&old, &input("2024-03-05", "2024-03-05"), d(TODAY)),
            Err(HolidayError::PastHoliday)
        );
    }

    #[test]
    fn update_uses_calendar_day_comparison() {
        let current = existing("2024-03-04", "2024-03-05");
        assert!(check_update(&current, &input(TODAY, "2024-03-05"), d(TODAY)).is_ok());
        assert_eq!(
            check_update(&current, &input("2024-03-03", "2024-03-05"), d(TODAY)),
            Err(HolidayError::PastStart)
        );
    }

    #[test]
    fn update_does_not_apply_weekend_rule() {
        let current = existing("2024-03-11", "2024-03-11");
        assert!(check_update(&current, &input("2024-03-09", "2024-03-11"), d(TODAY)).is_ok());
    }
}
