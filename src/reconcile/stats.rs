use serde::Serialize;
use utoipa::ToSchema;

use super::classify::DayStatus;

/// Tallies for one user. `leave_days` is the displayed leave bucket and
/// folds failed-to-mark days in; `on_leave_days` is approved leave only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total_working_days: u32,
    pub present_days: u32,
    pub leave_days: u32,
    pub on_leave_days: u32,
    pub failed_to_mark: u32,
    pub attendance_percentage: u32,
}

impl AttendanceStats {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = DayStatus>,
    {
        let mut stats = Self::default();
        for status in statuses {
            match status {
                DayStatus::Present => stats.present_days += 1,
                DayStatus::OnLeave => stats.on_leave_days += 1,
                DayStatus::FailedToMark => stats.failed_to_mark += 1,
                DayStatus::Pending => continue,
            }
            stats.total_working_days += 1;
        }
        stats.leave_days = stats.on_leave_days + stats.failed_to_mark;
        stats.attendance_percentage = percentage(stats.present_days, stats.total_working_days);
        stats
    }
}

/// `round(part / whole * 100)`, halves rounded up, 0 for an empty whole.
pub fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (u64::from(part), u64::from(whole));
    ((200 * part + whole) / (2 * whole)) as u32
}

/// Highest and lowest attendance percentage. Ties go to the later entry,
/// so the result is stable for a fixed listing order.
pub fn best_and_worst<T, F>(items: &[T], percentage_of: F) -> Option<(&T, &T)>
where
    F: Fn(&T) -> u32,
{
    let first = items.first()?;
    let mut best = first;
    let mut worst = first;
    for item in &items[1..] {
        if percentage_of(item) >= percentage_of(best) {
            best = item;
        }
        if percentage_of(item) <= percentage_of(worst) {
            worst = item;
        }
    }
    Some((best, worst))
}
