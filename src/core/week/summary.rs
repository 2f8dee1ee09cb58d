// Aggregates over already-fetched time entries.
//
// Purpose
// - Day and week totals for the week grid.
// - The weekly summary card, including a flat-rate wage estimate.
//
// Boundaries
// - The estimate is indicative only. Real payroll figures come from the backend
//   (`/earnings/for-week`).

use crate::core::entities::time_entry::TimeEntry;
use crate::core::week::calendar::Week;
use chrono::NaiveDate;

/// Flat deduction rate used by the summary card estimate.
pub const ESTIMATED_TAX_RATE: f64 = 0.29;

pub fn entries_in_week<'a>(entries: &'a [TimeEntry], week: &Week) -> Vec<&'a TimeEntry> {
    entries.iter().filter(|e| week.contains(e.date)).collect()
}

pub fn entries_for_day(entries: &[TimeEntry], day: NaiveDate) -> Vec<&TimeEntry> {
    entries.iter().filter(|e| e.date == day).collect()
}

pub fn total_hours<'a>(entries: impl IntoIterator<Item = &'a TimeEntry>) -> f64 {
    entries.into_iter().map(TimeEntry::total_hours).sum()
}

pub fn day_total(entries: &[TimeEntry], day: NaiveDate) -> f64 {
    total_hours(entries_for_day(entries, day))
}

pub fn week_total(entries: &[TimeEntry], week: &Week) -> f64 {
    total_hours(entries_in_week(entries, week))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WageEstimate {
    pub hourly_wage: f64,
    pub gross: f64,
    pub tax: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekSummary {
    pub hours_worked: f64,
    pub travel_hours: f64,
    pub total_hours: f64,
    /// Present only when the user has a wage on their profile.
    pub wage: Option<WageEstimate>,
}

impl WeekSummary {
    pub fn compute(entries: &[TimeEntry], week: &Week, hourly_wage: f64) -> Self {
        let in_week = entries_in_week(entries, week);
        let hours_worked: f64 = in_week.iter().map(|e| e.hours_worked).sum();
        let travel_hours: f64 = in_week.iter().map(|e| e.travel_time).sum();
        let total_hours = hours_worked + travel_hours;

        let wage = (hourly_wage > 0.0).then(|| {
            let gross = total_hours * hourly_wage;
            let tax = gross * ESTIMATED_TAX_RATE;
            WageEstimate {
                hourly_wage,
                gross,
                tax,
                net: gross - tax,
            }
        });

        Self {
            hours_worked,
            travel_hours,
            total_hours,
            wage,
        }
    }
}
