// Calendar weeks as shown by the week view: Monday through Sunday.

use chrono::{Datelike, Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    pub fn containing(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        Self {
            start: date - Days::new(offset),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the week (Sunday), inclusive.
    pub fn last_day(&self) -> NaiveDate {
        self.start + Days::new(6)
    }

    /// First day after the week, exclusive bound for range checks.
    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(7)
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.start + Days::new(i as u64))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end()
    }

    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Days::new(7),
        }
    }

    pub fn next(&self) -> Self {
        Self { start: self.end() }
    }

    /// Heading text, e.g. `Mar 4 - Mar 10, 2024`.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %-d"),
            self.last_day().format("%b %-d, %Y")
        )
    }
}
