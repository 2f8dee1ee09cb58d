// The main timesheet page: one week of entries, day by day.
//
// Purpose
// - Hold everything the week grid, the summary card and the entry modal need.
//
// Responsibilities
// - Fetch the signed-in user, then their projects, entries and hotels concurrently.
// - Skip a refresh while another one is still running.
// - Re-fetch everything after each save or delete. Lists are never patched locally.
//   A mutation waits for a running refresh and then fetches again, so the lists
//   never predate the write.
//
// Boundaries
// - Entries are fetched for all weeks at once; navigation is local and does not hit the backend.

use crate::application::errors::PageError;
use crate::application::facades::api::TimesheetApi;
use crate::application::forms::time_entry_form::TimeEntryForm;
use crate::application::query::Query;
use crate::core::entities::hotel::Hotel;
use crate::core::entities::id::Id;
use crate::core::entities::project::Project;
use crate::core::entities::time_entry::TimeEntry;
use crate::core::entities::user::User;
use crate::core::week::calendar::Week;
use crate::core::week::project_ordering::order_projects_by_last_use;
use crate::core::week::summary::{WeekSummary, day_total, entries_for_day, week_total};
use chrono::{Days, NaiveDate};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    /// Another refresh was already running.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub date: NaiveDate,
    pub entries: Vec<TimeEntry>,
    pub total_hours: f64,
}

/// What the page renders for the selected week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekView {
    pub week: Week,
    pub label: String,
    pub days: Vec<DayView>,
    pub total_hours: f64,
    pub summary: WeekSummary,
    /// Most recently used first, for the entry form picker.
    pub projects: Vec<Project>,
    pub hotels: Vec<Hotel>,
}

#[derive(Debug)]
struct WeekState {
    current_date: NaiveDate,
    user: Option<User>,
    projects: Vec<Project>,
    entries: Vec<TimeEntry>,
    hotels: Vec<Hotel>,
}

pub struct WeekViewPage {
    api: TimesheetApi,
    today: NaiveDate,
    state: RwLock<WeekState>,
    /// Held for the whole of a fetch.
    fetching: Mutex<()>,
}

impl WeekViewPage {
    pub fn new(api: TimesheetApi, today: NaiveDate) -> Self {
        Self {
            api,
            today,
            state: RwLock::new(WeekState {
                current_date: today,
                user: None,
                projects: Vec::new(),
                entries: Vec::new(),
                hotels: Vec::new(),
            }),
            fetching: Mutex::new(()),
        }
    }

    pub async fn current_date(&self) -> NaiveDate {
        self.state.read().await.current_date
    }

    pub async fn week(&self) -> Week {
        Week::containing(self.current_date().await)
    }

    pub async fn previous_week(&self) {
        self.shift(|date| date.checked_sub_days(Days::new(7))).await;
    }

    pub async fn next_week(&self) {
        self.shift(|date| date.checked_add_days(Days::new(7))).await;
    }

    pub async fn go_to(&self, date: NaiveDate) {
        self.state.write().await.current_date = date;
    }

    pub async fn back_to_today(&self) {
        self.go_to(self.today).await;
    }

    async fn shift(&self, step: impl FnOnce(NaiveDate) -> Option<NaiveDate>) {
        let mut state = self.state.write().await;
        if let Some(next) = step(state.current_date) {
            state.current_date = next;
        }
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn entries(&self) -> Vec<TimeEntry> {
        self.state.read().await.entries.clone()
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, PageError> {
        let Ok(_fetching) = self.fetching.try_lock() else {
            debug!("week view refresh already in flight, skipping");
            return Ok(RefreshOutcome::Skipped);
        };
        self.fetch_all().await?;
        Ok(RefreshOutcome::Refreshed)
    }

    /// Refetch after a write. Never skipped: waits out a running refresh,
    /// whose responses may have been read before the write landed.
    async fn reload(&self) -> Result<(), PageError> {
        let _fetching = self.fetching.lock().await;
        self.fetch_all().await
    }

    async fn fetch_all(&self) -> Result<(), PageError> {
        let user = self.api.auth.me().await?;
        let owned = Query::new().with("created_by", user.email.as_str());

        let (projects, entries, hotels) = tokio::try_join!(
            self.api.projects.filter(owned.clone(), None),
            self.api.time_entries.filter(owned.clone(), None),
            self.api.hotels.filter(owned, Some("name")),
        )?;
        debug!(
            projects = projects.len(),
            entries = entries.len(),
            hotels = hotels.len(),
            "week view loaded"
        );

        let mut state = self.state.write().await;
        state.projects = order_projects_by_last_use(&projects, &entries);
        state.entries = entries;
        state.hotels = hotels;
        state.user = Some(user);
        Ok(())
    }

    pub async fn view(&self) -> WeekView {
        let state = self.state.read().await;
        let week = Week::containing(state.current_date);
        let days = week
            .days()
            .into_iter()
            .map(|date| DayView {
                date,
                entries: entries_for_day(&state.entries, date)
                    .into_iter()
                    .cloned()
                    .collect(),
                total_hours: day_total(&state.entries, date),
            })
            .collect();
        let hourly_wage = state.user.as_ref().map(User::hourly_wage).unwrap_or(0.0);

        WeekView {
            week,
            label: week.label(),
            days,
            total_hours: week_total(&state.entries, &week),
            summary: WeekSummary::compute(&state.entries, &week, hourly_wage),
            projects: state.projects.clone(),
            hotels: state.hotels.clone(),
        }
    }

    pub fn new_entry_form(&self, date: NaiveDate) -> TimeEntryForm {
        TimeEntryForm::create(date)
    }

    pub async fn edit_entry_form(&self, id: Id) -> Option<TimeEntryForm> {
        self.state
            .read()
            .await
            .entries
            .iter()
            .find(|e| e.id == id)
            .map(TimeEntryForm::edit)
    }

    /// Saves the form against the loaded projects and hotels, then re-fetches.
    pub async fn save_entry(&self, form: &mut TimeEntryForm) -> Result<TimeEntry, PageError> {
        let (projects, hotels) = {
            let state = self.state.read().await;
            (state.projects.clone(), state.hotels.clone())
        };
        let saved = form
            .submit(&self.api.time_entries, &projects, &hotels)
            .await?;
        info!(id = saved.id, date = %saved.date, "time entry saved");
        self.reload().await?;
        Ok(saved)
    }

    pub async fn delete_entry(&self, id: Id) -> Result<(), PageError> {
        self.api.time_entries.remove(id).await?;
        info!(id, "time entry deleted");
        self.reload().await?;
        Ok(())
    }
}
