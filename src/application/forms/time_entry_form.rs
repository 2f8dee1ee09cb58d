// The add/edit time entry modal, as state plus validation.
//
// Responsibilities
// - Apply a project's default hours and travel when one is picked.
// - Validate the typed values and build the full payload, with project and
//   hotel names copied in. A hotel is only kept when there is travel time.
//
// Boundaries
// - The caller re-fetches its lists after a successful submit.

use crate::application::errors::{FormError, PageError};
use crate::application::facades::entity::TimeEntriesFacade;
use crate::application::forms::status::{
    FormMode, FormStatus, format_number, non_negative, optional_text,
};
use crate::core::entities::hotel::Hotel;
use crate::core::entities::id::Id;
use crate::core::entities::project::Project;
use crate::core::entities::time_entry::{TimeEntry, TimeEntryPayload};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntryForm {
    pub mode: FormMode,
    pub date: NaiveDate,
    pub project_id: Option<Id>,
    pub hotel_id: Option<Id>,
    pub hours_worked: String,
    pub travel_time: String,
    pub notes: String,
    pub status: FormStatus,
}

impl TimeEntryForm {
    pub fn create(date: NaiveDate) -> Self {
        Self {
            mode: FormMode::Create,
            date,
            project_id: None,
            hotel_id: None,
            hours_worked: "0".into(),
            travel_time: "0".into(),
            notes: String::new(),
            status: FormStatus::Idle,
        }
    }

    pub fn edit(entry: &TimeEntry) -> Self {
        Self {
            mode: FormMode::Edit(entry.id),
            date: entry.date,
            project_id: entry.project_id,
            hotel_id: entry.hotel_id,
            hours_worked: format_number(entry.hours_worked),
            travel_time: format_number(entry.travel_time),
            notes: entry.notes.clone().unwrap_or_default(),
            status: FormStatus::Idle,
        }
    }

    /// Picks a project and overwrites hours and travel with its defaults.
    pub fn select_project(&mut self, project: &Project) {
        self.project_id = Some(project.id);
        self.hours_worked = format_number(project.default_hours_worked);
        self.travel_time = format_number(project.default_travel_time);
    }

    pub fn select_hotel(&mut self, hotel_id: Option<Id>) {
        self.hotel_id = hotel_id;
    }

    pub fn to_payload(
        &self,
        projects: &[Project],
        hotels: &[Hotel],
    ) -> Result<TimeEntryPayload, FormError> {
        let project_id = self.project_id.ok_or(FormError::Required("project"))?;
        let project = projects
            .iter()
            .find(|p| p.id == project_id)
            .ok_or(FormError::UnknownReference {
                kind: "project",
                id: project_id,
            })?;

        let hours_worked = non_negative("hours worked", &self.hours_worked)?;
        let travel_time = non_negative("travel time", &self.travel_time)?;

        let hotel = match self.hotel_id.filter(|_| travel_time > 0.0) {
            Some(hotel_id) => Some(hotels.iter().find(|h| h.id == hotel_id).ok_or(
                FormError::UnknownReference {
                    kind: "hotel",
                    id: hotel_id,
                },
            )?),
            None => None,
        };

        Ok(TimeEntryPayload {
            date: self.date,
            project_id: project.id,
            project_name: project.name.clone(),
            hours_worked,
            travel_time,
            hotel_id: hotel.map(|h| h.id),
            hotel_name: hotel.map(|h| h.name.clone()),
            notes: optional_text(&self.notes),
        })
    }

    pub async fn submit(
        &mut self,
        entries: &TimeEntriesFacade,
        projects: &[Project],
        hotels: &[Hotel],
    ) -> Result<TimeEntry, PageError> {
        let payload = self.to_payload(projects, hotels)?;
        self.status = FormStatus::Saving;
        let saved = match self.mode {
            FormMode::Create => entries.create(&payload).await,
            FormMode::Edit(id) => entries.update(id, &payload).await,
        };
        self.status = FormStatus::Idle;
        Ok(saved?)
    }
}
