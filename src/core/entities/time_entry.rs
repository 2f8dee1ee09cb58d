use crate::core::entities::amount::amount;
use crate::core::entities::date::calendar_date;
use crate::core::entities::id::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Id,
    #[serde(deserialize_with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub project_id: Option<Id>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "amount")]
    pub hours_worked: f64,
    #[serde(default, deserialize_with = "amount")]
    pub travel_time: f64,
    #[serde(default)]
    pub hotel_id: Option<Id>,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
}

impl TimeEntry {
    /// Work plus travel, the figure every total in the week view is built from.
    pub fn total_hours(&self) -> f64 {
        self.hours_worked + self.travel_time
    }
}

/// Full body of `POST /time-entries` and `PUT /time-entries/:id`.
///
/// Project and hotel names are denormalised into the entry so lists render
/// without a lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntryPayload {
    pub date: NaiveDate,
    pub project_id: Id,
    pub project_name: String,
    pub hours_worked: f64,
    pub travel_time: f64,
    pub hotel_id: Option<Id>,
    pub hotel_name: Option<String>,
    pub notes: Option<String>,
}
