// Export of the user's own records as a JSON or CSV download.
//
// Purpose
// - Flatten records into rows that open cleanly in a spreadsheet.
//
// Responsibilities
// - Stamp every row with the exporting user and the created/updated clock times.
// - Newest dates first for time entries, names Z to A for projects and hotels.
// - Refuse to produce an empty file.
//
// Boundaries
// - Writing the file is left to the caller; this module only returns its name and content.

use crate::application::errors::TransferError;
use crate::application::facades::api::TimesheetApi;
use crate::application::query::Query;
use crate::application::transfer::csv::{Row, to_csv};
use crate::application::transfer::kind::{ExportFormat, RecordKind};
use crate::core::entities::hotel::Hotel;
use crate::core::entities::project::Project;
use crate::core::entities::time_entry::TimeEntry;
use crate::core::entities::user::User;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Value as Json, json};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportRecords {
    TimeEntries(Vec<TimeEntry>),
    Projects(Vec<Project>),
    Hotels(Vec<Hotel>),
}

impl ExportRecords {
    pub fn kind(&self) -> RecordKind {
        match self {
            ExportRecords::TimeEntries(_) => RecordKind::TimeEntry,
            ExportRecords::Projects(_) => RecordKind::Project,
            ExportRecords::Hotels(_) => RecordKind::Hotel,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ExportRecords::TimeEntries(items) => items.len(),
            ExportRecords::Projects(items) => items.len(),
            ExportRecords::Hotels(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn export(
    records: ExportRecords,
    format: ExportFormat,
    user: &User,
    today: NaiveDate,
) -> Result<ExportFile, TransferError> {
    let kind = records.kind();
    if records.is_empty() {
        return Err(TransferError::NothingToExport(kind.as_str()));
    }

    let rows = to_rows(records, user);
    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&rows)?,
        ExportFormat::Csv => to_csv(&rows),
    };

    Ok(ExportFile {
        file_name: format!(
            "{}-export-{}.{}",
            kind.as_str(),
            today.format("%Y-%m-%d"),
            format.extension()
        ),
        content_type: format.content_type(),
        content,
    })
}

/// Fetches every record of `kind` the signed-in user created, then exports it.
pub async fn export_owned(
    api: &TimesheetApi,
    kind: RecordKind,
    format: ExportFormat,
    today: NaiveDate,
) -> Result<ExportFile, TransferError> {
    let user = api.auth.me().await?;
    let owned = Query::new().with("created_by", user.email.as_str());
    let records = match kind {
        RecordKind::TimeEntry => {
            ExportRecords::TimeEntries(api.time_entries.filter(owned, Some("date")).await?)
        }
        RecordKind::Project => ExportRecords::Projects(api.projects.filter(owned, Some("name")).await?),
        RecordKind::Hotel => ExportRecords::Hotels(api.hotels.filter(owned, Some("name")).await?),
    };
    let count = records.len();
    let file = export(records, format, &user, today)?;
    info!(%kind, count, file = %file.file_name, "export ready");
    Ok(file)
}

fn to_rows(records: ExportRecords, user: &User) -> Vec<Row> {
    match records {
        ExportRecords::TimeEntries(mut entries) => {
            entries.sort_by(|a, b| b.date.cmp(&a.date));
            entries
                .iter()
                .map(|e| {
                    let mut row = base_row(user, e.created_date.as_deref(), e.updated_date.as_deref());
                    row.insert("date".into(), json!(e.date.format("%Y-%m-%d").to_string()));
                    row.insert("day_of_week".into(), json!(e.date.format("%A").to_string()));
                    row.insert("project_name".into(), json!(e.project_name));
                    row.insert("hours_worked".into(), number(e.hours_worked));
                    row.insert("travel_time".into(), number(e.travel_time));
                    row.insert("hotel_name".into(), json!(e.hotel_name.clone().unwrap_or_default()));
                    row
                })
                .collect()
        }
        ExportRecords::Projects(mut projects) => {
            projects.sort_by(|a, b| by_name_descending(&a.name, &b.name));
            projects
                .iter()
                .map(|p| {
                    let mut row = base_row(user, p.created_date.as_deref(), p.updated_date.as_deref());
                    row.insert("project_name".into(), json!(p.name));
                    row.insert("client".into(), json!(p.client));
                    row.insert("contract".into(), json!(p.contract.clone().unwrap_or_default()));
                    row.insert("default_hours_worked".into(), number(p.default_hours_worked));
                    row.insert("default_travel_time".into(), number(p.default_travel_time));
                    row
                })
                .collect()
        }
        ExportRecords::Hotels(mut hotels) => {
            hotels.sort_by(|a, b| by_name_descending(&a.name, &b.name));
            hotels
                .iter()
                .map(|h| {
                    let mut row = base_row(user, h.created_date.as_deref(), h.updated_date.as_deref());
                    row.insert("hotel_name".into(), json!(h.name));
                    row.insert("address".into(), json!(h.address.clone().unwrap_or_default()));
                    row
                })
                .collect()
        }
    }
}

fn base_row(user: &User, created: Option<&str>, updated: Option<&str>) -> Row {
    let mut row = Row::new();
    row.insert("user_name".into(), json!(user.full_name));
    row.insert("user_email".into(), json!(user.email));
    row.insert("created_at_time".into(), json!(clock_time(created)));
    row.insert("updated_at_time".into(), json!(clock_time(updated)));
    row
}

fn by_name_descending(a: &str, b: &str) -> std::cmp::Ordering {
    b.to_lowercase().cmp(&a.to_lowercase())
}

/// `HH:MM:SS` of a backend timestamp, or an empty string.
fn clock_time(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return String::new();
    };
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return stamp.format("%H:%M:%S").to_string();
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|stamp| stamp.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Whole numbers are written without a trailing `.0`.
fn number(value: f64) -> Json {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        json!(value as i64)
    } else {
        json!(value)
    }
}
