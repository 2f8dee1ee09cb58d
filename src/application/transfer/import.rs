// Import of exported (or hand written) JSON files.
//
// Purpose
// - Turn a set of JSON files into projects, hotels and time entries on the backend.
//
// Responsibilities
// - Split each file into batches and suggest a record kind for each one.
//   Nothing is written until every batch has a confirmed kind.
// - Records carrying `hours_worked` are always time entries, whatever the file says.
// - Upsert projects and hotels by trimmed, case-insensitive name.
// - Skip time entries that already exist with the same date, project, hours,
//   travel and hotel. Create projects that entries refer to but that do not exist yet.
//
// Testing guidance
// - Plan building is pure; `run` is exercised against `InMemoryBackend`.

use crate::application::errors::TransferError;
use crate::application::facades::api::TimesheetApi;
use crate::application::query::Query;
use crate::application::transfer::kind::RecordKind;
use crate::core::entities::date::parse_calendar_date;
use crate::core::entities::hotel::{Hotel, HotelPayload};
use crate::core::entities::id::Id;
use crate::core::entities::project::{Project, ProjectPayload};
use crate::core::entities::time_entry::TimeEntryPayload;
use chrono::NaiveDate;
use serde_json::{Map, Value as Json};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// A file picked for import.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// A run of records from one file that will be imported as one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub source: String,
    pub records: Vec<Map<String, Json>>,
    pub suggested: Option<RecordKind>,
    pub assigned: Option<RecordKind>,
    /// Set when the records carry `hours_worked`; such a batch can only be time entries.
    pub time_entries_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub projects_created: usize,
    pub projects_updated: usize,
    pub hotels_created: usize,
    pub hotels_updated: usize,
    pub entries_created: usize,
    pub entries_skipped: usize,
    /// Records without the name or date they need.
    pub records_ignored: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    batches: Vec<ImportBatch>,
}

impl ImportPlan {
    pub fn from_files(files: &[SourceFile]) -> Result<Self, TransferError> {
        let mut batches = Vec::new();
        for file in files {
            let json: Json =
                serde_json::from_str(&file.text).map_err(|e| TransferError::InvalidJson {
                    file: file.name.clone(),
                    reason: e.to_string(),
                })?;
            batches.extend(classify(&file.name, json));
        }
        debug!(files = files.len(), batches = batches.len(), "import plan built");
        Ok(Self { batches })
    }

    pub fn batches(&self) -> &[ImportBatch] {
        &self.batches
    }

    /// Accepts every suggestion; returns how many batches still need a kind.
    pub fn confirm_suggested(&mut self) -> usize {
        for batch in &mut self.batches {
            if batch.assigned.is_none() {
                batch.assigned = batch.suggested;
            }
        }
        self.unassigned()
    }

    pub fn assign(&mut self, index: usize, kind: RecordKind) -> Result<(), TransferError> {
        let batch = self
            .batches
            .get_mut(index)
            .ok_or(TransferError::UnknownBatch(index))?;
        if batch.time_entries_only && kind != RecordKind::TimeEntry {
            return Err(TransferError::TimeEntriesOnly {
                index,
                requested: kind.as_str(),
            });
        }
        batch.assigned = Some(kind);
        Ok(())
    }

    /// Drops a batch the user does not want imported.
    pub fn discard(&mut self, index: usize) -> Result<ImportBatch, TransferError> {
        if index >= self.batches.len() {
            return Err(TransferError::UnknownBatch(index));
        }
        Ok(self.batches.remove(index))
    }

    pub fn unassigned(&self) -> usize {
        self.batches.iter().filter(|b| b.assigned.is_none()).count()
    }

    fn records_of(&self, kind: RecordKind) -> Vec<&Map<String, Json>> {
        self.batches
            .iter()
            .filter(|b| b.assigned == Some(kind))
            .flat_map(|b| b.records.iter())
            .collect()
    }

    pub async fn run(&self, api: &TimesheetApi) -> Result<ImportReport, TransferError> {
        if let Some((index, batch)) = self
            .batches
            .iter()
            .enumerate()
            .find(|(_, b)| b.assigned.is_none())
        {
            return Err(TransferError::Unassigned {
                index,
                file: batch.source.clone(),
            });
        }

        let user = api.auth.me().await?;
        let owned = Query::new().with("created_by", user.email.as_str());
        let mut report = ImportReport::default();

        let mut projects = by_name(api.projects.filter(owned.clone(), Some("-created_date")).await?, |p: &Project| &p.name);
        for record in self.records_of(RecordKind::Project) {
            let Some(payload) = project_payload(record) else {
                report.records_ignored += 1;
                continue;
            };
            let key = name_key(&payload.name);
            let saved = match projects.get(&key) {
                Some(existing) => {
                    report.projects_updated += 1;
                    api.projects.update(existing.id, &payload).await?
                }
                None => {
                    report.projects_created += 1;
                    api.projects.create(&payload).await?
                }
            };
            projects.insert(key, saved);
        }

        let mut hotels = by_name(api.hotels.filter(owned.clone(), Some("name")).await?, |h: &Hotel| &h.name);
        for record in self.records_of(RecordKind::Hotel) {
            let Some(payload) = hotel_payload(record) else {
                report.records_ignored += 1;
                continue;
            };
            let key = name_key(&payload.name);
            let saved = match hotels.get(&key) {
                Some(existing) => {
                    report.hotels_updated += 1;
                    api.hotels.update(existing.id, &payload).await?
                }
                None => {
                    report.hotels_created += 1;
                    api.hotels.create(&payload).await?
                }
            };
            hotels.insert(key, saved);
        }

        let entries: Vec<ImportedEntry> = self
            .records_of(RecordKind::TimeEntry)
            .into_iter()
            .filter_map(|record| {
                let entry = ImportedEntry::read(record);
                if entry.is_none() {
                    report.records_ignored += 1;
                }
                entry
            })
            .collect();

        let mut seen: HashSet<EntryKey> = HashSet::new();
        if let (Some(from), Some(to)) = (
            entries.iter().map(|e| e.date).min(),
            entries.iter().map(|e| e.date).max(),
        ) {
            let existing = api
                .time_entries
                .filter(
                    owned
                        .with("from", from.to_string())
                        .with("to", to.to_string()),
                    None,
                )
                .await?;
            seen.extend(existing.iter().filter_map(|e| {
                Some(EntryKey::new(e.date, e.project_id?, e.hours_worked, e.travel_time, e.hotel_id))
            }));
        }

        for entry in entries {
            let project_key = name_key(&entry.project_name);
            let project_id = match projects.get(&project_key) {
                Some(project) => project.id,
                None => {
                    let created = api
                        .projects
                        .create(&ProjectPayload {
                            name: entry.project_name.clone(),
                            client: String::new(),
                            contract: String::new(),
                            default_hours_worked: 0.0,
                            default_travel_time: 0.0,
                        })
                        .await?;
                    report.projects_created += 1;
                    let id = created.id;
                    projects.insert(project_key, created);
                    id
                }
            };
            let hotel_id = entry
                .hotel_name
                .as_deref()
                .and_then(|name| hotels.get(&name_key(name)))
                .map(|h| h.id);

            let key = EntryKey::new(entry.date, project_id, entry.hours_worked, entry.travel_time, hotel_id);
            if !seen.insert(key) {
                report.entries_skipped += 1;
                continue;
            }
            api.time_entries
                .create(&TimeEntryPayload {
                    date: entry.date,
                    project_id,
                    project_name: entry.project_name,
                    hours_worked: entry.hours_worked,
                    travel_time: entry.travel_time,
                    hotel_id,
                    hotel_name: entry.hotel_name,
                    notes: entry.notes,
                })
                .await?;
            report.entries_created += 1;
        }

        info!(?report, "import finished");
        Ok(report)
    }
}

/// Splits one parsed file into batches with suggested kinds.
fn classify(file_name: &str, json: Json) -> Vec<ImportBatch> {
    match json {
        Json::Array(items) => split_batch(file_name, objects(items), suggest_from_name(file_name)),
        Json::Object(mut fields) => {
            let keyed = [
                ("projects", RecordKind::Project),
                ("hotels", RecordKind::Hotel),
                ("timeEntries", RecordKind::TimeEntry),
                ("time_entries", RecordKind::TimeEntry),
            ];
            if keyed.iter().any(|(key, _)| fields.contains_key(*key)) {
                keyed
                    .into_iter()
                    .filter_map(|(key, kind)| match fields.remove(key) {
                        Some(Json::Array(items)) => Some(split_batch(file_name, objects(items), Some(kind))),
                        _ => None,
                    })
                    .flatten()
                    .collect()
            } else {
                split_batch(file_name, vec![fields], suggest_from_name(file_name))
            }
        }
        _ => Vec::new(),
    }
}

/// Records with `hours_worked` go into their own time-entry batch.
fn split_batch(
    file_name: &str,
    records: Vec<Map<String, Json>>,
    from_name: Option<RecordKind>,
) -> Vec<ImportBatch> {
    let (timed, rest): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| r.contains_key("hours_worked"));

    let mut batches = Vec::new();
    if !timed.is_empty() {
        batches.push(ImportBatch {
            source: file_name.to_string(),
            records: timed,
            suggested: Some(RecordKind::TimeEntry),
            assigned: None,
            time_entries_only: true,
        });
    }
    if !rest.is_empty() {
        let suggested = from_name.or_else(|| suggest_from_keys(&rest[0]));
        batches.push(ImportBatch {
            source: file_name.to_string(),
            records: rest,
            suggested,
            assigned: None,
            time_entries_only: false,
        });
    }
    batches
}

fn objects(items: Vec<Json>) -> Vec<Map<String, Json>> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Json::Object(fields) => Some(fields),
            _ => None,
        })
        .collect()
}

fn suggest_from_name(file_name: &str) -> Option<RecordKind> {
    let name = file_name.to_lowercase();
    if name.contains("project") {
        Some(RecordKind::Project)
    } else if name.contains("hotel") {
        Some(RecordKind::Hotel)
    } else if ["timeentry", "time-entry", "time_entry", "entries"]
        .iter()
        .any(|hint| name.contains(hint))
    {
        Some(RecordKind::TimeEntry)
    } else {
        None
    }
}

fn suggest_from_keys(record: &Map<String, Json>) -> Option<RecordKind> {
    let has = |key: &str| record.contains_key(key);
    if has("project_name") && has("date") {
        Some(RecordKind::TimeEntry)
    } else if has("address") || has("hotel_name") {
        Some(RecordKind::Hotel)
    } else if has("client") || has("default_hours_worked") || has("project_name") {
        Some(RecordKind::Project)
    } else {
        None
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn by_name<T>(items: Vec<T>, name: impl Fn(&T) -> &String) -> HashMap<String, T> {
    items
        .into_iter()
        .map(|item| (name_key(name(&item)), item))
        .collect()
}

fn text(record: &Map<String, Json>, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Json::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Json::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn number(record: &Map<String, Json>, key: &str) -> f64 {
    match record.get(key) {
        Some(Json::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Json::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn project_payload(record: &Map<String, Json>) -> Option<ProjectPayload> {
    let name = text(record, "project_name").or_else(|| text(record, "name"))?;
    Some(ProjectPayload {
        name,
        client: text(record, "client").unwrap_or_default(),
        contract: text(record, "contract").unwrap_or_default(),
        default_hours_worked: number(record, "default_hours_worked"),
        default_travel_time: number(record, "default_travel_time"),
    })
}

fn hotel_payload(record: &Map<String, Json>) -> Option<HotelPayload> {
    let name = text(record, "hotel_name").or_else(|| text(record, "name"))?;
    Some(HotelPayload {
        name,
        address: text(record, "address").unwrap_or_default(),
    })
}

struct ImportedEntry {
    date: NaiveDate,
    project_name: String,
    hours_worked: f64,
    travel_time: f64,
    hotel_name: Option<String>,
    notes: Option<String>,
}

impl ImportedEntry {
    fn read(record: &Map<String, Json>) -> Option<Self> {
        let date = text(record, "date").as_deref().and_then(parse_calendar_date)?;
        let project_name = text(record, "project_name")?;
        Some(Self {
            date,
            project_name,
            hours_worked: number(record, "hours_worked"),
            travel_time: number(record, "travel_time"),
            hotel_name: text(record, "hotel_name"),
            notes: text(record, "notes"),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EntryKey {
    date: NaiveDate,
    project_id: Id,
    hours_worked: u64,
    travel_time: u64,
    hotel_id: Id,
}

impl EntryKey {
    fn new(date: NaiveDate, project_id: Id, hours: f64, travel: f64, hotel_id: Option<Id>) -> Self {
        Self {
            date,
            project_id,
            hours_worked: hours.to_bits(),
            travel_time: travel.to_bits(),
            hotel_id: hotel_id.unwrap_or(0),
        }
    }
}
