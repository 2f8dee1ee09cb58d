use crate::application::errors::TransferError;
use std::fmt;
use std::str::FromStr;

/// The three record collections that can be exported and imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    TimeEntry,
    Project,
    Hotel,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::TimeEntry, RecordKind::Project, RecordKind::Hotel];

    /// Used in export file names, e.g. `timeentry-export-2024-03-06.csv`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::TimeEntry => "timeentry",
            RecordKind::Project => "project",
            RecordKind::Hotel => "hotel",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timeentry" | "time-entry" | "time-entries" | "entry" | "entries" => Ok(RecordKind::TimeEntry),
            "project" | "projects" => Ok(RecordKind::Project),
            "hotel" | "hotels" => Ok(RecordKind::Hotel),
            other => Err(TransferError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(TransferError::UnknownFormat(other.to_string())),
        }
    }
}
