// Receipt images: multipart upload, listing by date range, and file download.

use crate::application::errors::ApiError;
use crate::application::http_client::ApiClient;
use crate::application::query::Query;
use crate::core::entities::id::Id;
use crate::core::entities::receipt::{Receipt, UploadFile};
use crate::core::ports::FormPart;
use chrono::NaiveDate;
use reqwest::Url;
use serde_json::Value as Json;
use tracing::debug;

/// Inclusive date range sent as `start` / `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("start", self.start.map(|d| d.to_string()))
            .with_opt("end", self.end.map(|d| d.to_string()))
    }
}

#[derive(Clone)]
pub struct ReceiptsFacade {
    client: ApiClient,
}

impl ReceiptsFacade {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Uploads one or more images for a day, optionally linked to a time entry.
    /// The response shape varies between backend versions and is returned as is.
    pub async fn upload(
        &self,
        entry_date: NaiveDate,
        time_entry_id: Option<Id>,
        files: Vec<UploadFile>,
    ) -> Result<Json, ApiError> {
        let mut parts = vec![FormPart::Text {
            name: "entry_date".into(),
            value: entry_date.to_string(),
        }];
        if let Some(id) = time_entry_id {
            parts.push(FormPart::Text {
                name: "time_entry_id".into(),
                value: id.to_string(),
            });
        }
        debug!(%entry_date, files = files.len(), "uploading receipts");
        parts.extend(files.into_iter().map(|file| FormPart::File {
            name: "files".into(),
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
        }));
        self.client.post_multipart("/receipts/upload", parts).await
    }

    pub async fn list(&self, range: DateRange) -> Result<Vec<Receipt>, ApiError> {
        self.client.get_json("/receipts", &range.to_query()).await
    }

    pub async fn list_all(&self) -> Result<Vec<Receipt>, ApiError> {
        self.client.get_json("/receipts/all", &Query::new()).await
    }

    pub async fn file(&self, id: Id) -> Result<Vec<u8>, ApiError> {
        self.client.get_bytes(&format!("/receipts/{id}/file")).await
    }

    pub fn file_url(&self, id: Id) -> Result<Url, ApiError> {
        self.client
            .build_url(&format!("/receipts/{id}/file"), &Query::new())
    }

    pub async fn remove(&self, id: Id) -> Result<(), ApiError> {
        self.client.delete(&format!("/receipts/{id}")).await
    }
}
