use crate::core::entities::date::optional_calendar_date;
use crate::core::entities::id::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata of an uploaded receipt image. The binary is fetched separately
/// from `/receipts/:id/file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Id,
    #[serde(default, alias = "receipt_date", deserialize_with = "optional_calendar_date")]
    pub entry_date: Option<NaiveDate>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub time_entry_id: Option<Id>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Receipt {
    pub fn label(&self) -> String {
        self.original_filename
            .clone()
            .unwrap_or_else(|| format!("receipt-{}", self.id))
    }
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).map(str::to_string);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }
}

fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "heic" => Some("image/heic"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

#[cfg(test)]
mod receipt_tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn it_should_accept_receipt_date_as_entry_date() {
        let receipt: Receipt = serde_json::from_value(json!({
            "id": 4,
            "receipt_date": "2024-02-01T09:00:00"
        }))
        .unwrap();
        assert_eq!(receipt.entry_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(receipt.label(), "receipt-4");
    }

    #[rstest]
    #[case("scan.JPG", Some("image/jpeg"))]
    #[case("payslip.pdf", Some("application/pdf"))]
    #[case("notes", None)]
    fn it_should_guess_upload_content_types(#[case] name: &str, #[case] expected: Option<&str>) {
        let file = UploadFile::new(name, vec![1, 2, 3]);
        assert_eq!(file.content_type.as_deref(), expected);
    }
}
