use crate::core::ports::{SessionError, TransportError};
use serde_json::Value as Json;
use thiserror::Error;

/// Best-effort copy of a failed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Empty,
    Json(Json),
    Text(String),
}

impl ErrorBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return ErrorBody::Empty;
        }
        match serde_json::from_slice::<Json>(bytes) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// `detail` from a JSON body, otherwise the raw text.
    pub fn message(&self) -> Option<String> {
        match self {
            ErrorBody::Empty => None,
            ErrorBody::Json(value) => match value.get("detail") {
                Some(Json::String(detail)) => Some(detail.clone()),
                Some(detail) if !detail.is_null() => Some(detail.to_string()),
                _ => Some(value.to_string()),
            },
            ErrorBody::Text(text) if text.trim().is_empty() => None,
            ErrorBody::Text(text) => Some(text.clone()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: ErrorBody,
    },

    #[error(transparent)]
    Network(#[from] TransportError),

    #[error("unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("invalid url for {path}: {reason}")]
    Url { path: String, reason: String },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("unknown {kind} {id}")]
    UnknownReference { kind: &'static str, id: i64 },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("the page has not been loaded yet")]
    NotLoaded,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("no {0} data to export")]
    NothingToExport(&'static str),

    #[error("invalid JSON in {file}: {reason}")]
    InvalidJson { file: String, reason: String },

    #[error("batch {index} from {file} has no record kind; assign one before importing")]
    Unassigned { index: usize, file: String },

    #[error("batch {index} holds time entries and cannot be imported as {requested}")]
    TimeEntriesOnly { index: usize, requested: &'static str },

    #[error("no batch {0}")]
    UnknownBatch(usize),

    #[error("unknown record kind {0:?}")]
    UnknownKind(String),

    #[error("unknown export format {0:?}")]
    UnknownFormat(String),

    #[error("could not serialise export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}
