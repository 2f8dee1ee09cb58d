// Flat CSV writer for export rows.
//
// - Columns come from the keys of the first row, in insertion order.
// - Rows are CRLF separated; there is no trailing line break.
// - Missing keys and nulls become empty fields.
// - A field is quoted only when it contains a comma, a quote or a line break.

use serde_json::{Map, Value as Json};
use std::borrow::Cow;

pub type Row = Map<String, Json>;

pub const LINE_BREAK: &str = "\r\n";

pub fn to_csv(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        lines.push(
            headers
                .iter()
                .map(|h| field(row.get(h.as_str())))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join(LINE_BREAK)
}

fn field(value: Option<&Json>) -> String {
    match value {
        None | Some(Json::Null) => String::new(),
        Some(Json::String(text)) => escape(text).into_owned(),
        Some(other) => escape(&other.to_string()).into_owned(),
    }
}

fn escape(text: &str) -> Cow<'_, str> {
    if text.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}
