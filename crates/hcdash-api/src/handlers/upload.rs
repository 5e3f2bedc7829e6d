//! Spreadsheet upload
//!
//! The workbook is parsed and handed back as JSON rows so the browser can
//! preview and map columns before submitting them through the input routes.
//! Nothing is stored here.

use axum::{extract::Multipart, Json};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::middleware::Scope;
use crate::models::*;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn cell_to_json(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Value::String(s.trim().to_string())),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Float(f) => Some(float_to_json(*f)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => Some(float_to_json(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
        Data::Error(e) => Some(Value::String(e.to_string())),
    }
}

/// Whole floats become integers, so `12.0` from a numeric cell reads as `12`
fn float_to_json(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn header_name(cell: &Data, index: usize) -> String {
    match cell_to_json(cell) {
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => format!("column_{}", index + 1),
    }
}

/// Rows of a sheet keyed by its first row. Empty cells are left out and
/// rows without any value are skipped.
pub fn range_to_rows(range: &Range<Data>) -> Vec<Map<String, Value>> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| header_name(cell, i))
        .collect();

    rows.filter_map(|row| {
        let record: Map<String, Value> = row
            .iter()
            .zip(&headers)
            .filter_map(|(cell, name)| cell_to_json(cell).map(|v| (name.clone(), v)))
            .collect();
        (!record.is_empty()).then_some(record)
    })
    .collect()
}

/// Every sheet of an `.xlsx`, `.xls` or `.ods` workbook as rows
pub fn workbook_to_json(bytes: Vec<u8>) -> ApiResult<BTreeMap<String, Vec<Map<String, Value>>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ApiError::Validation(format!("Unreadable workbook: {}", e)))?;

    let mut sheets = BTreeMap::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ApiError::Validation(format!("Unreadable sheet '{}': {}", name, e)))?;
        sheets.insert(name, range_to_rows(&range));
    }

    Ok(sheets)
}

/// Parse an uploaded workbook
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "Workbook in a `file` field"),
    responses(
        (status = 200, description = "Parsed sheets", body = UploadResponse),
        (status = 400, description = "No file or unreadable workbook", body = ErrorResponse),
        (status = 413, description = "File too large")
    ),
    tag = "upload"
)]
pub async fn upload_workbook(scope: Scope, mut multipart: Multipart) -> ApiResult<Json<UploadResponse>> {
    let multipart_error = |e: axum::extract::multipart::MultipartError| {
        ApiError::Validation(format!("Invalid upload: {}", e.body_text()))
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() {
            return Err(ApiError::Validation("Uploaded file is empty".to_string()));
        }

        let size = bytes.len();
        let sheets = tokio::task::spawn_blocking(move || workbook_to_json(bytes.to_vec()))
            .await
            .map_err(|e| ApiError::Internal(format!("Workbook parser failed: {}", e)))??;

        info!(
            "User {} uploaded {} ({} bytes, {} sheets)",
            scope.user.user_id,
            file_name,
            size,
            sheets.len()
        );

        return Ok(Json(UploadResponse { sheets }));
    }

    Err(ApiError::Validation("Missing 'file' field".to_string()))
}
