//! Request normalization
//!
//! Turns an arbitrary `/analyze` body into an [`AnalysisRequest`]. The body
//! may be empty, not JSON, or JSON of the wrong shape; all of those read as
//! an empty object.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult, MISSING_CSV};
use crate::models::AnalysisRequest;

pub fn normalize(body: &[u8], today: NaiveDate) -> AppResult<AnalysisRequest> {
    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let csv = payload
        .get("csv")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if csv.is_empty() {
        return Err(AppError::ValidationError(MISSING_CSV.to_string()));
    }

    let schema = payload
        .get("schema")
        .and_then(schema_columns)
        .unwrap_or_else(AnalysisRequest::default_schema);

    let run_label = payload
        .get("run_label")
        .filter(|v| is_truthy(v))
        .map(|v| match v {
            Value::String(label) => label.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| AnalysisRequest::default_run_label(today));

    let dryrun = payload.get("dryrun").map(is_truthy).unwrap_or(false);

    Ok(AnalysisRequest {
        schema,
        csv: csv.to_string(),
        run_label,
        dryrun,
    })
}

/// Non-empty array of column names, or `None` to fall back to the default
fn schema_columns(value: &Value) -> Option<Vec<String>> {
    let columns: Vec<String> = value
        .as_array()?
        .iter()
        .map(|c| match c {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        })
        .collect();

    (!columns.is_empty()).then_some(columns)
}

/// Loose JSON truthiness: null, false, 0, "", [] and {} are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
