//! JSON recovery for model output
//!
//! Models sometimes wrap the object in prose or code fences. When a direct
//! parse fails, the span from the first `{` to the last `}` is tried.

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

pub const INVALID_JSON: &str = "Invalid JSON returned from model";
pub const NOT_AN_OBJECT: &str = "Model response is not a JSON object";

pub fn recover_object(text: &str) -> AppResult<Map<String, Value>> {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(direct_err) => {
            tracing::debug!("Direct parse failed ({}), trying brace span", direct_err);
            parse_brace_span(text)?
        }
    };

    match value {
        Value::Object(object) => Ok(object),
        _ => Err(AppError::upstream_format(NOT_AN_OBJECT)),
    }
}

fn parse_brace_span(text: &str) -> AppResult<Value> {
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(AppError::upstream_format(INVALID_JSON)),
    };

    let span = if start <= end { &text[start..=end] } else { "" };

    serde_json::from_str(span).map_err(|e| AppError::UpstreamFormatError {
        message: INVALID_JSON.to_string(),
        source: Some(e),
    })
}
