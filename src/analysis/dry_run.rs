//! Dry-run preview
//!
//! Builds placeholder items straight from the CSV without calling the model.
//! The CSV reader is a plain comma split: quoted fields, escapes and
//! embedded newlines are not supported.

use std::collections::BTreeMap;

use crate::models::{AnalysisItem, AnalysisRequest, AnalysisResult, StudentRecord};

pub const PLACEHOLDER_RISK: f64 = 50.0;
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.4;
pub const PLACEHOLDER_DRIVER: &str = "dry-run mode";
pub const PLACEHOLDER_STUDENT_MSG: &str = "Dry-run preview.";
pub const PLACEHOLDER_TEACHER_MSG: &str = "Dry-run: Verify Moodle ↔ Analytics link.";

/// Line boundaries: `\n`, `\r`, `\r\n` and the rarer Unicode separators.
/// Splitting `\r\n` yields an empty piece, which the blank-line filter drops.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split CSV text into header-keyed rows
///
/// Blank lines are skipped. Each row is zipped against the header up to the
/// shorter of the two; a repeated header name keeps the later value.
pub fn parse_records(csv: &str) -> Vec<StudentRecord> {
    let mut lines = csv.split(is_line_break).filter(|line| !line.trim().is_empty());

    let header: Vec<&str> = match lines.next() {
        Some(line) => line.split(',').collect(),
        None => return Vec::new(),
    };

    lines
        .map(|row| {
            let fields: BTreeMap<String, String> = header
                .iter()
                .zip(row.split(','))
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            StudentRecord::from_fields(fields)
        })
        .collect()
}

fn placeholder_item(record: StudentRecord) -> AnalysisItem {
    AnalysisItem {
        userid: record.userid,
        risk_score: PLACEHOLDER_RISK,
        confidence: PLACEHOLDER_CONFIDENCE,
        drivers: vec![PLACEHOLDER_DRIVER.to_string()],
        student_msg: PLACEHOLDER_STUDENT_MSG.to_string(),
        teacher_msg: PLACEHOLDER_TEACHER_MSG.to_string(),
        features: Some(record.fields),
    }
}

pub fn preview(request: &AnalysisRequest) -> Result<AnalysisResult, serde_json::Error> {
    let items: Vec<AnalysisItem> = parse_records(&request.csv)
        .into_iter()
        .map(placeholder_item)
        .collect();

    tracing::info!(run_label = %request.run_label, items = items.len(), "Dry-run preview generated");

    AnalysisResult::from_items(request.run_label.clone(), items)
}
