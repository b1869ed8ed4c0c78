//! Analysis request model

use chrono::NaiveDate;

/// Columns assumed when the client sends no schema
pub const DEFAULT_SCHEMA: [&str; 7] = [
    "userid",
    "username",
    "quizname",
    "difficultysum",
    "standarderror",
    "measure",
    "timetaken",
];

/// Normalized `/analyze` request
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// Column names, in order
    pub schema: Vec<String>,
    /// Trimmed CSV text, never empty
    pub csv: String,
    pub run_label: String,
    pub dryrun: bool,
}

impl AnalysisRequest {
    pub fn default_schema() -> Vec<String> {
        DEFAULT_SCHEMA.iter().map(|c| c.to_string()).collect()
    }

    /// `manual_YYYY-MM-DD`
    pub fn default_run_label(today: NaiveDate) -> String {
        format!("manual_{}", today.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_label() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 24).unwrap();
        assert_eq!(AnalysisRequest::default_run_label(today), "manual_2025-10-24");
    }

    #[test]
    fn test_default_schema() {
        let schema = AnalysisRequest::default_schema();
        assert_eq!(schema.len(), 7);
        assert_eq!(schema.first().map(String::as_str), Some("userid"));
        assert_eq!(schema.last().map(String::as_str), Some("timetaken"));
    }
}
