//! Analysis result models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One CSV row keyed by header name
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub fields: BTreeMap<String, String>,
    pub userid: i64,
}

impl StudentRecord {
    /// Build from a header-keyed mapping; `userid` falls back to 0
    pub fn from_fields(fields: BTreeMap<String, String>) -> Self {
        let userid = fields
            .get("userid")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);

        Self { fields, userid }
    }
}

/// Per-student risk assessment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisItem {
    pub userid: i64,
    /// 0-100, higher = more at risk
    pub risk_score: f64,
    /// 0-1
    pub confidence: f64,
    pub drivers: Vec<String>,
    pub student_msg: String,
    pub teacher_msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeMap<String, String>>,
}

/// `/analyze` response body
///
/// `items` holds whatever the model returned per student; keys the model
/// adds beside `run_label` and `items` are kept in `extra`. `run_label` is
/// a string unless the model chose to return something else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub run_label: Value,
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    pub fn from_items(run_label: String, items: Vec<AnalysisItem>) -> Result<Self, serde_json::Error> {
        let items = items
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { run_label: Value::String(run_label), items, extra: Map::new() })
    }

    /// Fix up a model-produced object
    ///
    /// A missing or null `run_label` becomes `default_label`, any other
    /// value is kept as the model sent it; an `items` value that is not an
    /// array becomes `[]`.
    pub fn from_model_object(mut object: Map<String, Value>, default_label: &str) -> Self {
        let run_label = match object.remove("run_label") {
            None | Some(Value::Null) => Value::String(default_label.to_string()),
            Some(label) => label,
        };

        let items = match object.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        Self { run_label, items, extra: object }
    }
}
