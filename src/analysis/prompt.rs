//! Prompt construction for live analysis

pub const SYSTEM_INSTRUCTION: &str = "You are a JSON-only learning analytics engine.";

/// Build the user prompt: output contract, column list and the raw CSV
pub fn build_prompt(schema: &[String], run_label: &str, csv: &str) -> String {
    let columns = schema.join(", ");

    format!(
        r#"You are a learning analytics model. Analyze this CSV and return JSON only.
Columns: {columns}.
Each record = 1 quiz attempt. Aggregate by userid.

Output exactly:
{{
  "run_label": "{run_label}",
  "items": [
    {{
      "userid": int,
      "risk_score": float,     # 0–100 (higher = higher risk)
      "confidence": float,     # 0–1 (model certainty)
      "drivers": [string],     # 1–4 short causes
      "student_msg": string,   # actionable note for student
      "teacher_msg": string    # actionable note for teacher
    }}
  ]
}}

If data insufficient, set confidence low (~0.3) and neutral risk (~50).
Return ONLY valid JSON — no markdown, no commentary.

CSV data:
{csv}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_inputs() {
        let schema = vec!["userid".to_string(), "measure".to_string()];
        let csv = "userid,measure\n1,0.5";

        let prompt = build_prompt(&schema, "week_1", csv);

        assert!(prompt.contains("Columns: userid, measure."));
        assert!(prompt.contains("\"run_label\": \"week_1\""));
        assert!(prompt.ends_with("CSV data:\nuserid,measure\n1,0.5"));
    }

    #[test]
    fn test_prompt_calibration_hint() {
        let prompt = build_prompt(&[], "r", "x");

        assert!(prompt.contains("confidence low (~0.3)"));
        assert!(prompt.contains("neutral risk (~50)"));
        assert!(prompt.starts_with("You are a learning analytics model."));
    }
}
