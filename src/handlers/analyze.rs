//! Analyze handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;

use crate::analysis;
use crate::error::AppError;
use crate::AppState;

/// `POST /analyze`
///
/// Takes the raw body so that missing or malformed JSON reaches the
/// normalizer instead of being rejected by an extractor. A body that cannot
/// be buffered at all still answers with the JSON error envelope.
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return AppError::from(rejection).into_envelope(state.config.debug_errors),
    };

    let today = Local::now().date_naive();

    let result = match analysis::normalize(&body, today) {
        Ok(request) => {
            tracing::debug!(
                run_label = %request.run_label,
                dryrun = request.dryrun,
                csv_bytes = request.csv.len(),
                "Analysis requested"
            );
            state.analyzer.analyze(&request).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(result) => Json(result).into_response(),
        Err(e) => e.into_envelope(state.config.debug_errors),
    }
}
