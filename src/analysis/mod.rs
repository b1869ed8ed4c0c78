//! Analysis pipeline
//!
//! ```text
//!   body ──► normalize ──► AnalysisRequest ──► Analyzer::analyze
//!                                                │
//!                          dryrun || no key ─────┼──► dry_run::preview
//!                                                │
//!                          otherwise ────────────┴──► prompt ► provider ► recover
//! ```

pub mod dry_run;
pub mod normalize;
pub mod prompt;
pub mod recover;

use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{AnalysisRequest, AnalysisResult};
use crate::provider::{GenerationRequest, ResponseFormat, TextGenerator};

pub use normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DryRun,
    Live,
}

/// Resolves normalized requests into results
#[derive(Clone)]
pub struct Analyzer {
    generator: Option<Arc<dyn TextGenerator>>,
    model: String,
}

impl Analyzer {
    /// `generator` is `None` when no provider credential is configured
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn mode_for(&self, request: &AnalysisRequest) -> Mode {
        if request.dryrun || self.generator.is_none() {
            Mode::DryRun
        } else {
            Mode::Live
        }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> AppResult<AnalysisResult> {
        match (&self.generator, self.mode_for(request)) {
            (Some(generator), Mode::Live) => self.analyze_live(generator.as_ref(), request).await,
            _ => Ok(dry_run::preview(request)?),
        }
    }

    async fn analyze_live(
        &self,
        generator: &dyn TextGenerator,
        request: &AnalysisRequest,
    ) -> AppResult<AnalysisResult> {
        let generation = GenerationRequest {
            model: self.model.clone(),
            system_instruction: prompt::SYSTEM_INSTRUCTION.to_string(),
            user_prompt: prompt::build_prompt(&request.schema, &request.run_label, &request.csv),
            response_format: ResponseFormat::JsonObject,
        };

        let response = generator.generate(&generation).await?;

        tracing::debug!(
            provider = generator.name(),
            shape = response.shape(),
            len = response.text().len(),
            "Model responded"
        );

        let object = recover::recover_object(response.text())?;
        let result = AnalysisResult::from_model_object(object, &request.run_label);

        tracing::info!(run_label = %result.run_label, items = result.items.len(), "Live analysis complete");

        Ok(result)
    }
}
