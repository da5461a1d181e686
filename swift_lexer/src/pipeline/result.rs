use crate::file_processor::FileMetadata;
use crate::lexical::{LexOutput, LexicalMetrics};
use std::time::Duration;

/// Everything one file run produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub output: LexOutput,
    pub file_metadata: FileMetadata,
    pub lexical_metrics: LexicalMetrics,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        output: LexOutput,
        file_metadata: FileMetadata,
        lexical_metrics: LexicalMetrics,
        processing_duration: Duration,
    ) -> Self {
        Self {
            output,
            file_metadata,
            lexical_metrics,
            processing_duration,
        }
    }

    pub fn token_count(&self) -> usize {
        self.output.tokens().len()
    }

    pub fn invalid_count(&self) -> usize {
        self.output.invalid_tokens().len()
    }

    pub fn log_success(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64().max(f64::EPSILON);
        crate::log_success!(
            crate::logging::codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "Swift file lexed",
            "file" => file_path,
            "tokens" => self.token_count(),
            "invalid" => self.invalid_count(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0),
            "processing_rate_tokens_per_sec" => format!("{:.0}", self.token_count() as f64 / seconds)
        );
    }
}
