mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::config::runtime::{FileProcessorPreferences, LexicalPreferences};
use crate::file_processor::FileProcessor;
use crate::lexical::{LexerTables, LexicalAnalyzer};
use crate::logging::{self, codes};
use crate::vocabulary::Vocabulary;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Lexes one file with the built-in vocabulary (file -> lines -> tokens)
pub fn process_file<P: AsRef<Path>>(file_path: P) -> Result<PipelineResult, PipelineError> {
    process_file_with_tables(file_path, LexerTables::builtin())
}

pub fn process_file_with_tables<P: AsRef<Path>>(
    file_path: P,
    tables: Arc<LexerTables>,
) -> Result<PipelineResult, PipelineError> {
    run(file_path.as_ref(), tables, 0)
}

/// Pipeline run tagged with `file_id` in every log event
pub(crate) fn run(
    file_path: &Path,
    tables: Arc<LexerTables>,
    file_id: usize,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let display_path = file_path.display().to_string();

    logging::with_file_context(file_path.to_path_buf(), file_id, || {
        crate::log_info!("Starting Swift lexing pipeline", "file" => display_path);

        let processor = FileProcessor::from_preferences(&FileProcessorPreferences::default());
        let file_result = processor.process_file(file_path)?;

        let mut analyzer =
            LexicalAnalyzer::with_tables(tables).with_preferences(LexicalPreferences::default());
        let output = analyzer.tokenize_file_result(&file_result);

        let result = PipelineResult::new(
            output,
            file_result.metadata,
            analyzer.metrics().clone(),
            start_time.elapsed(),
        );
        result.log_success(&display_path);

        Ok(result)
    })
}

/// Built-in tables, or tables for the vocabulary at `vocabulary_path`
pub fn load_tables(vocabulary_path: Option<&Path>) -> Result<Arc<LexerTables>, PipelineError> {
    let Some(path) = vocabulary_path else {
        return Ok(LexerTables::builtin());
    };

    let vocabulary = Vocabulary::load(path).inspect_err(|error| {
        crate::log_error!(error.error_code(), "Failed to load vocabulary",
            "path" => path.display(),
            "error" => error
        );
    })?;

    let tables = LexerTables::from_vocabulary(&vocabulary).map_err(|error| {
        crate::log_error!(error.error_code(), "Vocabulary contains an unknown literal",
            "path" => path.display(),
            "error" => error
        );
        crate::lexical::LexerError::from(error)
    })?;

    crate::log_success!(codes::success::VOCABULARY_LOADED, "Custom vocabulary loaded",
        "path" => path.display(),
        "words" => tables.word_count()
    );

    Ok(Arc::new(tables))
}

pub fn process_file_with_vocabulary<P: AsRef<Path>, V: AsRef<Path>>(
    file_path: P,
    vocabulary_path: V,
) -> Result<PipelineResult, PipelineError> {
    let tables = load_tables(Some(vocabulary_path.as_ref()))?;
    process_file_with_tables(file_path, tables)
}

/// Startup check across stages
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::init_lexical_analysis_logging()?;

    if LexerTables::builtin().word_count() != Vocabulary::builtin().word_count() {
        return Err("Built-in tables disagree with the built-in vocabulary".to_string());
    }

    crate::log_success!(codes::success::LEXICAL_VALIDATION_PASSED,
        "Pipeline validation succeeded",
        "stages_validated" => 2
    );

    Ok(())
}
