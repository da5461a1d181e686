use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::vocabulary::VocabularyError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Vocabulary loading failed: {0}")]
    Vocabulary(#[from] VocabularyError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::FileProcessing(error) => error.error_code(),
            PipelineError::LexicalAnalysis(error) => error.error_code(),
            PipelineError::Vocabulary(error) => error.error_code(),
            PipelineError::Pipeline { .. } => crate::logging::codes::system::INTERNAL_ERROR,
        }
    }
}
