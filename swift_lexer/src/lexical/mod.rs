//! Lexical analysis
//!
//! [`Lexer`] is the line-driven scanner; [`LexicalAnalyzer`] runs it over a
//! processed file with logging and metrics.

pub mod analyzer;
pub mod classify;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod state;
pub mod tables;

use crate::config::compile_time::lexical::{
    MAX_INVALID_TOKEN_COUNT, MAX_PENDING_DEPTH, MAX_TOKEN_COUNT,
};
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::logging::codes;
use crate::tokens::CategoryClass;
use serde::Serialize;

pub use analyzer::{LexicalAnalyzer, LexicalMetrics};
pub use cursor::LineCursor;
pub use error::{LexerError, LexicalErrorKind};
pub use lexer::{tokenize_lines, tokenize_str, LexOutput, Lexer};
pub use state::{PendingConstruct, ScanMode};
pub use tables::LexerTables;

/// Lexes a processed file with the built-in vocabulary
pub fn tokenize_file_result(file_result: &FileProcessingResult) -> LexOutput {
    LexicalAnalyzer::new().tokenize_file_result(file_result)
}

pub fn create_analyzer() -> LexicalAnalyzer {
    LexicalAnalyzer::new()
}

pub fn create_analyzer_with_preferences(preferences: LexicalPreferences) -> LexicalAnalyzer {
    LexicalAnalyzer::new().with_preferences(preferences)
}

/// Startup check that every lexical code has registry metadata
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let codes_to_check = [
        codes::lexical::INVALID_CHARACTER,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::MALFORMED_NUMBER,
        codes::lexical::INVALID_TOKEN,
        codes::lexical::UNCLOSED_COMMENT,
        codes::lexical::UNCLOSED_MULTILINE_STRING,
        codes::lexical::NAMELESS_TYPE_DECLARATION,
    ];

    for code in &codes_to_check {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical limits initialized",
        "max_token_count" => MAX_TOKEN_COUNT,
        "max_invalid_token_count" => MAX_INVALID_TOKEN_COUNT,
        "max_pending_depth" => MAX_PENDING_DEPTH
    );

    Ok(())
}

// ============================================================================
// TOKEN DISTRIBUTION
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCounts {
    pub total: usize,
    pub keywords: usize,
    pub identifiers: usize,
    pub literals: usize,
    pub operators: usize,
    pub punctuation: usize,
    pub type_declarations: usize,
    pub comments: usize,
    pub whitespace: usize,
    pub invalid: usize,
}

impl TokenCounts {
    pub fn significant_tokens(&self) -> usize {
        self.total - self.whitespace - self.comments
    }

    pub fn has_content(&self) -> bool {
        self.keywords > 0 || self.identifiers > 0 || self.literals > 0
    }
}

pub fn get_token_counts(output: &LexOutput) -> TokenCounts {
    let mut counts = TokenCounts {
        total: output.tokens().len(),
        invalid: output.invalid_tokens().len(),
        ..TokenCounts::default()
    };

    for token in output.tokens() {
        match token.category().class() {
            CategoryClass::Keyword => counts.keywords += 1,
            CategoryClass::Identifier => counts.identifiers += 1,
            CategoryClass::Literal => counts.literals += 1,
            CategoryClass::Operator => counts.operators += 1,
            CategoryClass::Punctuation => counts.punctuation += 1,
            CategoryClass::TypeDeclaration => counts.type_declarations += 1,
            CategoryClass::Comment => counts.comments += 1,
            CategoryClass::Whitespace => counts.whitespace += 1,
            CategoryClass::Invalid => {}
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_token_counts() {
        let output = tokenize_str("let name = \"swift\" // greet\n@main ;$");
        let counts = get_token_counts(&output);

        assert_eq!(counts.keywords, 1);
        assert_eq!(counts.identifiers, 1);
        assert_eq!(counts.literals, 1);
        assert_eq!(counts.operators, 1);
        assert_eq!(counts.punctuation, 1);
        assert_eq!(counts.type_declarations, 1);
        assert_eq!(counts.comments, 1);
        assert_eq!(counts.whitespace, 5);
        assert_eq!(counts.invalid, 1);
        assert_eq!(counts.significant_tokens(), 6);
        assert!(counts.has_content());
    }

    #[test]
    fn test_analyzer_factories() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: false,
            include_trivia_in_counts: false,
            track_operator_patterns: false,
            log_recovery_events: false,
        };
        let mut analyzer = create_analyzer_with_preferences(preferences);
        assert!(!analyzer.preferences().collect_detailed_metrics);

        analyzer.set_preferences(create_analyzer().preferences().clone());
        analyzer.tokenize_lines(["let x = 1"], "inline");
        assert_eq!(analyzer.metrics().total_tokens, 7);
    }

    #[test]
    fn test_empty_output_counts() {
        let counts = get_token_counts(&LexOutput::default());
        assert_eq!(counts, TokenCounts::default());
        assert!(!counts.has_content());
    }
}
