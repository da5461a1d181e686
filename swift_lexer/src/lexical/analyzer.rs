//! File-level driver around [`Lexer`]: feeds lines, collects metrics and logs
//! the outcome of each run.

use super::lexer::{LexOutput, Lexer};
use super::tables::LexerTables;
use crate::config::compile_time::lexical::{MAX_INVALID_TOKEN_COUNT, MAX_TOKEN_COUNT};
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::logging::codes;
use crate::tokens::{CategoryClass, TokenCategory};
use crate::{log_debug, log_success, log_warning};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub operator_tokens: usize,
    pub punctuation_tokens: usize,
    pub literal_tokens: usize,
    pub type_declarations: usize,
    pub comment_count: usize,
    pub max_comment_lines: usize,
    pub invalid_fragments: usize,
    /// Tokens and fragments dropped by the recording caps
    pub suppressed: usize,
    pub deepest_nesting: usize,
    pub line_count: usize,

    /// Whitespace and tab runs; only counted when trivia is included
    pub whitespace_tokens: usize,
    pub operator_usage_patterns: HashMap<String, usize>,
    pub invalid_by_kind: BTreeMap<String, usize>,

    #[serde(skip)]
    pub duration: Duration,
}

impl LexicalMetrics {
    pub(crate) fn record_output(&mut self, output: &LexOutput, preferences: &LexicalPreferences) {
        self.total_tokens = output.tokens().len();
        self.line_count = output.line_count();
        self.invalid_fragments = output.invalid_tokens().len();
        self.suppressed = output.suppressed_token_count() + output.suppressed_invalid_count();

        if !preferences.collect_detailed_metrics {
            return;
        }

        for token in output.tokens() {
            self.record_token(token.category(), output.text_of(token), preferences);
        }
        for invalid in output.invalid_tokens() {
            *self
                .invalid_by_kind
                .entry(invalid.kind().label().to_string())
                .or_insert(0) += 1;
        }
    }

    fn record_token(&mut self, category: TokenCategory, text: &str, preferences: &LexicalPreferences) {
        match category.class() {
            CategoryClass::Keyword => self.keyword_tokens += 1,
            CategoryClass::Identifier => self.identifier_tokens += 1,
            CategoryClass::Operator => {
                self.operator_tokens += 1;
                if preferences.track_operator_patterns {
                    *self
                        .operator_usage_patterns
                        .entry(category.name().to_string())
                        .or_insert(0) += 1;
                }
            }
            CategoryClass::Punctuation => self.punctuation_tokens += 1,
            CategoryClass::Literal => self.literal_tokens += 1,
            CategoryClass::TypeDeclaration => self.type_declarations += 1,
            CategoryClass::Comment => {
                self.comment_count += 1;
                self.max_comment_lines = self.max_comment_lines.max(text.lines().count());
            }
            CategoryClass::Whitespace => {
                if preferences.include_trivia_in_counts {
                    self.whitespace_tokens += 1;
                }
            }
            CategoryClass::Invalid => {}
        }
    }

    /// Tokens that are neither whitespace nor comments
    pub fn significant_tokens(&self) -> usize {
        self.keyword_tokens
            + self.identifier_tokens
            + self.operator_tokens
            + self.punctuation_tokens
            + self.literal_tokens
            + self.type_declarations
    }
}

pub struct LexicalAnalyzer {
    tables: Arc<LexerTables>,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    /// Uses the built-in vocabulary
    pub fn new() -> Self {
        Self::with_tables(LexerTables::builtin())
    }

    pub fn with_tables(tables: Arc<LexerTables>) -> Self {
        Self {
            tables,
            metrics: LexicalMetrics::default(),
            preferences: LexicalPreferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: LexicalPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn tokenize_file_result(
        &mut self,
        file_result: &FileProcessingResult,
    ) -> LexOutput {
        let file_path = file_result.metadata.path.display().to_string();

        log_debug!("Starting lexical analysis",
            "file" => file_path,
            "line_count" => file_result.metadata.line_count,
            "file_size_bytes" => file_result.metadata.size,
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        self.tokenize_lines(file_result.lines(), &file_path)
    }

    /// Lexes `lines` as one source unit labelled `source` in logs
    pub fn tokenize_lines<I, S>(&mut self, lines: I, source: &str) -> LexOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.metrics = LexicalMetrics::default();
        let start_time = Instant::now();

        let mut lexer = Lexer::with_tables(self.tables.clone());
        lexer.set_recovery_logging(self.preferences.log_recovery_events);

        for line in lines {
            lexer.feed_line(line.as_ref());
            self.metrics.deepest_nesting = self.metrics.deepest_nesting.max(lexer.pending_depth());
        }

        let output = lexer.finish();
        self.metrics.record_output(&output, &self.preferences);
        self.metrics.duration = start_time.elapsed();

        if output.is_truncated() {
            log_warning!("Lexical output truncated at recording limits",
                "file" => source,
                "suppressed_tokens" => output.suppressed_token_count(),
                "suppressed_invalid" => output.suppressed_invalid_count(),
                "limits" => format!("tokens:{}, invalid:{}", MAX_TOKEN_COUNT, MAX_INVALID_TOKEN_COUNT)
            );
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed",
            "file" => source,
            "lines" => self.metrics.line_count,
            "token_count" => self.metrics.total_tokens,
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "operators" => self.metrics.operator_tokens,
            "comments" => self.metrics.comment_count,
            "invalid_fragments" => self.metrics.invalid_fragments,
            "deepest_nesting" => self.metrics.deepest_nesting,
            "duration_ms" => format!("{:.2}", self.metrics.duration.as_secs_f64() * 1000.0)
        );

        output
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: LexicalPreferences) {
        self.preferences = preferences;
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detailed() -> LexicalPreferences {
        LexicalPreferences {
            collect_detailed_metrics: true,
            include_trivia_in_counts: true,
            track_operator_patterns: true,
            log_recovery_events: false,
        }
    }

    #[test]
    fn test_metrics_by_class() {
        let mut analyzer = LexicalAnalyzer::new().with_preferences(detailed());
        let output = analyzer.tokenize_lines(["@objc func f() { return 1 + 2 } // sum"], "inline");

        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, output.tokens().len());
        assert_eq!(metrics.type_declarations, 1);
        assert_eq!(metrics.keyword_tokens, 2);
        assert_eq!(metrics.identifier_tokens, 1);
        assert_eq!(metrics.operator_tokens, 1);
        assert_eq!(metrics.literal_tokens, 2);
        assert_eq!(metrics.punctuation_tokens, 4);
        assert_eq!(metrics.comment_count, 1);
        assert!(metrics.whitespace_tokens > 0);
        assert_eq!(metrics.operator_usage_patterns.get("ADDITION"), Some(&1));
        assert_eq!(metrics.significant_tokens(), 11);
    }

    #[test]
    fn test_invalid_fragments_are_grouped() {
        let mut analyzer = LexicalAnalyzer::new().with_preferences(detailed());
        analyzer.tokenize_lines(["# 12ab #", "\"open"], "inline");

        let metrics = analyzer.metrics();
        assert_eq!(metrics.invalid_fragments, 4);
        assert_eq!(metrics.invalid_by_kind.get("invalid_character"), Some(&2));
        assert_eq!(metrics.invalid_by_kind.get("malformed_number"), Some(&1));
        assert_eq!(metrics.invalid_by_kind.get("unterminated_string"), Some(&1));
    }

    #[test]
    fn test_deepest_nesting() {
        let mut analyzer = LexicalAnalyzer::new().with_preferences(detailed());
        let lines = ["/* a", "/* b /* c", "*/ */ */"];
        analyzer.tokenize_lines(lines, "inline");
        assert_eq!(analyzer.metrics().deepest_nesting, 3);
        // one token per level, the outermost spanning all three lines
        assert_eq!(analyzer.metrics().comment_count, 3);
        assert_eq!(analyzer.metrics().max_comment_lines, 3);
    }

    #[test]
    fn test_summary_only_without_detailed_metrics() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: false,
            ..detailed()
        };
        let mut analyzer = LexicalAnalyzer::new().with_preferences(preferences);
        analyzer.tokenize_lines(["let x = 1"], "inline");

        assert_eq!(analyzer.metrics().total_tokens, 7);
        assert_eq!(analyzer.metrics().keyword_tokens, 0);
        assert!(analyzer.metrics().operator_usage_patterns.is_empty());
    }

    #[test]
    fn test_metrics_reset_between_runs() {
        let mut analyzer = LexicalAnalyzer::new().with_preferences(detailed());
        analyzer.tokenize_lines(["let a = 1", "let b = 2"], "first");
        analyzer.tokenize_lines(["x"], "second");
        assert_eq!(analyzer.metrics().total_tokens, 1);
        assert_eq!(analyzer.metrics().line_count, 1);
    }

    #[test]
    fn test_deep_nesting_is_capped() {
        use crate::config::compile_time::lexical::MAX_PENDING_DEPTH;

        let mut analyzer = LexicalAnalyzer::new().with_preferences(detailed());
        let line = "/*".repeat(MAX_PENDING_DEPTH + 1);
        let output = analyzer.tokenize_lines([line.as_str(), "let ok = 1"], "inline");

        assert_eq!(analyzer.metrics().deepest_nesting, MAX_PENDING_DEPTH);
        assert!(output.tokens().is_empty());
        assert_eq!(output.invalid_tokens().len(), MAX_PENDING_DEPTH);
        assert_eq!(analyzer.metrics().suppressed, 0);
    }

    #[test]
    fn test_suppressed_fragments_are_counted() {
        let mut analyzer = LexicalAnalyzer::new().with_preferences(detailed());
        let noise = "$".repeat(MAX_INVALID_TOKEN_COUNT + 2);
        let output = analyzer.tokenize_lines([noise.as_str(), "let ok = 1"], "inline");

        assert!(output.is_truncated());
        assert_eq!(analyzer.metrics().invalid_fragments, MAX_INVALID_TOKEN_COUNT);
        assert_eq!(analyzer.metrics().suppressed, 2);
        assert_eq!(analyzer.metrics().keyword_tokens, 1);
    }
}
