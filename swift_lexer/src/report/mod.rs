//! Human-readable and JSON renderings of a lexer run

use crate::lexical::{get_token_counts, LexOutput, TokenCounts};
use crate::tokens::TokenCategory;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

const TOKENS_BANNER: &str = "========== TOKENS ==========";
const INVALID_BANNER: &str = "========== INVALID ==========";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format: {}", other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct TokenEntry<'a> {
    category: TokenCategory,
    text: &'a str,
    row: usize,
    column: usize,
    symbol_index: usize,
}

#[derive(Debug, Serialize)]
struct InvalidEntry<'a> {
    raw: &'a str,
    kind: &'static str,
    code: &'static str,
    message: &'a str,
    row: usize,
    column: usize,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    source: &'a str,
    line_count: usize,
    tokens: Vec<TokenEntry<'a>>,
    invalid: Vec<InvalidEntry<'a>>,
    summary: TokenCounts,
}

pub fn render(output: &LexOutput, format: ReportFormat) -> Result<String, ReportError> {
    render_named("<input>", output, format)
}

/// Renders `output`; `source` names the input in JSON reports
pub fn render_named(
    source: &str,
    output: &LexOutput,
    format: ReportFormat,
) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => Ok(render_text(output)),
        ReportFormat::Json => render_json(source, output),
    }
}

pub fn render_text(output: &LexOutput) -> String {
    let mut text = String::new();

    let _ = writeln!(text, "{}", TOKENS_BANNER);
    for token in output.tokens() {
        let value = output.text_of(token);
        let _ = writeln!(
            text,
            "{}. {} (\"{}\") with length {} on row {}, col {}",
            token.symbol_index() + 1,
            token.category(),
            value,
            value.chars().count(),
            token.row(),
            token.column()
        );
    }

    let _ = writeln!(text);
    let _ = writeln!(text, "{}", INVALID_BANNER);
    for invalid in output.invalid_tokens() {
        let _ = writeln!(
            text,
            "(\"{}\") on row {}, col {}: {}",
            invalid.raw_text(),
            invalid.row(),
            invalid.column(),
            invalid.message()
        );
    }

    text
}

pub fn render_json(source: &str, output: &LexOutput) -> Result<String, ReportError> {
    let report = JsonReport {
        generated_at: Utc::now(),
        source,
        line_count: output.line_count(),
        tokens: output
            .tokens()
            .iter()
            .map(|token| TokenEntry {
                category: token.category(),
                text: output.text_of(token),
                row: token.row(),
                column: token.column(),
                symbol_index: token.symbol_index(),
            })
            .collect(),
        invalid: output
            .invalid_tokens()
            .iter()
            .map(|invalid| InvalidEntry {
                raw: invalid.raw_text(),
                kind: invalid.kind().label(),
                code: invalid.kind().error_code().as_str(),
                message: invalid.message(),
                row: invalid.row(),
                column: invalid.column(),
            })
            .collect(),
        summary: get_token_counts(output),
    };

    let json = serde_json::to_string_pretty(&report)?;

    crate::log_success!(crate::logging::codes::success::REPORT_GENERATED, "JSON report generated",
        "source" => source,
        "bytes" => json.len()
    );

    Ok(json)
}
