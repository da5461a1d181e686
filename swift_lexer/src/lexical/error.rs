//! Lexical error types
//!
//! `LexicalErrorKind` describes a recovered fragment and never stops a run.
//! `LexerError` is raised while building a lexer, before any line is read.

use crate::automaton::BuildError;
use crate::logging::codes;
use crate::utils::Position;
use serde::Serialize;

/// Why a fragment of source could not be classified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum LexicalErrorKind {
    #[error("Invalid character '{character}'")]
    InvalidCharacter { character: char },

    #[error("Invalid token")]
    InvalidToken,

    #[error("Malformed numeric literal")]
    MalformedNumber,

    #[error("No closing quote was found for the quote opened at {opened_at}")]
    UnterminatedString { opened_at: Position },

    #[error("Multiline comment opened at {opened_at} was never closed")]
    UnclosedComment { opened_at: Position },

    #[error("Multiline string opened at {opened_at} was never closed")]
    UnclosedMultilineString { opened_at: Position },

    #[error("Type declaration marker has no name")]
    NamelessTypeDeclaration,
}

impl LexicalErrorKind {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexicalErrorKind::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexicalErrorKind::InvalidToken => codes::lexical::INVALID_TOKEN,
            LexicalErrorKind::MalformedNumber => codes::lexical::MALFORMED_NUMBER,
            LexicalErrorKind::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexicalErrorKind::UnclosedComment { .. } => codes::lexical::UNCLOSED_COMMENT,
            LexicalErrorKind::UnclosedMultilineString { .. } => {
                codes::lexical::UNCLOSED_MULTILINE_STRING
            }
            LexicalErrorKind::NamelessTypeDeclaration => codes::lexical::NAMELESS_TYPE_DECLARATION,
        }
    }

    /// Short machine-friendly label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            LexicalErrorKind::InvalidCharacter { .. } => "invalid_character",
            LexicalErrorKind::InvalidToken => "invalid_token",
            LexicalErrorKind::MalformedNumber => "malformed_number",
            LexicalErrorKind::UnterminatedString { .. } => "unterminated_string",
            LexicalErrorKind::UnclosedComment { .. } => "unclosed_comment",
            LexicalErrorKind::UnclosedMultilineString { .. } => "unclosed_multiline_string",
            LexicalErrorKind::NamelessTypeDeclaration => "nameless_type_declaration",
        }
    }
}

/// Errors that stop a lexer from being built
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerError {
    #[error("Vocabulary configuration error: {0}")]
    Configuration(#[from] BuildError),
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Configuration(build) => build.error_code(),
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, LexerError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_cite_positions() {
        let kind = LexicalErrorKind::UnterminatedString {
            opened_at: Position::new(0, 0),
        };
        assert_eq!(
            kind.to_string(),
            "No closing quote was found for the quote opened at [0:0]"
        );

        let kind = LexicalErrorKind::UnclosedComment {
            opened_at: Position::new(3, 7),
        };
        assert_eq!(
            kind.to_string(),
            "Multiline comment opened at [3:7] was never closed"
        );
    }

    #[test]
    fn test_kind_codes_are_lexical() {
        assert_eq!(LexicalErrorKind::MalformedNumber.error_code().as_str(), "E022");
        assert_eq!(LexicalErrorKind::InvalidToken.error_code().as_str(), "E023");
    }

    #[test]
    fn test_configuration_error_code_comes_from_build_error() {
        let error = LexerError::from(BuildError::UnknownLiteral {
            literal: "lett".to_string(),
        });
        assert!(error.is_configuration_error());
        assert_eq!(error.error_code(), codes::configuration::UNKNOWN_LITERAL);
    }
}
