use super::category::TokenCategory;
use crate::lexical::error::LexicalErrorKind;
use crate::utils::Position;
use serde::Serialize;

/// A recognized unit of source text.
///
/// The text itself lives in the symbol table at `symbol_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    category: TokenCategory,
    row: usize,
    column: usize,
    symbol_index: usize,
}

impl Token {
    pub(crate) fn new(category: TokenCategory, position: Position, symbol_index: usize) -> Self {
        Self {
            category,
            row: position.row,
            column: position.column,
            symbol_index,
        }
    }

    pub fn category(&self) -> TokenCategory {
        self.category
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn symbol_index(&self) -> usize {
        self.symbol_index
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }
}

/// A fragment the scanner could not classify, one per recovery event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidToken {
    raw_text: String,
    kind: LexicalErrorKind,
    message: String,
    row: usize,
    column: usize,
}

impl InvalidToken {
    pub(crate) fn new(raw_text: String, kind: LexicalErrorKind, position: Position) -> Self {
        let message = kind.to_string();
        Self {
            raw_text,
            kind,
            message,
            row: position.row,
            column: position.column,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn kind(&self) -> &LexicalErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_renders_message_once() {
        let invalid = InvalidToken::new(
            "123abc".to_string(),
            LexicalErrorKind::MalformedNumber,
            Position::new(2, 4),
        );
        assert_eq!(invalid.message(), "Malformed numeric literal");
        assert_eq!(invalid.position(), Position::new(2, 4));
        assert_eq!(invalid.raw_text(), "123abc");
    }

    #[test]
    fn test_token_serializes_category_name() {
        let token = Token::new(TokenCategory::Let, Position::new(0, 0), 0);
        let value = serde_json::to_value(token).unwrap();
        assert_eq!(value["category"], "LET");
        assert_eq!(value["symbol_index"], 0);
    }
}
