use crate::lexical::error::LexicalErrorKind;
use crate::tokens::TokenCategory;
use crate::utils::Position;

/// Sub-task the scanner is in. Exactly one is active per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanMode {
    #[default]
    Default,
    Whitespace,
    Tab,
    Integer,
    Float,
    Identifier,
    Operator,
    Keyword,
    Punctuation,
    String,
    StringEscape,
    MultilineString,
    MultilineStringEscape,
    SingleLineComment,
    MultilineComment,
    MultilineCommentEnding,
    TypeDeclaration,
    Error,
}

impl ScanMode {
    /// Modes that survive the end of a physical line
    pub fn is_cross_line(&self) -> bool {
        matches!(
            self,
            ScanMode::MultilineComment
                | ScanMode::MultilineCommentEnding
                | ScanMode::MultilineString
                | ScanMode::MultilineStringEscape
        )
    }

    /// Mode a construct resumes in at the start of the next line
    pub fn at_line_start(self) -> Self {
        match self {
            ScanMode::MultilineCommentEnding => ScanMode::MultilineComment,
            ScanMode::MultilineStringEscape => ScanMode::MultilineString,
            other => other,
        }
    }
}

/// A multiline construct opened but not yet closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConstruct {
    mode: ScanMode,
    text: String,
    start: Position,
}

impl PendingConstruct {
    pub fn comment(opener: &str, start: Position) -> Self {
        Self {
            mode: ScanMode::MultilineComment,
            text: opener.to_string(),
            start,
        }
    }

    pub fn string(opener: &str, start: Position) -> Self {
        Self {
            mode: ScanMode::MultilineString,
            text: opener.to_string(),
            start,
        }
    }

    /// Mode the scanner returns to when this frame is on top
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn append(&mut self, segment: &str) {
        self.text.push_str(segment);
    }

    pub fn category(&self) -> TokenCategory {
        match self.mode {
            ScanMode::MultilineString => TokenCategory::MultilineString,
            _ => TokenCategory::MultilineComment,
        }
    }

    pub fn unclosed_error(&self) -> LexicalErrorKind {
        match self.mode {
            ScanMode::MultilineString => LexicalErrorKind::UnclosedMultilineString {
                opened_at: self.start,
            },
            _ => LexicalErrorKind::UnclosedComment {
                opened_at: self.start,
            },
        }
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
