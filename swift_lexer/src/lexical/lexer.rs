//! Line-driven scanning state machine
//!
//! The lexer consumes one physical line at a time. Single-line tokens are
//! recognized by a dispatch on the current character; multiline comments and
//! strings open a [`PendingConstruct`] frame that collects text across lines
//! until its closing marker shows up. Anything unrecognizable becomes one
//! [`InvalidToken`] and scanning resynchronizes right after it.

use super::classify::*;
use super::cursor::LineCursor;
use super::error::{LexerError, LexicalErrorKind};
use super::state::{PendingConstruct, ScanMode};
use super::tables::LexerTables;
use crate::config::compile_time::lexical::{
    MAX_INVALID_TOKEN_COUNT, MAX_PENDING_DEPTH, MAX_TOKEN_COUNT,
};
use crate::{log_debug, log_warning};
use crate::tokens::{InvalidToken, SymbolTable, Token, TokenCategory};
use crate::utils::Position;
use crate::vocabulary::Vocabulary;
use serde::Serialize;
use std::sync::Arc;

/// What a lexer run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LexOutput {
    tokens: Vec<Token>,
    invalid: Vec<InvalidToken>,
    symbols: SymbolTable,
    line_count: usize,
    suppressed_tokens: usize,
    suppressed_invalid: usize,
}

impl LexOutput {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn invalid_tokens(&self) -> &[InvalidToken] {
        &self.invalid
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Source text of `token`
    pub fn text_of(&self, token: &Token) -> &str {
        self.symbols.get(token.symbol_index()).unwrap_or_default()
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Tokens scanned after `MAX_TOKEN_COUNT` was reached
    pub fn suppressed_token_count(&self) -> usize {
        self.suppressed_tokens
    }

    /// Invalid fragments seen after `MAX_INVALID_TOKEN_COUNT` was reached
    pub fn suppressed_invalid_count(&self) -> usize {
        self.suppressed_invalid
    }

    /// Whether a recording cap dropped anything
    pub fn is_truncated(&self) -> bool {
        self.suppressed_tokens > 0 || self.suppressed_invalid > 0
    }

    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty() && self.suppressed_invalid == 0
    }

    /// Tokens other than whitespace, tabs and comments
    pub fn significant_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| !t.category().is_trivia())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    /// A frame closed or a nested one opened; keep scanning this line
    Continue,
    LineEnded,
}

#[derive(Debug)]
pub struct Lexer {
    tables: Arc<LexerTables>,
    cursor: LineCursor,
    mode: ScanMode,
    pending: Vec<PendingConstruct>,
    /// Comment openers nested past `MAX_PENDING_DEPTH`, kept as text of the top frame
    untracked_openers: usize,
    tokens: Vec<Token>,
    symbols: SymbolTable,
    suppressed_tokens: usize,
    invalid: Vec<InvalidToken>,
    suppressed_invalid: usize,
    line_count: usize,
    log_recovery: bool,
}

impl Lexer {
    /// Builds fresh tables; fails on literals with no category
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, LexerError> {
        let tables = LexerTables::from_vocabulary(vocabulary)?;
        Ok(Self::with_tables(Arc::new(tables)))
    }

    pub fn with_tables(tables: Arc<LexerTables>) -> Self {
        Self {
            tables,
            cursor: LineCursor::new(),
            mode: ScanMode::Default,
            pending: Vec::new(),
            untracked_openers: 0,
            tokens: Vec::new(),
            symbols: SymbolTable::new(),
            suppressed_tokens: 0,
            invalid: Vec::new(),
            suppressed_invalid: 0,
            line_count: 0,
            log_recovery: true,
        }
    }

    pub fn builtin() -> Self {
        Self::with_tables(LexerTables::builtin())
    }

    /// Whether each recovery is logged at debug level
    pub fn set_recovery_logging(&mut self, enabled: bool) {
        self.log_recovery = enabled;
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn pending_depth(&self) -> usize {
        self.pending.len()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }

    /// Scans one physical line, without its terminator.
    ///
    /// No input stops a run. Tokens and invalid fragments past their caps
    /// are counted but not stored, and comments nested past
    /// `MAX_PENDING_DEPTH` stay part of the innermost tracked frame.
    pub fn feed_line(&mut self, line: &str) {
        self.cursor.load_line(line);

        loop {
            if !self.pending.is_empty() {
                if self.resume_pending() == Resume::LineEnded {
                    break;
                }
            } else if self.cursor.is_ended(0) {
                break;
            } else {
                self.scan_step();
            }
        }

        self.cursor.next_row();
        self.line_count += 1;
    }

    /// Reports every still-open construct, innermost first
    pub fn finish(mut self) -> LexOutput {
        while let Some(frame) = self.pending.pop() {
            let start = frame.start();
            let kind = frame.unclosed_error();
            let mut text = frame.into_text();
            if text.ends_with('\n') {
                text.pop();
            }
            // unclosed frames are bounded by the depth cap, so always stored
            self.store_invalid(text, kind, start);
        }

        LexOutput {
            tokens: self.tokens,
            invalid: self.invalid,
            symbols: self.symbols,
            line_count: self.line_count,
            suppressed_tokens: self.suppressed_tokens,
            suppressed_invalid: self.suppressed_invalid,
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    fn scan_step(&mut self) {
        let Some(c) = self.cursor.peek(0) else {
            return;
        };
        let next = self.cursor.peek(1);

        if is_whitespace(c) {
            self.mode = ScanMode::Whitespace;
            self.scan_run(c, TokenCategory::Whitespace);
        } else if is_tab(c) {
            self.mode = ScanMode::Tab;
            self.scan_run(c, TokenCategory::Tab);
        } else if c == '/' && next == Some('/') {
            self.mode = ScanMode::SingleLineComment;
            self.emit(TokenCategory::SingleLineComment, self.cursor.remaining());
        } else if c == '/' && next == Some('*') {
            let frame = PendingConstruct::comment("/*", self.cursor.position());
            self.open_pending(frame, 2);
        } else if is_digit(c) {
            self.scan_number();
        } else if is_word_start(c) {
            self.scan_word();
        } else if is_operator(c) {
            self.scan_operator();
        } else if is_punctuation(c) {
            self.scan_punctuation(c);
        } else if is_double_quote(c) {
            if next == Some('"') && self.cursor.peek(2) == Some('"') {
                let frame = PendingConstruct::string("\"\"\"", self.cursor.position());
                self.open_pending(frame, 3);
            } else {
                self.scan_string();
            }
        } else if is_at(c) {
            self.scan_type_declaration();
        } else if is_backslash(c) && next == Some('.') {
            self.scan_key_path();
        } else {
            self.mode = ScanMode::Error;
            self.recover(LexicalErrorKind::InvalidCharacter { character: c }, 1);
        }
    }

    fn scan_run(&mut self, c: char, category: TokenCategory) {
        let len = self.cursor.count_while(0, |other| other == c);
        self.emit(category, len);
    }

    fn scan_number(&mut self) {
        self.mode = ScanMode::Integer;
        let mut len = self.cursor.count_while(0, is_digit);

        if self.cursor.peek(len) == Some('.') && self.cursor.peek(len + 1).is_some_and(is_digit) {
            self.mode = ScanMode::Float;
            len += 1 + self.cursor.count_while(len + 1, is_digit);
        }

        let well_formed = match self.cursor.peek(len) {
            None => true,
            // `3.14.5` is one malformed literal, `1..<5` is not
            Some('.') => {
                !(self.mode == ScanMode::Float && self.cursor.peek(len + 1).is_some_and(is_digit))
            }
            Some(next) => is_end_of_token(next),
        };

        if !well_formed {
            let tail = self
                .cursor
                .count_while(len, |c| c == '.' || !is_end_of_token(c));
            self.recover(LexicalErrorKind::MalformedNumber, len + tail);
            return;
        }

        let category = if self.mode == ScanMode::Float {
            TokenCategory::Float
        } else {
            TokenCategory::Int
        };
        self.emit(category, len);
    }

    fn scan_word(&mut self) {
        self.mode = ScanMode::Identifier;
        let len = self.cursor.count_while(0, |c| !is_end_of_token(c));
        let word = self.cursor.slice(0, len);

        if is_alphabetic_operator(&word) {
            let operators = self.tables.operators();

            if takes_cast_suffix(&word) && self.cursor.peek(len).is_some_and(is_cast_suffix) {
                let suffixed = self.cursor.slice(0, len + 1);
                if let Some(category) = operators.classify(&suffixed) {
                    self.mode = ScanMode::Operator;
                    self.emit(category, len + 1);
                    return;
                }
            }
            if let Some(category) = operators.classify(&word) {
                self.mode = ScanMode::Operator;
                self.emit(category, len);
                return;
            }
        }

        match self.tables.keywords().classify(&word) {
            Some(category) => {
                self.mode = ScanMode::Keyword;
                self.emit(category, len);
            }
            None => self.emit(TokenCategory::Identifier, len),
        }
    }

    /// Maximal operator run; a comment opener inside the run ends it
    fn scan_operator(&mut self) {
        self.mode = ScanMode::Operator;
        let mut len = 0;
        while let Some(c) = self.cursor.peek(len) {
            if !is_operator(c) {
                break;
            }
            if len > 0 && c == '/' && matches!(self.cursor.peek(len + 1), Some('/' | '*')) {
                break;
            }
            len += 1;
        }

        let text = self.cursor.slice(0, len);
        match self.tables.operators().classify(&text) {
            Some(category) => self.emit(category, len),
            None => self.recover(LexicalErrorKind::InvalidToken, len),
        }
    }

    fn scan_punctuation(&mut self, c: char) {
        self.mode = ScanMode::Punctuation;
        let category = self
            .tables
            .punctuation()
            .classify(c.encode_utf8(&mut [0; 4]))
            .unwrap_or(TokenCategory::Punctuation);
        self.emit(category, 1);
    }

    fn scan_string(&mut self) {
        self.mode = ScanMode::String;
        let opened_at = self.cursor.position();
        let mut offset = 1;

        while let Some(c) = self.cursor.peek(offset) {
            match self.mode {
                ScanMode::StringEscape => self.mode = ScanMode::String,
                _ if is_backslash(c) => self.mode = ScanMode::StringEscape,
                _ if is_double_quote(c) => {
                    self.emit(TokenCategory::StringLiteral, offset + 1);
                    return;
                }
                _ => {}
            }
            offset += 1;
        }

        let rest = self.cursor.remaining();
        self.recover(LexicalErrorKind::UnterminatedString { opened_at }, rest);
    }

    fn scan_type_declaration(&mut self) {
        self.mode = ScanMode::TypeDeclaration;
        let name_len = if self.cursor.peek(1).is_some_and(is_word_start) {
            self.cursor.count_while(1, is_word_char)
        } else {
            0
        };

        if name_len == 0 {
            let tail = self.cursor.count_while(1, |c| !is_end_of_token(c));
            self.recover(LexicalErrorKind::NamelessTypeDeclaration, 1 + tail);
            return;
        }
        self.emit(TokenCategory::TypeDeclaration, 1 + name_len);
    }

    /// `\.` key-path marker
    fn scan_key_path(&mut self) {
        self.mode = ScanMode::Operator;
        match self.tables.operators().classify(&self.cursor.slice(0, 2)) {
            Some(category) => self.emit(category, 2),
            None => self.recover(LexicalErrorKind::InvalidCharacter { character: '\\' }, 1),
        }
    }

    // ------------------------------------------------------------------
    // Cross-line constructs
    // ------------------------------------------------------------------

    fn open_pending(&mut self, frame: PendingConstruct, opener_len: usize) {
        self.mode = frame.mode();
        self.pending.push(frame);
        self.cursor.advance(opener_len);
    }

    /// Continues the top frame from the cursor
    fn resume_pending(&mut self) -> Resume {
        let segment_start = self.cursor.column();

        while let Some(c) = self.cursor.peek(0) {
            match self.mode {
                ScanMode::MultilineComment => {
                    if c == '/' && self.cursor.peek(1) == Some('*') {
                        if self.pending.len() >= MAX_PENDING_DEPTH {
                            self.untrack_opener();
                            continue;
                        }
                        self.append_segment(segment_start);
                        let frame = PendingConstruct::comment("/*", self.cursor.position());
                        self.open_pending(frame, 2);
                        return Resume::Continue;
                    }
                    if c == '*' {
                        self.mode = ScanMode::MultilineCommentEnding;
                    }
                    self.cursor.advance(1);
                }
                ScanMode::MultilineCommentEnding => {
                    self.cursor.advance(1);
                    match c {
                        '/' if self.untracked_openers > 0 => {
                            self.untracked_openers -= 1;
                            self.mode = ScanMode::MultilineComment;
                        }
                        '/' => {
                            self.close_top(segment_start);
                            return Resume::Continue;
                        }
                        '*' => {}
                        _ => self.mode = ScanMode::MultilineComment,
                    }
                }
                ScanMode::MultilineString => {
                    if is_backslash(c) {
                        self.mode = ScanMode::MultilineStringEscape;
                        self.cursor.advance(1);
                    } else if c == '"'
                        && self.cursor.peek(1) == Some('"')
                        && self.cursor.peek(2) == Some('"')
                    {
                        self.cursor.advance(3);
                        self.close_top(segment_start);
                        return Resume::Continue;
                    } else {
                        self.cursor.advance(1);
                    }
                }
                ScanMode::MultilineStringEscape => {
                    self.mode = ScanMode::MultilineString;
                    self.cursor.advance(1);
                }
                _ => {
                    self.mode = self
                        .pending
                        .last()
                        .map(PendingConstruct::mode)
                        .unwrap_or(ScanMode::MultilineComment);
                }
            }
        }

        self.append_segment(segment_start);
        if let Some(frame) = self.pending.last_mut() {
            frame.append("\n");
        }
        self.mode = self.mode.at_line_start();
        Resume::LineEnded
    }

    fn append_segment(&mut self, segment_start: usize) {
        let segment = self
            .cursor
            .text_between(segment_start, self.cursor.column());
        if let Some(frame) = self.pending.last_mut() {
            frame.append(&segment);
        }
    }

    /// A `/*` past the depth cap; its `*/` will not close a frame
    fn untrack_opener(&mut self) {
        if self.untracked_openers == 0 {
            log_warning!("Comment nesting limit reached, deeper comments stay in the enclosing one",
                "position" => self.cursor.position(),
                "max_pending_depth" => MAX_PENDING_DEPTH
            );
        }
        self.untracked_openers += 1;
        self.cursor.advance(2);
    }

    /// Pops the top frame into a token at its opener. The enclosing frame,
    /// if any, keeps the closed text and becomes the top again.
    fn close_top(&mut self, segment_start: usize) {
        self.append_segment(segment_start);
        let Some(frame) = self.pending.pop() else {
            self.mode = ScanMode::Default;
            return;
        };

        let category = frame.category();
        let start = frame.start();
        match self.pending.last_mut() {
            Some(outer) => {
                outer.append(frame.text());
                self.mode = outer.mode();
            }
            None => self.mode = ScanMode::Default,
        }
        self.push_token(category, frame.into_text(), start);
    }

    // ------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------

    fn emit(&mut self, category: TokenCategory, len: usize) {
        let position = self.cursor.position();
        let text = self.cursor.slice(0, len);
        self.cursor.advance(len);
        self.push_token(category, text, position);
        self.mode = ScanMode::Default;
    }

    fn push_token(&mut self, category: TokenCategory, text: String, position: Position) {
        if self.tokens.len() >= MAX_TOKEN_COUNT {
            if self.suppressed_tokens == 0 {
                log_warning!("Token limit reached, further tokens are counted only",
                    "position" => position,
                    "max_token_count" => MAX_TOKEN_COUNT
                );
            }
            self.suppressed_tokens += 1;
            return;
        }
        let symbol_index = self.symbols.push(text);
        self.tokens.push(Token::new(category, position, symbol_index));
    }

    /// Records one invalid fragment of at least one character and resumes at DEFAULT
    fn recover(&mut self, kind: LexicalErrorKind, len: usize) {
        let len = len.min(self.cursor.remaining()).max(1);
        let position = self.cursor.position();
        let raw = self.cursor.slice(0, len);
        self.cursor.advance(len);
        self.record_invalid(raw, kind, position);
        self.mode = ScanMode::Default;
    }

    fn record_invalid(&mut self, raw: String, kind: LexicalErrorKind, position: Position) {
        if self.invalid.len() < MAX_INVALID_TOKEN_COUNT {
            self.store_invalid(raw, kind, position);
            return;
        }
        if self.suppressed_invalid == 0 {
            log_warning!("Invalid fragment limit reached, further fragments are counted only",
                "position" => position,
                "max_invalid_token_count" => MAX_INVALID_TOKEN_COUNT
            );
        }
        self.suppressed_invalid += 1;
    }

    fn store_invalid(&mut self, raw: String, kind: LexicalErrorKind, position: Position) {
        if self.log_recovery {
            log_debug!(code = kind.error_code(), position = position, "Recovered invalid fragment",
                "kind" => kind.label(),
                "raw" => raw
            );
        }
        self.invalid.push(InvalidToken::new(raw, kind, position));
    }
}

/// Runs a fresh lexer over `lines`
pub fn tokenize_lines<I, S>(tables: Arc<LexerTables>, lines: I) -> LexOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lexer = Lexer::with_tables(tables);
    for line in lines {
        lexer.feed_line(line.as_ref());
    }
    lexer.finish()
}

/// Built-in vocabulary over `source`, split on `\n` or `\r\n`
pub fn tokenize_str(source: &str) -> LexOutput {
    tokenize_lines(LexerTables::builtin(), source.lines())
}
