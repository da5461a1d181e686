//! Error and success codes with their metadata
//!
//! Every error code is declared once in the `error_codes!` table below, which
//! generates the per-area constants and the rows of the metadata registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Error or success code as printed in logs, e.g. `E020` or `I020`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// What happens to a run that hits an error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The fragment is recorded and scanning continues
    Recovered,
    /// The file or batch stops
    Halts,
}

#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: Code,
    pub category: &'static str,
    pub severity: Severity,
    pub outcome: Outcome,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn recoverable(&self) -> bool {
        self.outcome == Outcome::Recovered
    }

    pub fn requires_halt(&self) -> bool {
        self.outcome == Outcome::Halts
    }
}

macro_rules! error_codes {
    ($(
        $(#[$module_doc:meta])*
        $module:ident => $category:literal {
            $($name:ident = $code:literal, $severity:ident, $outcome:ident,
                $description:literal, $action:literal;)+
        }
    )+) => {
        $(
            $(#[$module_doc])*
            pub mod $module {
                use super::Code;
                $(pub const $name: Code = Code::new($code);)+
            }
        )+

        const ERROR_TABLE: &[ErrorMetadata] = &[
            $($(
                ErrorMetadata {
                    code: $module::$name,
                    category: $category,
                    severity: Severity::$severity,
                    outcome: Outcome::$outcome,
                    description: $description,
                    recommended_action: $action,
                },
            )+)+
        ];
    };
}

error_codes! {
    system => "System" {
        INTERNAL_ERROR = "ERR001", Critical, Halts,
            "Internal lexer error",
            "File a bug report with the input that triggered it";
    }

    file_processing => "FileProcessing" {
        FILE_NOT_FOUND = "E005", Medium, Halts,
            "File not found at specified path",
            "Check file path and ensure file exists";
        INVALID_EXTENSION = "E006", Low, Recovered,
            "File does not have .swift extension",
            "Rename the file or unset SWIFT_LEXER_REQUIRE_SWIFT_EXTENSION";
        FILE_TOO_LARGE = "E007", High, Halts,
            "File exceeds the compile-time size limit",
            "Split the file or build with a profile that allows larger files";
        PERMISSION_DENIED = "E009", High, Halts,
            "Permission denied reading file",
            "Check file permissions";
        INVALID_ENCODING = "E010", Medium, Halts,
            "File is not valid UTF-8",
            "Convert the file to UTF-8";
        IO_ERROR = "E011", High, Halts,
            "I/O error while reading file",
            "Check disk and file system health";
        INVALID_PATH = "E012", Medium, Halts,
            "Path is empty or does not point to a regular file",
            "Pass the path of a regular file";
        TOO_MANY_LINES = "E013", High, Halts,
            "File exceeds the compile-time line limit",
            "Split the file or build with a profile that allows more lines";
    }

    /// Recovered fragments; none of them stops a run
    lexical => "Lexical" {
        INVALID_CHARACTER = "E020", Low, Recovered,
            "Character cannot start any token",
            "Remove or quote the character";
        UNTERMINATED_STRING = "E021", Medium, Recovered,
            "String literal has no closing quote on its line",
            "Add the closing quote or use a multiline string";
        MALFORMED_NUMBER = "E022", Low, Recovered,
            "Numeric literal is followed by characters that cannot end it",
            "Separate the number from the following text";
        INVALID_TOKEN = "E023", Low, Recovered,
            "Operator characters do not form a known operator",
            "Insert spaces between operators or check the vocabulary";
        UNCLOSED_COMMENT = "E024", Medium, Recovered,
            "Multiline comment is never closed",
            "Add the closing */";
        UNCLOSED_MULTILINE_STRING = "E025", Medium, Recovered,
            "Multiline string is never closed",
            "Add the closing \"\"\"";
        NAMELESS_TYPE_DECLARATION = "E026", Low, Recovered,
            "Type declaration marker @ is not followed by a name",
            "Add the attribute name after @";
    }

    /// Vocabulary and automaton construction
    configuration => "Configuration" {
        UNKNOWN_LITERAL = "E030", Critical, Halts,
            "Vocabulary literal does not name a known token category",
            "Remove the literal or correct its spelling";
        EMPTY_LITERAL = "E031", Critical, Halts,
            "Vocabulary contains an empty literal",
            "Remove empty entries from the vocabulary";
        VOCABULARY_NOT_FOUND = "E032", High, Halts,
            "Vocabulary file not found",
            "Check the --vocab path";
        VOCABULARY_IO_ERROR = "E033", High, Halts,
            "Vocabulary file could not be read",
            "Check file permissions";
        VOCABULARY_PARSE_ERROR = "E034", High, Halts,
            "Vocabulary TOML is malformed",
            "Provide operators and keywords as string arrays";
        VOCABULARY_EMPTY = "E035", High, Halts,
            "A required vocabulary list is empty",
            "Add at least one operator and one keyword";
        VOCABULARY_TOO_LARGE = "E036", High, Halts,
            "Vocabulary exceeds the compile-time word limit",
            "Trim the vocabulary";
    }

    batch => "Batch" {
        DIRECTORY_NOT_FOUND = "E060", High, Halts,
            "Directory not found",
            "Check the directory path";
        NOT_A_DIRECTORY = "E061", Medium, Halts,
            "Path is not a directory",
            "Pass a directory or a single file";
        DISCOVERY_FAILED = "E062", High, Halts,
            "Directory traversal failed",
            "Check directory permissions";
        NO_SOURCE_FILES = "E063", Low, Recovered,
            "No .swift files found",
            "Check the directory or enable recursive discovery";
        WORKER_FAILURE = "E064", Critical, Halts,
            "A worker thread panicked",
            "File a bug report with the batch input";
    }
}

pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const FILE_VALIDATION_PASSED: Code = Code::new("I007");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const LEXICAL_VALIDATION_PASSED: Code = Code::new("I021");
    pub const VOCABULARY_LOADED: Code = Code::new("I030");
    pub const BATCH_PROCESSING_COMPLETE: Code = Code::new("I060");
    pub const REPORT_GENERATED: Code = Code::new("I061");
}

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        ERROR_TABLE
            .iter()
            .map(|metadata| (metadata.code.as_str(), metadata))
            .collect()
    })
}

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code).map_or(Severity::Medium, |m| m.severity)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code).map_or(true, ErrorMetadata::recoverable)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code).is_some_and(ErrorMetadata::requires_halt)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code).map_or("Unknown error", |m| m.description)
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code).map_or("No specific action available", |m| m.recommended_action)
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code).map_or("Unknown", |m| m.category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        assert_eq!(registry().len(), ERROR_TABLE.len());
    }

    #[test]
    fn test_recovered_fragments_never_halt() {
        for code in [
            lexical::INVALID_CHARACTER,
            lexical::UNTERMINATED_STRING,
            lexical::MALFORMED_NUMBER,
            lexical::INVALID_TOKEN,
            lexical::UNCLOSED_COMMENT,
            lexical::UNCLOSED_MULTILINE_STRING,
            lexical::NAMELESS_TYPE_DECLARATION,
        ] {
            assert!(is_recoverable(code.as_str()));
            assert!(!requires_halt(code.as_str()));
            assert_eq!(get_category(code.as_str()), "Lexical");
        }
    }

    #[test]
    fn test_configuration_errors_halt() {
        assert!(requires_halt(configuration::UNKNOWN_LITERAL.as_str()));
        assert_eq!(
            get_severity(configuration::UNKNOWN_LITERAL.as_str()),
            Severity::Critical
        );
        assert_eq!(get_category(batch::WORKER_FAILURE.as_str()), "Batch");
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_action("E999"), "No specific action available");
        assert_eq!(get_category("E999"), "Unknown");
        assert!(is_recoverable("E999"));
        assert!(!requires_halt("E999"));
    }
}
