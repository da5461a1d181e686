//! Word lists the lexer's automata are built from
//!
//! The built-in vocabulary is derived from the token category table. Custom
//! vocabularies are loaded from a directory of plain word lists
//! (`operators.txt`, `keywords.txt`, optional `punctuation.txt`, one word per
//! line) or from a single TOML file with `operators`, `keywords` and
//! `punctuation` arrays.

use crate::config::compile_time::lexical::MAX_VOCABULARY_WORDS;
use crate::logging::codes;
use crate::tokens::{CategoryClass, TokenCategory};
use crate::{log_debug, log_error};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const OPERATORS_FILE: &str = "operators.txt";
pub const KEYWORDS_FILE: &str = "keywords.txt";
pub const PUNCTUATION_FILE: &str = "punctuation.txt";

#[derive(Debug, Clone, thiserror::Error)]
pub enum VocabularyError {
    #[error("Vocabulary file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read vocabulary file {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid vocabulary file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Vocabulary list '{list}' is empty")]
    Empty { list: &'static str },

    #[error("Vocabulary has {count} words (max {MAX_VOCABULARY_WORDS})")]
    TooLarge { count: usize },
}

impl VocabularyError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            VocabularyError::NotFound { .. } => codes::configuration::VOCABULARY_NOT_FOUND,
            VocabularyError::Io { .. } => codes::configuration::VOCABULARY_IO_ERROR,
            VocabularyError::Parse { .. } => codes::configuration::VOCABULARY_PARSE_ERROR,
            VocabularyError::Empty { .. } => codes::configuration::VOCABULARY_EMPTY,
            VocabularyError::TooLarge { .. } => codes::configuration::VOCABULARY_TOO_LARGE,
        }
    }
}

fn builtin_words(class: CategoryClass) -> Vec<String> {
    TokenCategory::fixed_of_class(class)
        .filter_map(|category| category.literal())
        .map(str::to_string)
        .collect()
}

fn builtin_punctuation() -> Vec<String> {
    builtin_words(CategoryClass::Punctuation)
}

/// Three ordered literal lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    operators: Vec<String>,
    keywords: Vec<String>,
    #[serde(default = "builtin_punctuation")]
    punctuation: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Vocabulary {
    pub fn new(operators: Vec<String>, keywords: Vec<String>, punctuation: Vec<String>) -> Self {
        Self {
            operators,
            keywords,
            punctuation,
        }
    }

    /// Every keyword, operator and punctuation spelling the category table knows
    pub fn builtin() -> Self {
        Self {
            operators: builtin_words(CategoryClass::Operator),
            keywords: builtin_words(CategoryClass::Keyword),
            punctuation: builtin_punctuation(),
        }
    }

    /// Loads `operators.txt`, `keywords.txt` and, if present, `punctuation.txt`
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, VocabularyError> {
        let dir = dir.as_ref();
        let punctuation = dir.join(PUNCTUATION_FILE);
        let punctuation = punctuation.is_file().then_some(punctuation);

        Self::from_files(
            dir.join(OPERATORS_FILE),
            dir.join(KEYWORDS_FILE),
            punctuation,
        )
    }

    pub fn from_files<P: AsRef<Path>>(
        operators: P,
        keywords: P,
        punctuation: Option<P>,
    ) -> Result<Self, VocabularyError> {
        let punctuation = match punctuation {
            Some(path) => read_word_list(path.as_ref())?,
            None => builtin_punctuation(),
        };

        let vocabulary = Self {
            operators: read_word_list(operators.as_ref())?,
            keywords: read_word_list(keywords.as_ref())?,
            punctuation,
        };
        vocabulary.validate()?;

        log_debug!("Vocabulary loaded from word lists",
            "operators" => vocabulary.operators.len(),
            "keywords" => vocabulary.keywords.len(),
            "punctuation" => vocabulary.punctuation.len()
        );

        Ok(vocabulary)
    }

    /// Parses a TOML document with `operators`, `keywords` and optional `punctuation`
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, VocabularyError> {
        let vocabulary: Vocabulary =
            toml::from_str(content).map_err(|e| VocabularyError::Parse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let content = read_file(path)?;
        Self::from_toml_str(&content, path)
    }

    /// Loads from a directory of word lists or a `.toml` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    pub fn validate(&self) -> Result<(), VocabularyError> {
        if self.operators.is_empty() {
            return Err(VocabularyError::Empty { list: "operators" });
        }
        if self.keywords.is_empty() {
            return Err(VocabularyError::Empty { list: "keywords" });
        }
        let count = self.word_count();
        if count > MAX_VOCABULARY_WORDS {
            return Err(VocabularyError::TooLarge { count });
        }
        Ok(())
    }

    pub fn operators(&self) -> &[String] {
        &self.operators
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn punctuation(&self) -> &[String] {
        &self.punctuation
    }

    pub fn word_count(&self) -> usize {
        self.operators.len() + self.keywords.len() + self.punctuation.len()
    }
}

fn read_file(path: &Path) -> Result<String, VocabularyError> {
    if !path.exists() {
        let error = VocabularyError::NotFound {
            path: path.to_path_buf(),
        };
        log_error!(error.error_code(), "Vocabulary file not found",
            "path" => path.display()
        );
        return Err(error);
    }

    fs::read_to_string(path).map_err(|e| {
        let error = VocabularyError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        log_error!(error.error_code(), "Failed to read vocabulary file",
            "path" => path.display(),
            "error" => e
        );
        error
    })
}

/// One word per line, trimmed; blank lines are skipped
fn read_word_list(path: &Path) -> Result<Vec<String>, VocabularyError> {
    let content = read_file(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_covers_every_fixed_spelling() {
        let vocabulary = Vocabulary::builtin();
        let fixed = TokenCategory::ALL
            .iter()
            .filter(|c| c.literal().is_some())
            .count();
        assert_eq!(vocabulary.word_count(), fixed);
        assert!(vocabulary.keywords().iter().any(|k| k == "let"));
        assert!(vocabulary.operators().iter().any(|o| o == "try?"));
        assert_eq!(vocabulary.punctuation().len(), 8);
    }

    #[test]
    fn test_from_dir_trims_and_skips_blank_lines() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(OPERATORS_FILE), "+\n  ==  \n\n-\r\n").unwrap();
        fs::write(dir.path().join(KEYWORDS_FILE), "let\nvar\n").unwrap();

        let vocabulary = Vocabulary::from_dir(dir.path()).unwrap();
        assert_eq!(vocabulary.operators(), ["+", "==", "-"]);
        assert_eq!(vocabulary.keywords(), ["let", "var"]);
        // punctuation falls back to the built-in list
        assert_eq!(vocabulary.punctuation().len(), 8);
    }

    #[test]
    fn test_from_dir_with_punctuation_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(OPERATORS_FILE), "+").unwrap();
        fs::write(dir.path().join(KEYWORDS_FILE), "let").unwrap();
        fs::write(dir.path().join(PUNCTUATION_FILE), "(\n)\n").unwrap();

        let vocabulary = Vocabulary::from_dir(dir.path()).unwrap();
        assert_eq!(vocabulary.punctuation(), ["(", ")"]);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(OPERATORS_FILE), "+").unwrap();

        let result = Vocabulary::from_dir(dir.path());
        assert_matches!(result, Err(VocabularyError::NotFound { path }) if path.ends_with(KEYWORDS_FILE));
    }

    #[test]
    fn test_empty_list_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(OPERATORS_FILE), "\n\n").unwrap();
        fs::write(dir.path().join(KEYWORDS_FILE), "let").unwrap();

        assert_matches!(
            Vocabulary::from_dir(dir.path()),
            Err(VocabularyError::Empty { list: "operators" })
        );
    }

    #[test]
    fn test_toml_vocabulary() {
        let content = r#"
operators = ["=", "+"]
keywords = ["let"]
"#;
        let vocabulary = Vocabulary::from_toml_str(content, Path::new("vocab.toml")).unwrap();
        assert_eq!(vocabulary.operators(), ["=", "+"]);
        assert_eq!(vocabulary.punctuation().len(), 8);

        let result = Vocabulary::from_toml_str("operators = 3", Path::new("vocab.toml"));
        assert_matches!(result, Err(VocabularyError::Parse { .. }));
    }

    #[test]
    fn test_load_dispatches_on_path_kind() {
        let dir = tempdir().unwrap();
        let toml_path = dir.path().join("vocab.toml");
        fs::write(&toml_path, "operators = [\"+\"]\nkeywords = [\"var\"]\n").unwrap();
        let vocabulary = Vocabulary::load(&toml_path).unwrap();
        assert_eq!(vocabulary.keywords(), ["var"]);

        fs::write(dir.path().join(OPERATORS_FILE), "-").unwrap();
        fs::write(dir.path().join(KEYWORDS_FILE), "let").unwrap();
        let vocabulary = Vocabulary::load(dir.path()).unwrap();
        assert_eq!(vocabulary.operators(), ["-"]);
    }
}
