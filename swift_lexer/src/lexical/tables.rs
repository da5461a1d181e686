use crate::automaton::{Automaton, AutomatonBuilder, BuildError};
use crate::tokens::{CategoryClass, TokenCategory};
use crate::vocabulary::Vocabulary;
use std::sync::{Arc, OnceLock};

/// The three recognizers a lexer consults. Immutable; share through `Arc`.
#[derive(Debug, Clone)]
pub struct LexerTables {
    operators: Automaton,
    keywords: Automaton,
    punctuation: Automaton,
}

static BUILTIN_TABLES: OnceLock<Arc<LexerTables>> = OnceLock::new();

impl LexerTables {
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Result<Self, BuildError> {
        Ok(Self {
            operators: Automaton::from_words(vocabulary.operators())?,
            keywords: Automaton::from_words(vocabulary.keywords())?,
            punctuation: Automaton::from_words(vocabulary.punctuation())?,
        })
    }

    /// Tables for the built-in vocabulary, built once per process
    pub fn builtin() -> Arc<LexerTables> {
        BUILTIN_TABLES
            .get_or_init(|| {
                let build = |class| {
                    AutomatonBuilder::from_categories(TokenCategory::fixed_of_class(class)).build()
                };
                Arc::new(Self {
                    operators: build(CategoryClass::Operator),
                    keywords: build(CategoryClass::Keyword),
                    punctuation: build(CategoryClass::Punctuation),
                })
            })
            .clone()
    }

    pub fn operators(&self) -> &Automaton {
        &self.operators
    }

    pub fn keywords(&self) -> &Automaton {
        &self.keywords
    }

    pub fn punctuation(&self) -> &Automaton {
        &self.punctuation
    }

    pub fn word_count(&self) -> usize {
        self.operators.word_count() + self.keywords.word_count() + self.punctuation.word_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_builtin_matches_builtin_vocabulary() {
        let from_vocabulary = LexerTables::from_vocabulary(&Vocabulary::builtin()).unwrap();
        let builtin = LexerTables::builtin();
        assert_eq!(builtin.word_count(), from_vocabulary.word_count());
        assert_eq!(
            builtin.operators().state_count(),
            from_vocabulary.operators().state_count()
        );
        assert_eq!(builtin.keywords().classify("guard"), Some(TokenCategory::Guard));
        assert_eq!(builtin.punctuation().classify("{"), Some(TokenCategory::LeftCurlyBrace));
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(Arc::ptr_eq(&LexerTables::builtin(), &LexerTables::builtin()));
    }

    #[test]
    fn test_keyword_in_operator_list_is_accepted_by_category() {
        // Lists are not checked against the class of each literal
        let vocabulary = Vocabulary::new(
            vec!["let".to_string()],
            vec!["var".to_string()],
            vec![],
        );
        let tables = LexerTables::from_vocabulary(&vocabulary).unwrap();
        assert_eq!(tables.operators().classify("let"), Some(TokenCategory::Let));
    }

    #[test]
    fn test_unknown_literal_fails() {
        let vocabulary = Vocabulary::new(
            vec!["+".to_string(), "+++".to_string()],
            vec!["let".to_string()],
            vec![],
        );
        assert_matches!(
            LexerTables::from_vocabulary(&vocabulary),
            Err(BuildError::UnknownLiteral { literal }) if literal == "+++"
        );
    }
}
