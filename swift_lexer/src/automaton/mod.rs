//! Trie-shaped recognizers for fixed vocabularies
//!
//! An [`Automaton`] is built once from a word list and is read-only afterwards,
//! so one instance can be shared across threads behind an `Arc`.

pub mod builder;
pub mod state;

pub use builder::{AutomatonBuilder, BuildError};
pub use state::{AutomatonState, StateId};

use crate::tokens::TokenCategory;

const ROOT: StateId = 0;

#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<AutomatonState>,
    word_count: usize,
}

impl Automaton {
    /// Resolves and builds in one step
    pub fn from_words<I, S>(words: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(AutomatonBuilder::new(words)?.build())
    }

    pub(crate) fn from_states(states: Vec<AutomatonState>, word_count: usize) -> Self {
        Self { states, word_count }
    }

    /// Category denoted by the whole of `text`, or `None`.
    ///
    /// A text that stops part-way along a path, or runs past the last edge,
    /// does not match even if a shorter word was seen on the way.
    pub fn classify(&self, text: &str) -> Option<TokenCategory> {
        let mut current = ROOT;
        for ch in text.chars() {
            current = self.states[current].next(ch)?;
        }
        if current == ROOT {
            return None;
        }
        self.states[current].accepts()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.states.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::CategoryClass;
    use assert_matches::assert_matches;

    fn operators() -> Automaton {
        let words: Vec<&str> = TokenCategory::fixed_of_class(CategoryClass::Operator)
            .filter_map(|c| c.literal())
            .collect();
        Automaton::from_words(words).unwrap()
    }

    #[test]
    fn test_every_word_classifies_to_its_category() {
        let automaton = operators();
        for category in TokenCategory::fixed_of_class(CategoryClass::Operator) {
            let literal = category.literal().unwrap();
            assert_eq!(automaton.classify(literal), Some(category), "{}", literal);
        }
    }

    #[test]
    fn test_non_word_prefix_does_not_match() {
        let automaton = operators();
        // ".." prefixes "..<" and "..." but is not itself an operator
        assert_eq!(automaton.classify(".."), None);
        // "tr" prefixes "try"
        assert_eq!(automaton.classify("tr"), None);
        // but the longer words behind it still match
        assert_eq!(automaton.classify("..<"), Some(TokenCategory::HalfOpenRange));
    }

    #[test]
    fn test_prefix_that_is_a_word_matches() {
        let automaton = operators();
        assert_eq!(automaton.classify("try"), Some(TokenCategory::ErrorHandling));
        assert_eq!(automaton.classify("try?"), Some(TokenCategory::OptionalErrorHandling));
        assert_eq!(automaton.classify("try!"), Some(TokenCategory::ForcedErrorHandling));
        assert_eq!(automaton.classify("<"), Some(TokenCategory::LessThan));
        assert_eq!(automaton.classify("<<="), Some(TokenCategory::LeftShiftAssignment));
    }

    #[test]
    fn test_overlong_input_does_not_match() {
        let automaton = operators();
        assert_eq!(automaton.classify("===="), None);
        assert_eq!(automaton.classify("+-"), None);
        assert_eq!(automaton.classify(""), None);
    }

    #[test]
    fn test_unknown_literal_is_rejected() {
        assert_matches!(
            Automaton::from_words(["let", "lett"]),
            Err(BuildError::UnknownLiteral { literal }) if literal == "lett"
        );
        assert_matches!(Automaton::from_words(["+", ""]), Err(BuildError::EmptyLiteral));
    }

    #[test]
    fn test_duplicates_are_tolerated() {
        let automaton = Automaton::from_words(["let", "let", "var"]).unwrap();
        assert_eq!(automaton.classify("let"), Some(TokenCategory::Let));
        assert_eq!(automaton.word_count(), 3);
        // root + l,e,t + v,a,r
        assert_eq!(automaton.state_count(), 7);
    }

    #[test]
    fn test_word_inside_longer_word() {
        let automaton = Automaton::from_words(["in", "inout"]).unwrap();
        assert_eq!(automaton.classify("in"), Some(TokenCategory::In));
        assert_eq!(automaton.classify("inout"), Some(TokenCategory::Inout));
        assert_eq!(automaton.classify("ino"), None);
        // root + i,n,o,u,t
        assert_eq!(automaton.state_count(), 6);
    }

    #[test]
    fn test_shared_across_threads() {
        let automaton = std::sync::Arc::new(operators());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let automaton = automaton.clone();
                std::thread::spawn(move || automaton.classify("..<"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(TokenCategory::HalfOpenRange));
        }
    }

    #[test]
    fn test_from_categories_skips_structural() {
        let automaton = AutomatonBuilder::from_categories([
            TokenCategory::Identifier,
            TokenCategory::Comma,
            TokenCategory::Semicolon,
        ])
        .build();
        assert_eq!(automaton.word_count(), 2);
        assert_eq!(automaton.classify(","), Some(TokenCategory::Comma));
    }

    #[test]
    fn test_empty_automaton() {
        let automaton = Automaton::from_words(Vec::<String>::new()).unwrap();
        assert!(automaton.is_empty());
        assert_eq!(automaton.classify("+"), None);
    }
}
