//! Trie construction from a word list
//!
//! Words are grouped by their character at each depth; every distinct
//! character gets one child state. A child accepts a category when a word
//! ends exactly there. Spellings resolve through `TokenCategory::from_literal`,
//! so one state can never be claimed by two categories; repeated words are
//! harmless.

use super::state::{AutomatonState, StateId};
use super::Automaton;
use crate::logging::codes;
use crate::tokens::TokenCategory;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Vocabulary literal '{literal}' does not name a known token category")]
    UnknownLiteral { literal: String },

    #[error("Vocabulary contains an empty literal")]
    EmptyLiteral,
}

impl BuildError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            BuildError::UnknownLiteral { .. } => codes::configuration::UNKNOWN_LITERAL,
            BuildError::EmptyLiteral => codes::configuration::EMPTY_LITERAL,
        }
    }
}

struct Entry {
    chars: Vec<char>,
    category: TokenCategory,
}

/// Builds an [`Automaton`] from literal spellings
pub struct AutomatonBuilder {
    entries: Vec<Entry>,
}

impl AutomatonBuilder {
    /// Resolves every word to its category up front so a bad vocabulary fails
    /// before any state exists
    pub fn new<I, S>(words: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                return Err(BuildError::EmptyLiteral);
            }
            let category =
                TokenCategory::from_literal(word).ok_or_else(|| BuildError::UnknownLiteral {
                    literal: word.to_string(),
                })?;
            entries.push(Entry {
                chars: word.chars().collect(),
                category,
            });
        }
        Ok(Self { entries })
    }

    /// Builder over the canonical spellings of `categories`; structural
    /// categories are skipped
    pub fn from_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = TokenCategory>,
    {
        let entries = categories
            .into_iter()
            .filter_map(|category| {
                category.literal().map(|literal| Entry {
                    chars: literal.chars().collect(),
                    category,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn build(self) -> Automaton {
        let mut states = vec![AutomatonState::default()];
        let all: Vec<&Entry> = self.entries.iter().collect();
        Self::build_level(&mut states, 0, &all, 0);

        Automaton::from_states(states, self.entries.len())
    }

    fn build_level(
        states: &mut Vec<AutomatonState>,
        parent: StateId,
        entries: &[&Entry],
        depth: usize,
    ) {
        let mut groups: BTreeMap<char, Vec<&Entry>> = BTreeMap::new();
        for &entry in entries {
            if let Some(&ch) = entry.chars.get(depth) {
                groups.entry(ch).or_default().push(entry);
            }
        }

        for (ch, group) in groups {
            let child = states.len();
            states.push(AutomatonState::default());
            states[parent].add_transition(ch, child);

            if let Some(entry) = group.iter().find(|e| e.chars.len() == depth + 1) {
                states[child].set_accepts(entry.category);
            }

            Self::build_level(states, child, &group, depth + 1);
        }
    }
}
