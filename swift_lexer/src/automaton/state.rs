use crate::tokens::TokenCategory;
use std::collections::BTreeMap;

/// Index of a state inside its automaton's arena
pub type StateId = usize;

/// One trie node: an optional accepting category and its outgoing edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomatonState {
    accepts: Option<TokenCategory>,
    transitions: BTreeMap<char, StateId>,
}

impl AutomatonState {
    pub fn accepts(&self) -> Option<TokenCategory> {
        self.accepts
    }

    pub fn next(&self, ch: char) -> Option<StateId> {
        self.transitions.get(&ch).copied()
    }

    pub(crate) fn set_accepts(&mut self, category: TokenCategory) {
        self.accepts = Some(category);
    }

    pub(crate) fn add_transition(&mut self, ch: char, target: StateId) {
        self.transitions.insert(ch, target);
    }
}
