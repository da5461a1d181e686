use serde::Serialize;

/// Append-only store of token text; indices never shift
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymbolTable {
    entries: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` and returns its index
    pub fn push(&mut self, text: String) -> usize {
        self.entries.push(text);
        self.entries.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_stable() {
        let mut table = SymbolTable::new();
        assert_eq!(table.push("let".to_string()), 0);
        assert_eq!(table.push(" ".to_string()), 1);
        assert_eq!(table.push("x".to_string()), 2);
        assert_eq!(table.get(0), Some("let"));
        assert_eq!(table.get(2), Some("x"));
        assert_eq!(table.get(3), None);
        assert_eq!(table.len(), 3);
    }
}
