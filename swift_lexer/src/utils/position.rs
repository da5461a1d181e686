//! Source location tracking
//!
//! Rows and columns are 0-based character counts within a physical line.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (row, column) position in source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Same row, `n` characters to the right
    pub fn shifted(self, n: usize) -> Self {
        Self {
            row: self.row,
            column: self.column + n,
        }
    }

    /// 1-based `line:col` form used in cargo-style diagnostics
    pub fn human(&self) -> String {
        format!("{}:{}", self.row + 1, self.column + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_human_forms() {
        let pos = Position::new(0, 4);
        assert_eq!(pos.to_string(), "[0:4]");
        assert_eq!(pos.human(), "1:5");
        assert_eq!(pos.shifted(3), Position::new(0, 7));
    }

    #[test]
    fn test_ordering_is_row_major() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }
}
