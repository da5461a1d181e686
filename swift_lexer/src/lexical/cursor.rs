use crate::utils::Position;

/// Current line plus (row, column) bookkeeping.
///
/// Offsets are relative to the column and counted in characters. Reads past
/// the end of the line yield `None`; the cursor never looks at another line.
#[derive(Debug, Clone, Default)]
pub struct LineCursor {
    line: Vec<char>,
    row: usize,
    column: usize,
}

impl LineCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the line and moves the column back to 0; the row is untouched
    pub fn load_line(&mut self, text: &str) {
        self.line = text.chars().collect();
        self.column = 0;
    }

    pub fn next_row(&mut self) {
        self.row += 1;
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }

    pub fn peek(&self, offset: usize) -> Option<char> {
        self.line.get(self.column + offset).copied()
    }

    pub fn is_ended(&self, offset: usize) -> bool {
        self.column + offset >= self.line.len()
    }

    pub fn remaining(&self) -> usize {
        self.line.len().saturating_sub(self.column)
    }

    pub fn advance(&mut self, n: usize) {
        self.column = (self.column + n).min(self.line.len());
    }

    /// Characters in `[column + from, column + to)`, clamped to the line
    pub fn slice(&self, from: usize, to: usize) -> String {
        let start = (self.column + from).min(self.line.len());
        let end = (self.column + to).min(self.line.len()).max(start);
        self.line[start..end].iter().collect()
    }

    /// Characters between two absolute columns of the current line
    pub fn text_between(&self, start: usize, end: usize) -> String {
        let end = end.min(self.line.len());
        let start = start.min(end);
        self.line[start..end].iter().collect()
    }

    /// Number of consecutive characters from `offset` satisfying `predicate`
    pub fn count_while<F>(&self, offset: usize, predicate: F) -> usize
    where
        F: Fn(char) -> bool,
    {
        self.line
            .iter()
            .skip(self.column + offset)
            .take_while(|&&c| predicate(c))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_end_detection() {
        let mut cursor = LineCursor::new();
        cursor.load_line("ab");
        assert_eq!(cursor.peek(0), Some('a'));
        assert_eq!(cursor.peek(1), Some('b'));
        assert_eq!(cursor.peek(2), None);
        assert!(!cursor.is_ended(1));
        assert!(cursor.is_ended(2));

        cursor.advance(5);
        assert!(cursor.is_ended(0));
        assert_eq!(cursor.column(), 2);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_slices_count_characters() {
        let mut cursor = LineCursor::new();
        cursor.load_line("é = \"ü\"");
        assert_eq!(cursor.slice(0, 1), "é");
        cursor.advance(4);
        assert_eq!(cursor.slice(0, 3), "\"ü\"");
        assert_eq!(cursor.slice(1, 10), "ü\"");
        assert_eq!(cursor.text_between(0, 3), "é =");
    }

    #[test]
    fn test_rows_advance_independently_of_lines() {
        let mut cursor = LineCursor::new();
        cursor.load_line("first");
        cursor.advance(3);
        cursor.next_row();
        cursor.load_line("second");
        assert_eq!(cursor.position(), Position::new(1, 0));
    }

    #[test]
    fn test_count_while() {
        let mut cursor = LineCursor::new();
        cursor.load_line("  x");
        assert_eq!(cursor.count_while(0, |c| c == ' '), 2);
        assert_eq!(cursor.count_while(2, |c| c == ' '), 0);
    }
}
