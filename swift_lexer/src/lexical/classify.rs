//! Character classes used by the scanner. ASCII only.

const PUNCTUATION: &str = ",;[]{}()";
const OPERATOR_CHARS: &str = "+-*/<>=?!.:&|^~%$";

pub fn is_whitespace(c: char) -> bool {
    c == ' '
}

pub fn is_tab(c: char) -> bool {
    c == '\t'
}

pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(c)
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn is_operator(c: char) -> bool {
    OPERATOR_CHARS.contains(c)
}

pub fn is_double_quote(c: char) -> bool {
    c == '"'
}

pub fn is_at(c: char) -> bool {
    c == '@'
}

pub fn is_backslash(c: char) -> bool {
    c == '\\'
}

/// Characters that terminate a word or number
pub fn is_end_of_token(c: char) -> bool {
    is_whitespace(c)
        || is_tab(c)
        || is_punctuation(c)
        || is_operator(c)
        || is_double_quote(c)
        || is_at(c)
}

/// Words classified through the operator automaton instead of the keyword one
pub fn is_alphabetic_operator(word: &str) -> bool {
    matches!(word, "as" | "try" | "is")
}

/// Whether `word` can take a `?` or `!` suffix (`as?`, `try!`)
pub fn takes_cast_suffix(word: &str) -> bool {
    matches!(word, "as" | "try")
}

pub fn is_cast_suffix(c: char) -> bool {
    c == '?' || c == '!'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiters() {
        for c in [' ', '\t', '(', ';', '+', '.', '"', '@', '$'] {
            assert!(is_end_of_token(c), "{:?}", c);
        }
        for c in ['a', 'Z', '0', '_', '#', '\\', 'é'] {
            assert!(!is_end_of_token(c), "{:?}", c);
        }
    }

    #[test]
    fn test_word_classes_are_ascii() {
        assert!(is_word_start('_'));
        assert!(!is_word_start('1'));
        assert!(is_word_char('1'));
        assert!(!is_word_start('é'));
        assert!(!is_digit('٣'));
    }

    #[test]
    fn test_alphabetic_operators() {
        assert!(is_alphabetic_operator("try"));
        assert!(is_alphabetic_operator("is"));
        assert!(!is_alphabetic_operator("tryx"));
        assert!(takes_cast_suffix("as"));
        assert!(!takes_cast_suffix("is"));
    }
}
