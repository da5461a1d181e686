use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Coarse grouping of token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CategoryClass {
    Keyword,
    Operator,
    Punctuation,
    Literal,
    Identifier,
    Whitespace,
    Comment,
    TypeDeclaration,
    Invalid,
}

impl CategoryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryClass::Keyword => "keyword",
            CategoryClass::Operator => "operator",
            CategoryClass::Punctuation => "punctuation",
            CategoryClass::Literal => "literal",
            CategoryClass::Identifier => "identifier",
            CategoryClass::Whitespace => "whitespace",
            CategoryClass::Comment => "comment",
            CategoryClass::TypeDeclaration => "type_declaration",
            CategoryClass::Invalid => "invalid",
        }
    }

    /// Whitespace and comments
    pub fn is_trivia(&self) -> bool {
        matches!(self, CategoryClass::Whitespace | CategoryClass::Comment)
    }
}

/// Generates `TokenCategory` together with its literal, name and class tables.
///
/// `structural` entries have no fixed spelling; `fixed` entries carry the exact
/// source text they stand for.
macro_rules! token_categories {
    (
        structural {
            $( $s_variant:ident => ($s_name:literal, $s_class:ident) ),* $(,)?
        }
        fixed {
            $( $f_variant:ident => ($f_name:literal, $f_literal:literal, $f_class:ident) ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TokenCategory {
            $( $s_variant, )*
            $( $f_variant, )*
        }

        impl TokenCategory {
            /// Every category in declaration order
            pub const ALL: &'static [TokenCategory] = &[
                $( TokenCategory::$s_variant, )*
                $( TokenCategory::$f_variant, )*
            ];

            /// Canonical source spelling, `None` for structural categories
            pub const fn literal(self) -> Option<&'static str> {
                match self {
                    $( TokenCategory::$s_variant => None, )*
                    $( TokenCategory::$f_variant => Some($f_literal), )*
                }
            }

            /// Stable upper-case display name
            pub const fn name(self) -> &'static str {
                match self {
                    $( TokenCategory::$s_variant => $s_name, )*
                    $( TokenCategory::$f_variant => $f_name, )*
                }
            }

            pub const fn class(self) -> CategoryClass {
                match self {
                    $( TokenCategory::$s_variant => CategoryClass::$s_class, )*
                    $( TokenCategory::$f_variant => CategoryClass::$f_class, )*
                }
            }
        }
    };
}

token_categories! {
    structural {
        Identifier => ("IDENTIFIER", Identifier),
        Invalid => ("INVALID", Invalid),
        Punctuation => ("PUNCTUATION", Punctuation),
        Whitespace => ("WHITESPACE", Whitespace),
        Tab => ("TAB", Whitespace),
        SingleLineComment => ("SINGLE_LINE_COMMENT", Comment),
        MultilineComment => ("MULTILINE_COMMENT", Comment),
        StringLiteral => ("STRING_LITERAL", Literal),
        MultilineString => ("MULTILINE_STRING", Literal),
        Int => ("INT", Literal),
        Float => ("FLOAT", Literal),
        TypeDeclaration => ("TYPE_DECLARATION", TypeDeclaration),
    }
    fixed {
        // Keywords
        Associativity => ("ASSOCIATIVITY", "associativity", Keyword),
        Break => ("BREAK", "break", Keyword),
        Case => ("CASE", "case", Keyword),
        Catch => ("CATCH", "catch", Keyword),
        Class => ("CLASS", "class", Keyword),
        Continue => ("CONTINUE", "continue", Keyword),
        Convenience => ("CONVENIENCE", "convenience", Keyword),
        Default => ("DEFAULT", "default", Keyword),
        Defer => ("DEFER", "defer", Keyword),
        Deinit => ("DEINIT", "deinit", Keyword),
        DidSet => ("DID_SET", "didSet", Keyword),
        Do => ("DO", "do", Keyword),
        Dynamic => ("DYNAMIC", "dynamic", Keyword),
        Else => ("ELSE", "else", Keyword),
        Enum => ("ENUM", "enum", Keyword),
        Extension => ("EXTENSION", "extension", Keyword),
        Fallthrough => ("FALLTHROUGH", "fallthrough", Keyword),
        False => ("FALSE", "false", Keyword),
        Fileprivate => ("FILE_PRIVATE", "fileprivate", Keyword),
        Final => ("FINAL", "final", Keyword),
        For => ("FOR", "for", Keyword),
        Func => ("FUNC", "func", Keyword),
        Get => ("GET", "get", Keyword),
        Guard => ("GUARD", "guard", Keyword),
        If => ("IF", "if", Keyword),
        Import => ("IMPORT", "import", Keyword),
        In => ("IN", "in", Keyword),
        Indirect => ("INDIRECT", "indirect", Keyword),
        Infix => ("INFIX", "infix", Keyword),
        Init => ("INIT", "init", Keyword),
        Inout => ("INOUT", "inout", Keyword),
        Internal => ("INTERNAL", "internal", Keyword),
        Lazy => ("LAZY", "lazy", Keyword),
        Left => ("LEFT", "left", Keyword),
        Let => ("LET", "let", Keyword),
        Mutating => ("MUTATING", "mutating", Keyword),
        Nil => ("NIL", "nil", Keyword),
        NoneKeyword => ("NONE", "none", Keyword),
        Nonmutating => ("NONMUTATING", "nonmutating", Keyword),
        OperatorKeyword => ("OPERATOR", "operator", Keyword),
        Optional => ("OPTIONAL", "optional", Keyword),
        Override => ("OVERRIDE", "override", Keyword),
        Postfix => ("POSTFIX", "postfix", Keyword),
        Precedence => ("PRECEDENCE", "precedence", Keyword),
        Prefix => ("PREFIX", "prefix", Keyword),
        Private => ("PRIVATE", "private", Keyword),
        Protocol => ("PROTOCOL", "protocol", Keyword),
        Public => ("PUBLIC", "public", Keyword),
        Repeat => ("REPEAT", "repeat", Keyword),
        Required => ("REQUIRED", "required", Keyword),
        Rethrows => ("RETHROWS", "rethrows", Keyword),
        Return => ("RETURN", "return", Keyword),
        Right => ("RIGHT", "right", Keyword),
        Safe => ("SAFE", "safe", Keyword),
        SelfKeyword => ("SELF", "self", Keyword),
        Set => ("SET", "set", Keyword),
        Static => ("STATIC", "static", Keyword),
        Struct => ("STRUCT", "struct", Keyword),
        Subscript => ("SUBSCRIPT", "subscript", Keyword),
        Super => ("SUPER", "super", Keyword),
        Switch => ("SWITCH", "switch", Keyword),
        Throw => ("THROW", "throw", Keyword),
        Throws => ("THROWS", "throws", Keyword),
        True => ("TRUE", "true", Keyword),
        Typealias => ("TYPE_ALIAS", "typealias", Keyword),
        Unowned => ("UNOWNED", "unowned", Keyword),
        Var => ("VAR", "var", Keyword),
        Weak => ("WEAK", "weak", Keyword),
        Where => ("WHERE", "where", Keyword),
        While => ("WHILE", "while", Keyword),
        WillSet => ("WILL_SET", "willSet", Keyword),

        // Operators
        Addition => ("ADDITION", "+", Operator),
        Subtraction => ("SUBTRACTION", "-", Operator),
        Multiplication => ("MULTIPLICATION", "*", Operator),
        Division => ("DIVISION", "/", Operator),
        Remainder => ("REMAINDER", "%", Operator),
        BitwiseAnd => ("BITWISE_AND", "&", Operator),
        BitwiseOr => ("BITWISE_OR", "|", Operator),
        BitwiseXor => ("BITWISE_XOR", "^", Operator),
        BitwiseNot => ("BITWISE_NOT", "~", Operator),
        LeftShift => ("LEFT_SHIFT", "<<", Operator),
        RightShift => ("RIGHT_SHIFT", ">>", Operator),
        Power => ("POWER", "**", Operator),
        HalfOpenRange => ("HALF_OPEN_RANGE_OPERATOR", "..<", Operator),
        ClosedRange => ("CLOSED_RANGE_OPERATOR", "...", Operator),
        LessThan => ("LESS_THAN", "<", Operator),
        GreaterThan => ("GREATER_THAN", ">", Operator),
        LessThanOrEqualTo => ("LESS_THAN_OR_EQUAL_TO", "<=", Operator),
        GreaterThanOrEqualTo => ("GREATER_THAN_OR_EQUAL_TO", ">=", Operator),
        EqualTo => ("EQUAL_TO", "==", Operator),
        NotEqualTo => ("NOT_EQUAL_TO", "!=", Operator),
        IdentityEquality => ("IDENTITY_EQUALITY", "===", Operator),
        IdentityNotEqualTo => ("IDENTITY_NOT_EQUAL_TO", "!==", Operator),
        ThreeWayComparison => ("THREE_WAY_COMPARISON", "<=>", Operator),
        LogicalAnd => ("LOGICAL_AND", "&&", Operator),
        LogicalOr => ("LOGICAL_OR", "||", Operator),
        Not => ("NOT", "!", Operator),
        TernaryConditional => ("TERNARY_CONDITIONAL", ":", Operator),
        QuestionMark => ("QUESTION_MARK", "?", Operator),
        NilCoalescing => ("NIL_COALESCING_OPERATOR", "??", Operator),
        Assignment => ("ASSIGNMENT", "=", Operator),
        AdditionAssignment => ("ADDITION_ASSIGNMENT", "+=", Operator),
        SubtractionAssignment => ("SUBTRACTION_ASSIGNMENT", "-=", Operator),
        MultiplicationAssignment => ("MULTIPLICATION_ASSIGNMENT", "*=", Operator),
        DivisionAssignment => ("DIVISION_ASSIGNMENT", "/=", Operator),
        RemainderAssignment => ("REMAINDER_ASSIGNMENT", "%=", Operator),
        PowerAssignment => ("POWER_ASSIGNMENT", "**=", Operator),
        BitwiseAndAssignment => ("BITWISE_AND_ASSIGNMENT", "&=", Operator),
        BitwiseOrAssignment => ("BITWISE_OR_ASSIGNMENT", "|=", Operator),
        BitwiseXorAssignment => ("BITWISE_XOR_ASSIGNMENT", "^=", Operator),
        LeftShiftAssignment => ("LEFT_SHIFT_ASSIGNMENT", "<<=", Operator),
        RightShiftAssignment => ("RIGHT_SHIFT_ASSIGNMENT", ">>=", Operator),
        LogicalAndAssignment => ("LOGICAL_AND_ASSIGNMENT", "&&=", Operator),
        LogicalOrAssignment => ("LOGICAL_OR_ASSIGNMENT", "||=", Operator),
        NilCoalescingAssignment => ("NIL_COALESCING_ASSIGNMENT", "??=", Operator),
        OptionalAssignment => ("OPTIONAL_ASSIGNMENT", "?=", Operator),
        TypeChecking => ("TYPE_CHECKING", "as", Operator),
        OptionalTypeCast => ("OPTIONAL_TYPE_CAST", "as?", Operator),
        ForcedTypeCast => ("FORCED_TYPE_CAST", "as!", Operator),
        TypeCheckingIs => ("TYPE_CHECKING_IS", "is", Operator),
        ErrorHandling => ("ERROR_HANDLING", "try", Operator),
        OptionalErrorHandling => ("OPTIONAL_ERROR_HANDLING", "try?", Operator),
        ForcedErrorHandling => ("FORCED_ERROR_HANDLING", "try!", Operator),
        Dot => ("DOT", ".", Operator),
        KeyPathExpression => ("KEY_PATH_EXPRESSION", "\\.", Operator),

        // Punctuation
        Comma => ("COMMA", ",", Punctuation),
        Semicolon => ("SEMICOLON", ";", Punctuation),
        LeftParenthesis => ("LEFT_PARENTHESIS", "(", Punctuation),
        RightParenthesis => ("RIGHT_PARENTHESIS", ")", Punctuation),
        LeftBracket => ("LEFT_BRACKET", "[", Punctuation),
        RightBracket => ("RIGHT_BRACKET", "]", Punctuation),
        LeftCurlyBrace => ("LEFT_CURLY_BRACE", "{", Punctuation),
        RightCurlyBrace => ("RIGHT_CURLY_BRACE", "}", Punctuation),
    }
}

static LITERAL_INDEX: OnceLock<HashMap<&'static str, TokenCategory>> = OnceLock::new();

fn literal_index() -> &'static HashMap<&'static str, TokenCategory> {
    LITERAL_INDEX.get_or_init(|| {
        TokenCategory::ALL
            .iter()
            .filter_map(|category| category.literal().map(|literal| (literal, *category)))
            .collect()
    })
}

impl TokenCategory {
    /// Exact-spelling lookup over the fixed-spelling categories
    pub fn from_literal(text: &str) -> Option<TokenCategory> {
        literal_index().get(text).copied()
    }

    /// Fixed-spelling categories of one class, in declaration order
    pub fn fixed_of_class(class: CategoryClass) -> impl Iterator<Item = TokenCategory> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |category| category.literal().is_some() && category.class() == class)
    }

    pub fn is_keyword(&self) -> bool {
        self.class() == CategoryClass::Keyword
    }

    pub fn is_operator(&self) -> bool {
        self.class() == CategoryClass::Operator
    }

    pub fn is_trivia(&self) -> bool {
        self.class().is_trivia()
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
