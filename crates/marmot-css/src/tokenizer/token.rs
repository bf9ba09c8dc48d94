//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! The subset of the token stream the cascade needs: idents, functions,
//! at-keywords, hashes, strings, numeric tokens, delimiters, and punctuation.
//! `<url-token>`, `<CDO-token>`, and `<CDC-token>` are not modeled; the
//! inputs they appear in degrade to delim tokens and are skipped as
//! malformed rules by the parser.

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<hash-token>` with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// "id" - the hash token's value is a valid identifier
    Id,
    /// "unrestricted" - the hash token's value is not a valid identifier
    Unrestricted,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// CSS tokens as defined by the CSS Syntax Module Level 3 specification.
#[derive(Debug, Clone, PartialEq)]
pub enum CssToken {
    /// "`<ident-token>`"
    /// "has a value composed of one or more code points"
    Ident(String),

    /// "`<function-token>`"
    /// "has a value composed of one or more code points, followed by U+0028 LEFT PARENTHESIS"
    Function(String),

    /// "`<at-keyword-token>`"
    /// "has a value composed of one or more code points, preceded by U+0040 COMMERCIAL AT (@)"
    AtKeyword(String),

    /// "`<hash-token>`"
    /// "has a value composed of one or more code points, preceded by U+0023 NUMBER SIGN (#)"
    Hash {
        /// "a value composed of one or more code points"
        value: String,
        /// "a type flag set to either 'id' or 'unrestricted'"
        hash_type: HashType,
    },

    /// "`<string-token>`"
    /// "has a value composed of zero or more code points"
    String(String),

    /// "`<bad-string-token>`"
    /// "represents a parsing error"
    BadString,

    /// "`<delim-token>`"
    /// "has a value composed of a single code point"
    Delim(char),

    /// "`<number-token>`"
    /// "has a numeric value"
    Number(f64),

    /// "`<percentage-token>`"
    /// "has a numeric value"
    Percentage(f64),

    /// "`<dimension-token>`"
    /// "has a numeric value... and a unit"
    Dimension {
        /// "a numeric value"
        value: f64,
        /// "a unit"
        unit: String,
    },

    /// "`<whitespace-token>`"
    /// "represents one or more whitespace code points"
    Whitespace,

    /// "`<colon-token>`"
    /// "represents U+003A COLON (:)"
    Colon,

    /// "`<semicolon-token>`"
    /// "represents U+003B SEMICOLON (;)"
    Semicolon,

    /// "`<comma-token>`"
    /// "represents U+002C COMMA (,)"
    Comma,

    /// `<[-token>`
    /// "represents U+005B LEFT SQUARE BRACKET ([)"
    LeftBracket,

    /// `<]-token>`
    /// "represents U+005D RIGHT SQUARE BRACKET (])"
    RightBracket,

    /// `<(-token>`
    /// "represents U+0028 LEFT PARENTHESIS (()"
    LeftParen,

    /// `<)-token>`
    /// "represents U+0029 RIGHT PARENTHESIS ())"
    RightParen,

    /// `<{-token>`
    /// "represents U+007B LEFT CURLY BRACKET ({)"
    LeftBrace,

    /// `<}-token>`
    /// "represents U+007D RIGHT CURLY BRACKET (})"
    RightBrace,

    /// End of file - signals end of input
    EOF,
}

impl CssToken {
    /// Create a new ident token.
    #[must_use]
    pub fn ident(value: impl Into<String>) -> Self {
        Self::Ident(value.into())
    }

    /// Create a new function token.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    /// Create a new hash token with id type.
    #[must_use]
    pub fn hash_id(value: impl Into<String>) -> Self {
        Self::Hash {
            value: value.into(),
            hash_type: HashType::Id,
        }
    }

    /// Create a new dimension token.
    #[must_use]
    pub fn dimension(value: f64, unit: impl Into<String>) -> Self {
        Self::Dimension {
            value,
            unit: unit.into(),
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

impl fmt::Display for CssToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "<ident:{v}>"),
            Self::Function(v) => write!(f, "<function:{v}(>"),
            Self::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            Self::Hash { value, hash_type } => {
                let t = match hash_type {
                    HashType::Id => "id",
                    HashType::Unrestricted => "unrestricted",
                };
                write!(f, "<hash:#{value} ({t})>")
            }
            Self::String(v) => write!(f, "<string:\"{v}\">"),
            Self::BadString => write!(f, "<bad-string>"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number(value) => write!(f, "<number:{value}>"),
            Self::Percentage(value) => write!(f, "<percentage:{value}%>"),
            Self::Dimension { value, unit } => write!(f, "<dimension:{value}{unit}>"),
            Self::Whitespace => write!(f, "<whitespace>"),
            Self::Colon => write!(f, "<colon>"),
            Self::Semicolon => write!(f, "<semicolon>"),
            Self::Comma => write!(f, "<comma>"),
            Self::LeftBracket => write!(f, "<[>"),
            Self::RightBracket => write!(f, "<]>"),
            Self::LeftParen => write!(f, "<(>"),
            Self::RightParen => write!(f, "<)>"),
            Self::LeftBrace => write!(f, "<{{>"),
            Self::RightBrace => write!(f, "<}}>"),
            Self::EOF => write!(f, "<EOF>"),
        }
    }
}
