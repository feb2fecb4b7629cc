//! Keyword tables.
//!
//! The lexer scans a maximal identifier run first and only then asks a
//! [`KeywordTable`] whether the exact text is a keyword. Spellings are
//! configuration: the same [`TokenKind`]s can be reached from English or
//! Kyrgyz words, selected with a [`Dialect`].
//!
//! The built-in tables are initialised once, on first use, and never mutated
//! afterwards, so any number of lexers may share them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use thiserror::Error;

use crate::token::TokenKind;

static ENGLISH: LazyLock<KeywordTable> = LazyLock::new(|| {
    KeywordTable::from_iter([
        ("fn", TokenKind::Function),
        ("let", TokenKind::Let),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("return", TokenKind::Return),
    ])
});

static KYRGYZ: LazyLock<KeywordTable> = LazyLock::new(|| {
    KeywordTable::from_iter([
        ("функция", TokenKind::Function),
        ("функ", TokenKind::Function),
        ("сакта", TokenKind::Let),
        ("бер", TokenKind::Let),
        ("туура", TokenKind::True),
        ("ката", TokenKind::False),
        ("эгер", TokenKind::If),
        ("же", TokenKind::Else),
        ("кайтар", TokenKind::Return),
    ])
});

/// Exact-match, case-sensitive mapping from spelling to keyword kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    words: HashMap<String, TokenKind>,
}

impl KeywordTable {
    /// The English keyword set.
    pub fn english() -> &'static KeywordTable {
        &ENGLISH
    }

    /// The Kyrgyz keyword set.
    pub fn kyrgyz() -> &'static KeywordTable {
        &KYRGYZ
    }

    /// Resolve an identifier run. Anything not in the table is [`TokenKind::Ident`].
    pub fn lookup(&self, ident: &str) -> TokenKind {
        self.words.get(ident).copied().unwrap_or(TokenKind::Ident)
    }

    /// Spellings mapped to `kind`, sorted for stable output.
    pub fn spellings(&self, kind: TokenKind) -> Vec<&str> {
        let mut words: Vec<&str> = self
            .words
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(word, _)| word.as_str())
            .collect();
        words.sort_unstable();
        words
    }
}

impl<S: Into<String>> FromIterator<(S, TokenKind)> for KeywordTable {
    fn from_iter<I: IntoIterator<Item = (S, TokenKind)>>(iter: I) -> Self {
        Self {
            words: iter
                .into_iter()
                .map(|(word, kind)| (word.into(), kind))
                .collect(),
        }
    }
}

/// A named built-in keyword set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    #[default]
    English,
    Kyrgyz,
}

impl Dialect {
    pub fn keywords(self) -> &'static KeywordTable {
        match self {
            Dialect::English => KeywordTable::english(),
            Dialect::Kyrgyz => KeywordTable::kyrgyz(),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Dialect::English => "en",
            Dialect::Kyrgyz => "ky",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::English => write!(f, "english"),
            Dialect::Kyrgyz => write!(f, "kyrgyz"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dialect '{0}' (expected one of: en, english, ky, kyrgyz)")]
pub struct DialectError(pub String);

impl FromStr for Dialect {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Dialect::English),
            "ky" | "kyrgyz" | "кыргызча" => Ok(Dialect::Kyrgyz),
            _ => Err(DialectError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_lookup() {
        let table = KeywordTable::english();
        assert_eq!(table.lookup("let"), TokenKind::Let);
        assert_eq!(table.lookup("fn"), TokenKind::Function);
        assert_eq!(table.lookup("return"), TokenKind::Return);
        assert_eq!(table.lookup("Let"), TokenKind::Ident);
        assert_eq!(table.lookup("letx"), TokenKind::Ident);
    }

    #[test]
    fn kyrgyz_has_two_spellings_for_let_and_function() {
        let table = KeywordTable::kyrgyz();
        assert_eq!(table.spellings(TokenKind::Let), vec!["бер", "сакта"]);
        assert_eq!(table.spellings(TokenKind::Function), vec!["функ", "функция"]);
        assert_eq!(table.lookup("кайтар"), TokenKind::Return);
        assert_eq!(table.lookup("let"), TokenKind::Ident);
    }

    #[test]
    fn kyrgyz_is_case_sensitive() {
        assert_eq!(KeywordTable::kyrgyz().lookup("Сакта"), TokenKind::Ident);
    }

    #[test]
    fn every_builtin_maps_only_keywords() {
        for dialect in [Dialect::English, Dialect::Kyrgyz] {
            let table = dialect.keywords();
            for kind in TokenKind::ALL {
                if !kind.is_keyword() {
                    assert!(table.spellings(kind).is_empty(), "{dialect}: {kind:?}");
                } else {
                    assert!(!table.spellings(kind).is_empty(), "{dialect}: {kind:?}");
                }
            }
        }
    }

    #[test]
    fn custom_table() {
        let table: KeywordTable = [("soit", TokenKind::Let)].into_iter().collect();
        assert_eq!(table.lookup("soit"), TokenKind::Let);
        assert_eq!(table.spellings(TokenKind::Let), vec!["soit"]);
        assert_eq!(table.lookup("let"), TokenKind::Ident);
    }

    #[test]
    fn dialect_from_str() {
        assert_eq!("en".parse::<Dialect>(), Ok(Dialect::English));
        assert_eq!("Kyrgyz".parse::<Dialect>(), Ok(Dialect::Kyrgyz));
        assert_eq!(" ky ".parse::<Dialect>(), Ok(Dialect::Kyrgyz));
        let err = "klingon".parse::<Dialect>().expect_err("not a dialect");
        assert!(err.to_string().contains("klingon"));
    }
}
