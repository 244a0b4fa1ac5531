//! Symbols and the append-only text store
//!
//! Every document is stored as a run of [`Symbol::Char`] values closed by a
//! [`Symbol::Terminator`] carrying the document number, so terminators are
//! unique per document even though all documents spell them with the same
//! terminator character.

use crate::error::{CoreError, Result};
use core::fmt;
use core::ops::{Index, Range};

/// Document number inside a text store
pub type DocId = usize;

/// One position of the text store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// Ordinary character
    Char(char),
    /// End of the given document
    Terminator(DocId),
}

impl Symbol {
    /// Query-side comparison: any terminator matches any other terminator.
    pub fn matches(self, query: Symbol) -> bool {
        match (self, query) {
            (Symbol::Char(a), Symbol::Char(b)) => a == b,
            (Symbol::Terminator(_), Symbol::Terminator(_)) => true,
            _ => false,
        }
    }

    /// Whether this symbol closes a document
    pub fn is_terminator(self) -> bool {
        matches!(self, Symbol::Terminator(_))
    }

    /// Character used when rendering this symbol
    pub fn render(self, terminator: char) -> char {
        match self {
            Symbol::Char(c) => c,
            Symbol::Terminator(_) => terminator,
        }
    }

    /// Convert user text to query symbols, mapping the terminator character
    /// to a wildcard terminator.
    pub fn query(text: &str, terminator: char) -> Vec<Symbol> {
        text.chars()
            .map(|c| {
                if c == terminator {
                    Symbol::Terminator(DocId::MAX)
                } else {
                    Symbol::Char(c)
                }
            })
            .collect()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{c}"),
            Symbol::Terminator(doc) => write!(f, "${doc}"),
        }
    }
}

/// Render a symbol slice as a string
pub fn render(symbols: &[Symbol], terminator: char) -> String {
    symbols.iter().map(|s| s.render(terminator)).collect()
}

/// Append-only backing buffer for all indexed documents
#[derive(Debug, Clone, Default)]
pub struct TextStore {
    symbols: Vec<Symbol>,
}

impl TextStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with room for `capacity` symbols
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
        }
    }

    /// Check that `text` is a well-formed document for number `doc`.
    ///
    /// A document holds at least one symbol and ends with exactly one
    /// `terminator`, which must not occur anywhere else.
    pub fn validate(text: &str, terminator: char, doc: DocId) -> Result<()> {
        let mut count = 0usize;
        let mut last = None;
        for (position, c) in text.chars().enumerate() {
            if let Some(prev) = last {
                if prev == terminator {
                    return Err(CoreError::TerminatorInDocument {
                        doc,
                        terminator,
                        position: position - 1,
                    });
                }
            }
            last = Some(c);
            count += 1;
        }
        match last {
            None => Err(CoreError::EmptyDocument { doc }),
            Some(c) if c != terminator => Err(CoreError::MissingTerminator { doc, terminator }),
            Some(_) if count == 1 => Err(CoreError::EmptyDocument { doc }),
            Some(_) => Ok(()),
        }
    }

    /// Append a validated document and return its range in the store
    pub fn push_document(&mut self, text: &str, terminator: char, doc: DocId) -> Result<Range<usize>> {
        Self::validate(text, terminator, doc)?;
        let start = self.symbols.len();
        self.symbols.extend(text.chars().map(|c| {
            if c == terminator {
                Symbol::Terminator(doc)
            } else {
                Symbol::Char(c)
            }
        }));
        Ok(start..self.symbols.len())
    }

    /// Number of stored symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Drop every symbol from `len` on
    pub(crate) fn truncate(&mut self, len: usize) {
        self.symbols.truncate(len);
    }

    /// Whether nothing has been stored yet
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Borrow a range of the store
    pub fn slice(&self, range: Range<usize>) -> &[Symbol] {
        &self.symbols[range]
    }

    /// All stored symbols
    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl Index<usize> for TextStore {
    type Output = Symbol;

    fn index(&self, index: usize) -> &Symbol {
        &self.symbols[index]
    }
}
