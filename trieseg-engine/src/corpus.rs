//! Corpus of terminated documents with optional unit and type lists
//!
//! The corpus text is a run of documents, each closed by the terminator
//! character. Line breaks right after a terminator are not part of the next
//! document, so one document per line works as well as one long line. If the
//! documents are alphabetically sorted tokens of types, the unit list gives
//! the number of the last document of every type and the type list names
//! the types.

use crate::error::{EngineError, Result};
use std::io::Read;
use tracing::{debug, warn};
use trieseg_core::{UnitMap, DEFAULT_TERMINATOR};

/// Documents to index
#[derive(Debug, Clone)]
pub struct Corpus {
    text: String,
    terminator: char,
    units: Option<Vec<usize>>,
    types: Vec<String>,
}

impl Corpus {
    /// Corpus over `text` using `terminator`
    pub fn new<S: Into<String>>(text: S, terminator: char) -> Self {
        Self {
            text: text.into(),
            terminator,
            units: None,
            types: Vec::new(),
        }
    }

    /// Corpus built from a list of unterminated documents
    pub fn from_documents<I, S>(documents: I, terminator: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for doc in documents {
            text.push_str(doc.as_ref());
            text.push(terminator);
        }
        Self::new(text, terminator)
    }

    /// Attach a unit list
    pub fn with_units(mut self, units: Vec<usize>) -> Self {
        self.units = Some(units);
        self
    }

    /// Attach a type list
    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = types;
        self
    }

    /// Read the corpus text and the optional unit and type lists
    pub fn from_readers<T: Read>(
        mut text: T,
        units: Option<&mut dyn Read>,
        types: Option<&mut dyn Read>,
        terminator: char,
    ) -> Result<Self> {
        let mut body = String::new();
        text.read_to_string(&mut body)?;
        let mut corpus = Self::new(body, terminator);

        if let Some(reader) = units {
            let mut raw = String::new();
            reader.read_to_string(&mut raw)?;
            corpus.units = Some(parse_units(&raw)?);
        }
        if let Some(reader) = types {
            let mut raw = String::new();
            reader.read_to_string(&mut raw)?;
            corpus.types = raw
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
        }
        debug!(
            bytes = corpus.text.len(),
            units = corpus.units.as_ref().map(Vec::len),
            types = corpus.types.len(),
            "corpus loaded"
        );
        Ok(corpus)
    }

    /// Terminator character
    pub fn terminator(&self) -> char {
        self.terminator
    }

    /// Type names, possibly empty
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Documents in order, each including its terminator
    pub fn documents(&self) -> Vec<&str> {
        let mut documents = Vec::new();
        let mut rest = self.text.as_str();
        loop {
            rest = rest.trim_start_matches(&['\r', '\n'][..]);
            match rest.find(self.terminator) {
                Some(end) => {
                    let cut = end + self.terminator.len_utf8();
                    documents.push(&rest[..cut]);
                    rest = &rest[cut..];
                }
                None => break,
            }
        }
        if !rest.trim().is_empty() {
            warn!(
                trailing = rest.chars().count(),
                "text after the last terminator is ignored"
            );
        }
        documents
    }

    /// Validated unit map for `documents` documents; without a unit list
    /// every document is its own unit.
    pub fn unit_map(&self, documents: usize) -> Result<UnitMap> {
        match &self.units {
            Some(units) => Ok(UnitMap::new(units.clone(), documents)?),
            None => Ok(UnitMap::per_document(documents)),
        }
    }

    /// Number of units reported for this corpus: the number of types if
    /// known, otherwise the number of units.
    pub fn unit_count(&self, units: &UnitMap) -> usize {
        if self.types.is_empty() {
            units.len()
        } else {
            self.types.len()
        }
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_TERMINATOR)
    }
}

/// One integer per non-blank line
pub fn parse_units(raw: &str) -> Result<Vec<usize>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            line.trim().parse().map_err(|_| {
                EngineError::config("units", format!("line {}: '{}' is not a document number", number + 1, line.trim()))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_split_at_terminator() {
        let corpus = Corpus::new("walk$walks$\nwalked$\n", '$');
        assert_eq!(corpus.documents(), vec!["walk$", "walks$", "walked$"]);
    }

    #[test]
    fn test_trailing_text_ignored() {
        let corpus = Corpus::new("ab$cd", '$');
        assert_eq!(corpus.documents(), vec!["ab$"]);
    }

    #[test]
    fn test_multibyte_terminator() {
        let corpus = Corpus::from_documents(["ab", "c"], '§');
        assert_eq!(corpus.documents(), vec!["ab§", "c§"]);
    }

    #[test]
    fn test_from_readers() {
        let mut units: &[u8] = b"1\n2\n";
        let mut types: &[u8] = b"walk\ntalk\n";
        let corpus = Corpus::from_readers(
            "walk$walks$talk$".as_bytes(),
            Some(&mut units as &mut dyn Read),
            Some(&mut types as &mut dyn Read),
            '$',
        )
        .unwrap();

        assert_eq!(corpus.types(), &["walk".to_string(), "talk".to_string()]);
        let units = corpus.unit_map(3).unwrap();
        assert_eq!(units.as_slice(), &[1, 2]);
        assert_eq!(corpus.unit_count(&units), 2);
    }

    #[test]
    fn test_bad_unit_list() {
        assert!(matches!(
            parse_units("1\nx\n"),
            Err(EngineError::Config { .. })
        ));
        let corpus = Corpus::new("a$b$", '$').with_units(vec![1, 5]);
        assert!(corpus.unit_map(2).is_err());
    }

    #[test]
    fn test_default_units_per_document() {
        let corpus = Corpus::new("a$b$c$", '$');
        let units = corpus.unit_map(3).unwrap();
        assert_eq!(corpus.unit_count(&units), 3);
    }
}
