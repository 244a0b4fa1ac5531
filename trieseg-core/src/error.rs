//! Core error types (deterministic only)

use thiserror::Error;

/// Core algorithm errors (no I/O, no external failures)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A document without any symbol in front of its terminator
    #[error("document {doc} is empty")]
    EmptyDocument {
        /// Number of the rejected document
        doc: usize,
    },

    /// A document that does not end with the terminator symbol
    #[error("document {doc} does not end with terminator '{terminator}'")]
    MissingTerminator {
        /// Number of the rejected document
        doc: usize,
        /// The terminator that was expected
        terminator: char,
    },

    /// The terminator symbol occurs inside the document body
    #[error("document {doc} contains terminator '{terminator}' at position {position}")]
    TerminatorInDocument {
        /// Number of the rejected document
        doc: usize,
        /// The terminator symbol
        terminator: char,
        /// Character position of the misplaced terminator
        position: usize,
    },

    /// A simple suffix tree only accepts one document
    #[error("simple suffix tree already holds a document; use a generalized tree")]
    SingleDocumentTree,

    /// Unit list violates ordering or bounds
    #[error("invalid unit list: {reason}")]
    InvalidUnits {
        /// What is wrong with the unit list
        reason: String,
    },

    /// Scorer parameters out of range
    #[error("invalid scorer parameter: {reason}")]
    InvalidScorer {
        /// What is wrong with the parameter
        reason: String,
    },

    /// Segmentation window of size zero
    #[error("window size must be at least 1")]
    InvalidWindow,

    /// A serialized report could not be parsed
    #[error("malformed report at line {line}: {reason}")]
    MalformedReport {
        /// One-based line number
        line: usize,
        /// What was found instead
        reason: String,
    },

    /// An exchange trie could not be converted
    #[error("malformed trie: {reason}")]
    MalformedTrie {
        /// What is wrong with the trie
        reason: String,
    },

    /// Cooperative cancellation was requested
    #[error("interrupted")]
    Interrupted,
}

/// Result type for core operations
pub type Result<T> = core::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::MissingTerminator {
            doc: 3,
            terminator: '$',
        };
        assert_eq!(err.to_string(), "document 3 does not end with terminator '$'");

        let err = CoreError::MalformedReport {
            line: 7,
            reason: "unexpected tag".to_string(),
        };
        assert_eq!(err.to_string(), "malformed report at line 7: unexpected tag");
    }

    #[test]
    fn test_interrupted_is_distinct() {
        assert_eq!(CoreError::Interrupted, CoreError::Interrupted);
        assert_ne!(CoreError::Interrupted, CoreError::SingleDocumentTree);
    }
}
