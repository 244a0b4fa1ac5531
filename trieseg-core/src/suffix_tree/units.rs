//! Grouping of documents into types

use crate::error::{CoreError, Result};
use crate::symbol::DocId;

/// Unit list: for every type, the number of its last document.
///
/// Documents of an alphabetically sorted corpus are grouped by type; the
/// unit list records where each group ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitMap {
    units: Vec<DocId>,
}

impl UnitMap {
    /// Validate `units` against a corpus of `documents` documents
    pub fn new(units: Vec<DocId>, documents: usize) -> Result<Self> {
        for (i, pair) in units.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(CoreError::InvalidUnits {
                    reason: format!(
                        "unit {} ({}) is not greater than unit {} ({})",
                        i + 1,
                        pair[1],
                        i,
                        pair[0]
                    ),
                });
            }
        }
        if let Some(&last) = units.last() {
            if last >= documents {
                return Err(CoreError::InvalidUnits {
                    reason: format!("unit {last} exceeds the {documents} documents of the corpus"),
                });
            }
        }
        Ok(Self { units })
    }

    /// One type per document
    pub fn per_document(documents: usize) -> Self {
        Self {
            units: (0..documents).collect(),
        }
    }

    /// Number of types
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no type is recorded
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Type that document `doc` belongs to; documents after the last unit
    /// boundary belong to no recorded type.
    pub fn unit_of(&self, doc: DocId) -> Option<usize> {
        let index = self.units.partition_point(|&last| last < doc);
        (index < self.units.len()).then_some(index)
    }

    /// Last document number of every type
    pub fn as_slice(&self) -> &[DocId] {
        &self.units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_lookup() {
        let units = UnitMap::new(vec![1, 2, 5], 6).unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units.unit_of(0), Some(0));
        assert_eq!(units.unit_of(1), Some(0));
        assert_eq!(units.unit_of(2), Some(1));
        assert_eq!(units.unit_of(3), Some(2));
        assert_eq!(units.unit_of(5), Some(2));
        assert_eq!(units.unit_of(6), None);
    }

    #[test]
    fn test_units_must_increase() {
        assert!(matches!(
            UnitMap::new(vec![2, 2], 4),
            Err(CoreError::InvalidUnits { .. })
        ));
        assert!(matches!(
            UnitMap::new(vec![3, 1], 4),
            Err(CoreError::InvalidUnits { .. })
        ));
    }

    #[test]
    fn test_units_bounded_by_documents() {
        assert!(UnitMap::new(vec![0, 3], 4).is_ok());
        assert!(matches!(
            UnitMap::new(vec![0, 4], 4),
            Err(CoreError::InvalidUnits { .. })
        ));
    }

    #[test]
    fn test_per_document() {
        let units = UnitMap::per_document(3);
        assert_eq!(units.as_slice(), &[0, 1, 2]);
    }
}
