//! Activation potentials for join and split decisions

use crate::error::{CoreError, Result};
use crate::trie::{Trie, TrieNodeId};

/// The two alternatives at every symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Continue the current trie branch
    Join,
    /// Restart matching at the trie root
    Split,
}

/// Scores join and split decisions from the shape of the trie.
///
/// A join onto node `n` scores `min_cost + ln(1 + branching(n))`; a split
/// after a segment of `depth` symbols scores `min_cost * decay^depth`. With
/// `decay == 1.0` a split never outscores a live join, so splits only win
/// where the trie has no continuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    min_cost: f64,
    decay: f64,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            min_cost: 1.0,
            decay: 1.0,
        }
    }
}

impl Scorer {
    /// Create a scorer; `min_cost` must be finite and non-negative, `decay`
    /// finite and positive.
    pub fn new(min_cost: f64, decay: f64) -> Result<Self> {
        if !min_cost.is_finite() || min_cost < 0.0 {
            return Err(CoreError::InvalidScorer {
                reason: format!("minimum cost must be finite and non-negative, got {min_cost}"),
            });
        }
        if !decay.is_finite() || decay <= 0.0 {
            return Err(CoreError::InvalidScorer {
                reason: format!("decay factor must be finite and positive, got {decay}"),
            });
        }
        Ok(Self { min_cost, decay })
    }

    /// Minimum cost floor
    pub fn min_cost(&self) -> f64 {
        self.min_cost
    }

    /// Decay factor
    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Potential of taking `kind` into trie node `node`.
    ///
    /// For a join `node` is the node the join reaches; for a split only
    /// `depth`, the length of the segment being closed, matters.
    pub fn activation_potential(&self, trie: &Trie, node: TrieNodeId, depth: usize, kind: Decision) -> f64 {
        let potential = match kind {
            Decision::Join => self.min_cost + (1.0 + trie.branching(node) as f64).ln(),
            Decision::Split => {
                let exponent = i32::try_from(depth).unwrap_or(i32::MAX);
                self.min_cost * self.decay.powi(exponent)
            }
        };
        if potential.is_finite() {
            potential
        } else {
            f64::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie() -> Trie {
        let mut trie = Trie::new();
        trie.insert("ab", 1);
        trie.insert("ac", 1);
        trie.insert("ad", 1);
        trie
    }

    #[test]
    fn test_join_grows_with_branching() {
        let trie = trie();
        let scorer = Scorer::default();
        let a = trie.child(trie.root(), 'a').unwrap();
        let b = trie.child(a, 'b').unwrap();

        let wide = scorer.activation_potential(&trie, a, 1, Decision::Join);
        let narrow = scorer.activation_potential(&trie, b, 1, Decision::Join);
        assert!(wide > narrow);
        assert_eq!(narrow, 1.0);
    }

    #[test]
    fn test_split_decays_with_depth() {
        let trie = trie();
        let scorer = Scorer::new(2.0, 0.5).unwrap();
        let root = trie.root();
        assert_eq!(scorer.activation_potential(&trie, root, 0, Decision::Split), 2.0);
        assert_eq!(scorer.activation_potential(&trie, root, 2, Decision::Split), 0.5);

        let neutral = Scorer::default();
        assert_eq!(neutral.activation_potential(&trie, root, 9, Decision::Split), 1.0);
    }

    #[test]
    fn test_potentials_stay_finite() {
        let trie = trie();
        let scorer = Scorer::new(1.0, 1e300).unwrap();
        let potential = scorer.activation_potential(&trie, trie.root(), 5, Decision::Split);
        assert!(potential.is_finite());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(Scorer::new(f64::NAN, 1.0).is_err());
        assert!(Scorer::new(-1.0, 1.0).is_err());
        assert!(Scorer::new(1.0, 0.0).is_err());
        assert!(Scorer::new(1.0, f64::INFINITY).is_err());
        assert!(Scorer::new(0.0, 0.5).is_ok());
    }
}
