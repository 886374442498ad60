use super::{ScorerError, SimilarityScorer};
use std::collections::HashMap;

/// Dice coefficient over character bigram multisets.
///
/// Comparison is case-insensitive. Strings shorter than two characters
/// have no bigrams, so they only match when identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiceBigramScorer;

impl DiceBigramScorer {
    pub fn new() -> Self {
        Self
    }

    /// Infallible form of [`SimilarityScorer::similarity`].
    pub fn score(&self, a: &str, b: &str) -> f64 {
        let a = a.to_lowercase();
        let b = b.to_lowercase();
        if a == b {
            return 1.0;
        }

        let a_chars = a.chars().collect::<Vec<_>>();
        let b_chars = b.chars().collect::<Vec<_>>();
        if a_chars.len() < 2 || b_chars.len() < 2 {
            return 0.0;
        }

        let mut remaining: HashMap<(char, char), usize> = HashMap::new();
        for pair in a_chars.windows(2) {
            *remaining.entry((pair[0], pair[1])).or_insert(0) += 1;
        }

        let mut matches = 0usize;
        for pair in b_chars.windows(2) {
            if let Some(count) = remaining.get_mut(&(pair[0], pair[1])) {
                if *count > 0 {
                    *count -= 1;
                    matches += 1;
                }
            }
        }

        let bigram_total = (a_chars.len() - 1) + (b_chars.len() - 1);
        (2 * matches) as f64 / bigram_total as f64
    }
}

impl SimilarityScorer for DiceBigramScorer {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, ScorerError> {
        Ok(self.score(a, b))
    }
}
