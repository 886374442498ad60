use super::{ScorerError, SimilarityScorer};

/// `1 - edit_distance / longer_length`, measured in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevenshteinRatioScorer;

impl LevenshteinRatioScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let a_chars = a.chars().collect::<Vec<_>>();
        let b_chars = b.chars().collect::<Vec<_>>();
        let longest = a_chars.len().max(b_chars.len());
        let distance = edit_distance(&a_chars, &b_chars);
        1.0 - distance as f64 / longest as f64
    }
}

impl SimilarityScorer for LevenshteinRatioScorer {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, ScorerError> {
        Ok(self.score(a, b))
    }
}

// Two-row dynamic programming table.
fn edit_distance(a: &[char], b: &[char]) -> usize {
    let mut previous = (0..=b.len()).collect::<Vec<_>>();
    let mut current = vec![0; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != b_char);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
