//! Pairwise lexical similarity scorers.
//!
//! # Contract
//! Every scorer returns a value in `[0, 1]`, scores any non-empty string
//! against itself as `1`, is symmetric in its arguments, and has no side
//! effects. Scores fall as character-sequence overlap falls.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod dice;
mod levenshtein;

pub use dice::DiceBigramScorer;
pub use levenshtein::LevenshteinRatioScorer;

/// A scorer could not evaluate a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerError {
    pub message: String,
}

impl ScorerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ScorerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "similarity scorer failed: {}", self.message)
    }
}

impl Error for ScorerError {}

/// Lexical similarity between two strings, normalized to `[0, 1]`.
pub trait SimilarityScorer: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, ScorerError>;
}

impl<S: SimilarityScorer + ?Sized> SimilarityScorer for &S {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, ScorerError> {
        (**self).similarity(a, b)
    }
}

impl<S: SimilarityScorer + ?Sized> SimilarityScorer for Box<S> {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, ScorerError> {
        (**self).similarity(a, b)
    }
}
