use super::consensus::rank_by_frequency;
use super::entry::{valid_entries, EntryText};
use super::{FragmentationError, FragmentationOutcome};
use crate::similarity::{DiceBigramScorer, ScorerError, SimilarityScorer};
use serde::{Deserialize, Serialize};

/// Maximum number of entries echoed back as samples.
pub const SAMPLE_LIMIT: usize = 3;

/// Output of one fragmentation computation. Never persisted by core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentationResult {
    /// `1 - mean pairwise similarity`; `0` when entries agree.
    pub fragmentation: f64,
    /// Most frequent valid entry, empty when there is none.
    pub consensus_text: String,
    /// Up to [`SAMPLE_LIMIT`] valid entries, in input order.
    pub fragmented_samples: Vec<String>,
    /// Number of valid entries considered.
    pub sample_count: usize,
}

/// Which entry pairs feed the average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggregationMode {
    /// Every unordered pair of valid entries.
    #[default]
    FullPairwise,
    /// Each valid entry against the next `window` valid entries only.
    ///
    /// Bounded cost for large groups, but the score then depends on input
    /// order. Callers must not present it as the full-pairwise index.
    Bounded { window: usize },
}

/// Aggregates pairwise scorer output into a [`FragmentationResult`].
#[derive(Debug, Clone, Default)]
pub struct FragmentationEngine<S = DiceBigramScorer> {
    scorer: S,
    mode: AggregationMode,
}

impl FragmentationEngine<DiceBigramScorer> {
    /// Dice bigram scorer, full pairwise aggregation.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: SimilarityScorer> FragmentationEngine<S> {
    /// Custom scorer, full pairwise aggregation.
    pub fn with_scorer(scorer: S) -> Self {
        Self {
            scorer,
            mode: AggregationMode::FullPairwise,
        }
    }

    /// Switches to bounded aggregation. A zero window is treated as one.
    pub fn bounded(mut self, window: usize) -> Self {
        self.mode = AggregationMode::Bounded {
            window: window.max(1),
        };
        self
    }

    /// Active aggregation mode.
    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    /// Scorer applied to each entry pair.
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Computes the fragmentation result for `entries`.
    ///
    /// # Errors
    /// - [`FragmentationError::Computation`] when the scorer fails on a pair
    ///   or returns a value outside `[0, 1]`.
    pub fn compute<E: EntryText>(&self, entries: &[E]) -> FragmentationOutcome {
        let valid = valid_entries(entries);
        let consensus_text = rank_by_frequency(&valid)
            .first()
            .map(|(text, _)| (*text).to_string())
            .unwrap_or_default();
        let fragmented_samples = valid
            .iter()
            .take(SAMPLE_LIMIT)
            .map(|text| (*text).to_string())
            .collect();

        let fragmentation = if valid.len() < 2 {
            0.0
        } else {
            fragmentation_from(self.pair_similarities(&valid)?)
        };

        Ok(FragmentationResult {
            fragmentation,
            consensus_text,
            fragmented_samples,
            sample_count: valid.len(),
        })
    }

    fn pair_similarities(&self, valid: &[&str]) -> Result<Vec<f64>, FragmentationError> {
        let reach = match self.mode {
            AggregationMode::FullPairwise => valid.len(),
            AggregationMode::Bounded { window } => window,
        };

        let mut similarities = Vec::new();
        for (left, a) in valid.iter().enumerate() {
            let last = valid.len().min(left.saturating_add(reach).saturating_add(1));
            for (right, b) in valid.iter().enumerate().take(last).skip(left + 1) {
                let score = self
                    .scorer
                    .similarity(a, b)
                    .and_then(check_range)
                    .map_err(|source| FragmentationError::Computation {
                        left,
                        right,
                        source,
                    })?;
                similarities.push(score);
            }
        }
        Ok(similarities)
    }
}

/// Full-pairwise fragmentation with the default Dice bigram scorer.
pub fn compute_fragmentation<E: EntryText>(entries: &[E]) -> FragmentationOutcome {
    FragmentationEngine::new().compute(entries)
}

fn check_range(score: f64) -> Result<f64, ScorerError> {
    if (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(ScorerError::new(format!("score {score} outside [0, 1]")))
    }
}

fn fragmentation_from(mut similarities: Vec<f64>) -> f64 {
    if similarities.is_empty() {
        return 0.0;
    }
    // Summing in sorted order makes the total independent of input order.
    similarities.sort_by(f64::total_cmp);
    let total: f64 = similarities.iter().sum();
    let average = total / similarities.len() as f64;
    (1.0 - average).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::{compute_fragmentation, AggregationMode, FragmentationEngine};
    use crate::fragmentation::FragmentationError;
    use crate::similarity::{LevenshteinRatioScorer, ScorerError, SimilarityScorer};

    struct BrokenScorer;

    impl SimilarityScorer for BrokenScorer {
        fn similarity(&self, a: &str, b: &str) -> Result<f64, ScorerError> {
            if a == "poison" || b == "poison" {
                Err(ScorerError::new("cannot evaluate poison"))
            } else {
                Ok(1.0)
            }
        }
    }

    struct OutOfRangeScorer;

    impl SimilarityScorer for OutOfRangeScorer {
        fn similarity(&self, _a: &str, _b: &str) -> Result<f64, ScorerError> {
            Ok(f64::NAN)
        }
    }

    #[test]
    fn degenerate_inputs_score_zero() {
        let empty: [&str; 0] = [];
        let result = compute_fragmentation(&empty).unwrap();
        assert_eq!(result.fragmentation, 0.0);
        assert_eq!(result.consensus_text, "");
        assert!(result.fragmented_samples.is_empty());
        assert_eq!(result.sample_count, 0);

        let single = compute_fragmentation(&["", "apple", "  "]).unwrap();
        assert_eq!(single.fragmentation, 0.0);
        assert_eq!(single.consensus_text, "apple");
        assert_eq!(single.fragmented_samples, vec!["apple"]);
        assert_eq!(single.sample_count, 1);
    }

    #[test]
    fn scorer_failure_aborts_with_pair_position() {
        let engine = FragmentationEngine::with_scorer(BrokenScorer);
        let err = engine.compute(&["a", "b", "poison"]).unwrap_err();
        let FragmentationError::Computation { left, right, .. } = err;
        assert_eq!((left, right), (0, 2));
    }

    #[test]
    fn scorer_failure_is_not_reached_for_single_entry() {
        let engine = FragmentationEngine::with_scorer(BrokenScorer);
        let result = engine.compute(&["poison"]).unwrap();
        assert_eq!(result.fragmentation, 0.0);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let engine = FragmentationEngine::with_scorer(OutOfRangeScorer);
        assert!(engine.compute(&["a", "b"]).is_err());
    }

    #[test]
    fn bounded_mode_only_compares_within_window() {
        let entries = ["apple", "apple", "zzzz", "apple"];
        let full = FragmentationEngine::new().compute(&entries).unwrap();
        let bounded = FragmentationEngine::new().bounded(1);
        assert_eq!(bounded.mode(), AggregationMode::Bounded { window: 1 });

        // Window 1 compares (0,1), (1,2), (2,3): one identical pair of three.
        let windowed = bounded.compute(&entries).unwrap();
        assert!((windowed.fragmentation - 2.0 / 3.0).abs() < 1e-12);
        // Full pairwise sees three identical pairs of six.
        assert!((full.fragmentation - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bounded_window_covering_everything_matches_full() {
        let entries = ["red sky", "blue sky", "red skies", "green sea"];
        let full = FragmentationEngine::new().compute(&entries).unwrap();
        let bounded = FragmentationEngine::new().bounded(10).compute(&entries).unwrap();
        assert_eq!(full, bounded);
    }

    #[test]
    fn alternative_scorer_plugs_in() {
        let engine = FragmentationEngine::with_scorer(LevenshteinRatioScorer::new());
        let result = engine.compute(&["kitten", "kitten"]).unwrap();
        assert_eq!(result.fragmentation, 0.0);
        let result = engine.compute(&["abc", "xyz"]).unwrap();
        assert_eq!(result.fragmentation, 1.0);
    }
}
