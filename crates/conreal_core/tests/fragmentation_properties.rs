use conreal_core::{
    compute_fragmentation, DiceBigramScorer, FragmentationEngine, LevenshteinRatioScorer,
};
use proptest::prelude::*;

fn entries_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e ]{0,12}", 0..12)
}

proptest! {
    #[test]
    fn fragmentation_stays_in_unit_interval(entries in entries_strategy()) {
        let result = compute_fragmentation(&entries).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.fragmentation));
        prop_assert!(result.fragmented_samples.len() <= 3);
        prop_assert!(result.sample_count <= entries.len());
    }

    #[test]
    fn identical_pair_has_zero_fragmentation(s in "[a-z][a-z ]{0,30}") {
        let result = compute_fragmentation(&[s.clone(), s]).unwrap();
        prop_assert_eq!(result.fragmentation, 0.0);
    }

    #[test]
    fn permutation_keeps_score_and_consensus(
        entries in entries_strategy(),
        seed in any::<u64>(),
    ) {
        let original = compute_fragmentation(&entries).unwrap();

        // Reverse then rotate: a permutation that moves most elements.
        let mut shuffled = entries.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let shift = (seed as usize) % shuffled.len();
            shuffled.rotate_left(shift);
        }
        let permuted = compute_fragmentation(&shuffled).unwrap();

        prop_assert_eq!(original.fragmentation, permuted.fragmentation);
        prop_assert_eq!(original.sample_count, permuted.sample_count);

        // Consensus only has to survive when the top count is unique.
        let valid = conreal_core::fragmentation::valid_entries(&entries);
        let ranked = conreal_core::fragmentation::rank_by_frequency(&valid);
        let unique_top = match ranked.as_slice() {
            [] => true,
            [_] => true,
            [first, second, ..] => first.1 > second.1,
        };
        if unique_top {
            prop_assert_eq!(original.consensus_text, permuted.consensus_text);
        }
    }

    #[test]
    fn scorers_are_symmetric_and_bounded(a in ".{0,24}", b in ".{0,24}") {
        for score in [
            (DiceBigramScorer::new().score(&a, &b), DiceBigramScorer::new().score(&b, &a)),
            (
                LevenshteinRatioScorer::new().score(&a, &b),
                LevenshteinRatioScorer::new().score(&b, &a),
            ),
        ] {
            prop_assert_eq!(score.0, score.1);
            prop_assert!((0.0..=1.0).contains(&score.0));
        }
    }

    #[test]
    fn full_window_bounded_equals_full_pairwise(entries in entries_strategy()) {
        let full = FragmentationEngine::new().compute(&entries).unwrap();
        let bounded = FragmentationEngine::new()
            .bounded(entries.len().max(1))
            .compute(&entries)
            .unwrap();
        prop_assert_eq!(full, bounded);
    }
}
