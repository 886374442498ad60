use super::entry::{valid_entries, EntryText};
use std::collections::HashMap;

/// Distinct valid entries with their exact-match counts.
///
/// Sorted by count descending; equal counts keep first-seen order.
pub fn rank_by_frequency<'a>(valid: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<(&'a str, usize)> = Vec::new();

    for &text in valid {
        match slots.get(text) {
            Some(&slot) => ranked[slot].1 += 1,
            None => {
                slots.insert(text, ranked.len());
                ranked.push((text, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    ranked.sort_by(|left, right| right.1.cmp(&left.1));
    ranked
}

/// Most frequent valid entry, or an empty string when there is none.
pub fn consensus_text<E: EntryText>(entries: &[E]) -> String {
    let valid = valid_entries(entries);
    rank_by_frequency(&valid)
        .first()
        .map(|(text, _)| (*text).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{consensus_text, rank_by_frequency};

    #[test]
    fn highest_count_wins() {
        assert_eq!(consensus_text(&["x", "y", "x"]), "x");
        assert_eq!(consensus_text(&["y", "x", "x"]), "x");
    }

    #[test]
    fn ties_break_on_first_seen() {
        assert_eq!(consensus_text(&["b", "a", "a", "b"]), "b");
        assert_eq!(consensus_text(&["solo", "duo"]), "solo");
    }

    #[test]
    fn matching_is_case_sensitive_but_trimmed() {
        assert_eq!(consensus_text(&["Sky", "sky", " sky "]), "sky");
    }

    #[test]
    fn empty_input_yields_empty_consensus() {
        let none: [&str; 0] = [];
        assert_eq!(consensus_text(&none), "");
        assert_eq!(consensus_text(&["", "   "]), "");
    }

    #[test]
    fn ranking_lists_every_distinct_entry() {
        let ranked = rank_by_frequency(&["c", "a", "b", "a", "c", "c"]);
        assert_eq!(ranked, vec![("c", 3), ("a", 2), ("b", 1)]);
    }
}
