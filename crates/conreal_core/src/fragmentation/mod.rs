//! Fragmentation index over a group's free-text entries.
//!
//! # Responsibility
//! - Filter raw entries down to valid ones.
//! - Turn pairwise similarity into one divergence score in `[0, 1]`.
//! - Extract the consensus (most frequent) entry and a sample prefix.
//!
//! # Invariants
//! - Pure: no I/O, no logging, no state kept between calls.
//! - Full pairwise mode is permutation invariant for both the score and the
//!   consensus text. Samples follow input order.
//! - Fewer than two valid entries is a zero score, not an error.
//! - A scorer failure aborts the whole computation; partial sums are never
//!   returned.
//!
//! Entries are trimmed once. The trimmed text is what gets validated,
//! scored, counted for consensus (case-sensitive) and sampled.

use crate::similarity::ScorerError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod consensus;
mod engine;
mod entry;

pub use consensus::{consensus_text, rank_by_frequency};
pub use engine::{
    compute_fragmentation, AggregationMode, FragmentationEngine, FragmentationResult,
    SAMPLE_LIMIT,
};
pub use entry::{valid_entries, EntryText};

pub type FragmentationOutcome = Result<FragmentationResult, FragmentationError>;

/// Aggregation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentationError {
    /// The scorer could not evaluate the pair at valid-entry positions
    /// `left` and `right`.
    Computation {
        left: usize,
        right: usize,
        source: ScorerError,
    },
}

impl Display for FragmentationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Computation {
                left,
                right,
                source,
            } => write!(
                f,
                "fragmentation aborted at entry pair ({left}, {right}): {source}"
            ),
        }
    }
}

impl Error for FragmentationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Computation { source, .. } => Some(source),
        }
    }
}
