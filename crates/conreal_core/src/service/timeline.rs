//! Per-day timeline data for the visualization client.

use crate::fragmentation::{rank_by_frequency, valid_entries, FragmentationResult};
use crate::model::reality_log::LogDate;
use serde::{Deserialize, Serialize};

/// Most frequent distinct entries drawn as branches per day.
pub const MAX_BRANCHES: usize = 3;

/// Agreement level of one day: `1 - fragmentation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusPoint {
    pub time: LogDate,
    pub value: f64,
}

/// One distinct entry of a day and how many times it was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentBranch {
    pub id: String,
    pub time: LogDate,
    pub user_count: usize,
    /// `0..MAX_BRANCHES`, most frequent first.
    pub branch: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTimeline {
    pub consensus: Vec<ConsensusPoint>,
    pub fragments: Vec<FragmentBranch>,
}

impl GroupTimeline {
    pub fn is_empty(&self) -> bool {
        self.consensus.is_empty()
    }

    /// Appends one day given its entries and their fragmentation result.
    ///
    /// A day without valid entries scores full agreement and has no branches.
    pub fn push_day(&mut self, date: &LogDate, entries: &[String], result: &FragmentationResult) {
        self.consensus.push(ConsensusPoint {
            time: date.clone(),
            value: 1.0 - result.fragmentation,
        });

        let valid = valid_entries(entries);
        for (branch, (_, count)) in rank_by_frequency(&valid)
            .into_iter()
            .take(MAX_BRANCHES)
            .enumerate()
        {
            self.fragments.push(FragmentBranch {
                id: format!("{date}-{branch}"),
                time: date.clone(),
                user_count: count,
                branch: branch as u8,
            });
        }
    }
}
