//! Core domain logic for the Consensus Reality Monitor.
//!
//! Users file short "reality logs" into groups. This crate stores them,
//! measures how far a group's entries diverge (the fragmentation index),
//! and turns that index into flair, reports and timeline data.

pub mod badge;
pub mod db;
pub mod fragmentation;
pub mod logging;
pub mod model;
pub mod platform;
pub mod repo;
pub mod service;
pub mod similarity;

pub use badge::{format_index, RealityBadge, RealityBand};
pub use fragmentation::{
    compute_fragmentation, consensus_text, AggregationMode, EntryText, FragmentationEngine,
    FragmentationError, FragmentationOutcome, FragmentationResult,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::reality_log::{GroupId, LogDate, LogId, RealityLog};
pub use platform::{FlairRequest, Platform, PlatformError, PlatformResult, PostRef, PostRequest};
pub use repo::log_store::{GroupScan, LogStore, SqliteLogStore, StoreError, StoreResult};
pub use service::flair::{sync_group_flair, FlairOutcome};
pub use service::group_service::{GroupService, LogReceipt, LogSubmission};
pub use service::report::{
    create_monitor_post, publish_daily_report, recent_reports, share_group, ReportOutcome,
};
pub use service::timeline::{ConsensusPoint, FragmentBranch, GroupTimeline};
pub use service::{ServiceError, ServiceResult};
pub use similarity::{DiceBigramScorer, LevenshteinRatioScorer, ScorerError, SimilarityScorer};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
