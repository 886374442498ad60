//! Group use-case service.
//!
//! # Responsibility
//! - Create groups and file submitted logs under the right day bucket.
//! - Collect a group's entries and run the fragmentation engine on them.
//!
//! # Invariants
//! - A group's entries are read date-ascending, each day in written order.
//! - Grouped logs always register their group and date.
//! - Reports are recomputed on every call; nothing is cached.

use crate::badge::{format_index, is_fracture};
use crate::fragmentation::{FragmentationEngine, FragmentationResult};
use crate::logging::sanitize_message;
use crate::model::reality_log::{GroupId, LogDate, LogId, RealityLog};
use crate::repo::log_store::LogStore;
use crate::service::timeline::GroupTimeline;
use crate::service::{ServiceError, ServiceResult};
use crate::similarity::{DiceBigramScorer, SimilarityScorer};
use log::{debug, info, warn};
use uuid::Uuid;

/// Registry page size used when walking every group.
const GROUP_SCAN_PAGE: u32 = 100;
const LOG_PREVIEW_CHARS: usize = 48;

/// Incoming log submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSubmission {
    /// Caller-chosen id; generated when absent.
    pub log_id: Option<LogId>,
    pub data: String,
    /// Target group; standalone log when absent.
    pub group_id: Option<GroupId>,
}

/// Where a submitted log ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogReceipt {
    pub log_id: LogId,
    pub group_id: Option<GroupId>,
    pub log_date: LogDate,
}

/// Group service over a log store and a fragmentation engine.
pub struct GroupService<S: LogStore, Sc: SimilarityScorer = DiceBigramScorer> {
    store: S,
    engine: FragmentationEngine<Sc>,
}

impl<S: LogStore> GroupService<S> {
    /// Uses the default full-pairwise Dice engine.
    pub fn new(store: S) -> Self {
        Self::with_engine(store, FragmentationEngine::new())
    }
}

impl<S: LogStore, Sc: SimilarityScorer> GroupService<S, Sc> {
    /// Uses a caller-built engine, e.g. another scorer or bounded mode.
    pub fn with_engine(store: S, engine: FragmentationEngine<Sc>) -> Self {
        Self { store, engine }
    }

    /// Underlying log store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Engine used for every report and timeline day.
    pub fn engine(&self) -> &FragmentationEngine<Sc> {
        &self.engine
    }

    /// Creates a group seeded with `strings` under `date`.
    pub fn create_group(&self, strings: &[String], date: &LogDate) -> ServiceResult<GroupId> {
        let group_id = Uuid::new_v4();
        self.store.set_logs(group_id, date, strings)?;
        self.store.add_date_to_group(group_id, date)?;
        self.store.add_group(group_id)?;

        info!(
            "event=group_create module=service status=ok group_id={group_id} log_date={date} entries={}",
            strings.len()
        );
        Ok(group_id)
    }

    /// Stores one submission.
    ///
    /// Grouped logs are appended to the group's list for `date`; others are
    /// kept as standalone logs under their id.
    ///
    /// # Errors
    /// - [`ServiceError::MissingData`] when `data` is blank.
    pub fn submit_log(&self, submission: &LogSubmission, date: &LogDate) -> ServiceResult<LogReceipt> {
        let log = RealityLog::with_id(
            submission.log_id.unwrap_or_else(Uuid::new_v4),
            submission.group_id,
            submission.data.clone(),
            date.clone(),
        );
        log.validate()?;

        match log.group_id {
            Some(group_id) => {
                let mut day = self.store.get_logs(group_id, date)?.unwrap_or_default();
                day.push(log.text.clone());
                self.store.set_logs(group_id, date, &day)?;
                if !self.store.is_date_in_group(group_id, date)? {
                    self.store.add_date_to_group(group_id, date)?;
                }
                self.store.add_group(group_id)?;
                info!(
                    "event=log_submit module=service status=ok log_id={} group_id={group_id} log_date={date} day_entries={}",
                    log.log_id,
                    day.len()
                );
            }
            None => {
                self.store.set_log(log.log_id, &log.text)?;
                info!(
                    "event=log_submit module=service status=ok log_id={} group_id=none",
                    log.log_id
                );
            }
        }

        Ok(LogReceipt {
            log_id: log.log_id,
            group_id: log.group_id,
            log_date: log.log_date,
        })
    }

    /// Every stored entry of a group, oldest day first.
    pub fn group_entries(&self, group_id: GroupId) -> ServiceResult<Vec<String>> {
        let mut entries = Vec::new();
        for date in self.store.dates_for_group(group_id)? {
            if let Some(day) = self.store.get_logs(group_id, &date)? {
                entries.extend(day);
            }
        }
        Ok(entries)
    }

    /// Fragmentation over all of a group's entries.
    ///
    /// # Errors
    /// - [`ServiceError::GroupNotFound`] when the group has no entries.
    /// - [`ServiceError::Fragmentation`] when the scorer fails.
    pub fn group_report(&self, group_id: GroupId) -> ServiceResult<FragmentationResult> {
        let entries = self.group_entries(group_id)?;
        if entries.is_empty() {
            warn!("event=group_report module=service status=not_found group_id={group_id}");
            return Err(ServiceError::GroupNotFound(group_id));
        }

        let result = self.score(&entries)?;
        info!(
            "event=group_report module=service status=ok group_id={group_id} entries={} valid={} index={}",
            entries.len(),
            result.sample_count,
            format_index(result.fragmentation)
        );
        Ok(result)
    }

    /// Per-day consensus points and fragment branches of a group.
    ///
    /// # Errors
    /// - [`ServiceError::GroupNotFound`] when the group has no entries.
    pub fn group_timeline(&self, group_id: GroupId) -> ServiceResult<GroupTimeline> {
        let mut timeline = GroupTimeline::default();
        let mut stored = 0usize;
        for date in self.store.dates_for_group(group_id)? {
            let Some(day) = self.store.get_logs(group_id, &date)? else {
                continue;
            };
            stored += day.len();
            let result = self.engine.compute(&day)?;
            timeline.push_day(&date, &day, &result);
        }

        if stored == 0 {
            warn!("event=group_timeline module=service status=not_found group_id={group_id}");
            return Err(ServiceError::GroupNotFound(group_id));
        }
        debug!(
            "event=group_timeline module=service status=ok group_id={group_id} days={}",
            timeline.consensus.len()
        );
        Ok(timeline)
    }

    /// Entries filed under `date` across every registered group.
    pub fn entries_for_date(&self, date: &LogDate) -> ServiceResult<Vec<String>> {
        let mut entries = Vec::new();
        let mut cursor = 0;
        loop {
            let page = self.store.scan_groups(cursor, GROUP_SCAN_PAGE)?;
            for group_id in page.groups {
                if let Some(day) = self.store.get_logs(group_id, date)? {
                    entries.extend(day);
                }
            }
            if page.cursor == 0 {
                break;
            }
            cursor = page.cursor;
        }
        Ok(entries)
    }

    /// Runs the engine and logs the outcome.
    pub fn score(&self, entries: &[String]) -> ServiceResult<FragmentationResult> {
        let result = self.engine.compute(entries).map_err(|err| {
            warn!("event=fragmentation module=service status=error error={err}");
            err
        })?;

        if is_fracture(result.fragmentation) {
            warn!(
                "event=reality_fracture module=service index={} consensus={}",
                format_index(result.fragmentation),
                sanitize_message(&result.consensus_text, LOG_PREVIEW_CHARS)
            );
        }
        Ok(result)
    }
}
