//! Posts published on the platform: daily report, group share, monitor post.

use crate::badge::{format_index, RealityBand};
use crate::fragmentation::FragmentationResult;
use crate::model::reality_log::{GroupId, LogDate};
use crate::platform::{Platform, PostRef, PostRequest};
use crate::repo::log_store::LogStore;
use crate::service::group_service::GroupService;
use crate::service::ServiceResult;
use crate::similarity::SimilarityScorer;
use log::info;

/// Number of recent posts returned by [`recent_reports`].
pub const REPORTS_LIMIT: u32 = 50;
pub const MONITOR_POST_TITLE: &str = "conrealmonitor";

/// What a daily report run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// No group has entries for the day; nothing was posted.
    NoData,
    Posted(PostRef),
}

/// Title and body of the daily report for `date`.
pub fn daily_report_post(
    date: &LogDate,
    result: &FragmentationResult,
    subreddit: &str,
) -> PostRequest {
    let band = RealityBand::from_fragmentation(result.fragmentation);
    PostRequest {
        subreddit_name: subreddit.to_string(),
        title: format!("Daily Reality Report: {date}"),
        text: format!(
            "The multiverse settled at index {} ({}) across {} reality logs. Consensus: {}.",
            format_index(result.fragmentation),
            band.label(),
            result.sample_count,
            result.consensus_text
        ),
    }
}

/// Aggregates every group's entries for `date` and posts the report.
pub fn publish_daily_report<S, Sc, P>(
    groups: &GroupService<S, Sc>,
    platform: &P,
    date: &LogDate,
    subreddit: &str,
) -> ServiceResult<ReportOutcome>
where
    S: LogStore,
    Sc: SimilarityScorer,
    P: Platform + ?Sized,
{
    let entries = groups.entries_for_date(date)?;
    if entries.is_empty() {
        info!("event=daily_report module=service status=skipped reason=no_data log_date={date}");
        return Ok(ReportOutcome::NoData);
    }

    let result = groups.score(&entries)?;
    let post = platform.submit_post(&daily_report_post(date, &result, subreddit))?;
    info!(
        "event=daily_report module=service status=ok log_date={date} post_id={} index={}",
        post.id,
        format_index(result.fragmentation)
    );
    Ok(ReportOutcome::Posted(post))
}

/// Posts an invitation to join `group_id`.
pub fn share_group<P: Platform + ?Sized>(
    platform: &P,
    group_id: GroupId,
    subreddit: &str,
) -> ServiceResult<PostRef> {
    let post = platform.submit_post(&PostRequest {
        subreddit_name: subreddit.to_string(),
        title: "Join our Reality Monitoring Group!".to_string(),
        text: format!("Join our reality monitoring group with UUID: {group_id}"),
    })?;
    info!(
        "event=group_share module=service status=ok group_id={group_id} post_id={}",
        post.id
    );
    Ok(post)
}

/// Creates the app's landing post in `subreddit`.
pub fn create_monitor_post<P: Platform + ?Sized>(
    platform: &P,
    subreddit: &str,
) -> ServiceResult<PostRef> {
    let post = platform.submit_post(&PostRequest {
        subreddit_name: subreddit.to_string(),
        title: MONITOR_POST_TITLE.to_string(),
        text: "Log your reality. Watch the consensus drift.".to_string(),
    })?;
    info!(
        "event=monitor_post module=service status=ok subreddit={subreddit} post_id={}",
        post.id
    );
    Ok(post)
}

/// Hot posts of `subreddit`, where daily reports land.
pub fn recent_reports<P: Platform + ?Sized>(
    platform: &P,
    subreddit: &str,
) -> ServiceResult<Vec<PostRef>> {
    Ok(platform.hot_posts(subreddit, REPORTS_LIMIT)?)
}
