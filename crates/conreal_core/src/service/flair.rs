//! Flair synchronization: group fragmentation -> user badge.

use crate::badge::RealityBadge;
use crate::model::reality_log::GroupId;
use crate::platform::{FlairRequest, Platform};
use crate::repo::log_store::LogStore;
use crate::service::group_service::GroupService;
use crate::service::ServiceResult;
use crate::similarity::SimilarityScorer;
use log::{info, warn};

/// What a flair sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlairOutcome {
    /// The group has no entries; nothing was sent.
    NoLogs,
    /// The request has no user to decorate.
    NoUser,
    Synced {
        username: String,
        subreddit: String,
        badge: RealityBadge,
    },
}

/// Recomputes a group's index and sets it as the current user's flair.
///
/// Falls back to `default_subreddit` when the platform does not report one.
pub fn sync_group_flair<S, Sc, P>(
    groups: &GroupService<S, Sc>,
    platform: &P,
    group_id: GroupId,
    default_subreddit: &str,
) -> ServiceResult<FlairOutcome>
where
    S: LogStore,
    Sc: SimilarityScorer,
    P: Platform + ?Sized,
{
    let entries = groups.group_entries(group_id)?;
    if entries.is_empty() {
        warn!("event=flair_sync module=service status=skipped reason=no_logs group_id={group_id}");
        return Ok(FlairOutcome::NoLogs);
    }

    let result = groups.score(&entries)?;
    let badge = RealityBadge::for_fragmentation(result.fragmentation);

    let Some(username) = platform.current_username()? else {
        warn!("event=flair_sync module=service status=skipped reason=no_user group_id={group_id}");
        return Ok(FlairOutcome::NoUser);
    };
    let subreddit = platform
        .subreddit_name()
        .unwrap_or_else(|| default_subreddit.to_string());

    platform
        .set_user_flair(&FlairRequest {
            subreddit_name: subreddit.clone(),
            username: username.clone(),
            text: badge.text.clone(),
            background_color: badge.background_color.clone(),
        })
        .map_err(|err| {
            warn!("event=flair_sync module=service status=error group_id={group_id} error={err}");
            err
        })?;

    info!(
        "event=flair_sync module=service status=ok group_id={group_id} subreddit={subreddit} band={} color={}",
        badge.band.label(),
        badge.background_color
    );
    Ok(FlairOutcome::Synced {
        username,
        subreddit,
        badge,
    })
}
