//! Gateway handlers for the monitor's HTTP surface.
//!
//! # Responsibility
//! - Decode request input, call core services, shape JSON replies.
//! - Map core failures to status codes.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes an [`ApiReply`].
//! - 500 replies carry a fixed message, never error internals.
//! - The database is opened per call; no state is kept between calls.

use crate::config::ApiConfig;
use conreal_core::db::{current_utc_date, open_db, DbError};
use conreal_core::{
    core_version as core_version_inner, create_monitor_post, init_logging as init_logging_inner,
    ping as ping_inner, publish_daily_report, recent_reports, share_group as share_group_inner,
    sync_group_flair, FlairOutcome, GroupId, GroupService, LogDate, LogStore, LogSubmission,
    Platform, ReportOutcome, ServiceError, ServiceResult, SqliteLogStore,
};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Minimal health-check API.
pub fn ping() -> String {
    ping_inner().to_owned()
}

pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
pub fn init_logging(level: &str, log_dir: &str) -> String {
    match init_logging_inner(level, log_dir) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

impl ApiReply {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "status": "error", "message": message }),
        }
    }

    fn json<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self::ok(value),
            Err(err) => {
                error!("event=reply_encode module=api status=error error={err}");
                Self::error(500, "Failed to encode response")
            }
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CounterBody {
    #[serde(rename = "type")]
    kind: &'static str,
    post_id: String,
    count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupDataBody {
    status: &'static str,
    group_id: GroupId,
    fragmentation: f64,
    consensus_reality_text: String,
    fragmented_realities: Vec<String>,
    string_count: usize,
}

#[derive(Debug)]
enum HandlerError {
    Db(DbError),
    Service(ServiceError),
}

impl Display for HandlerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl From<DbError> for HandlerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for HandlerError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

type Groups<'conn> = GroupService<SqliteLogStore<'conn>>;

/// Handler set bound to one config and one platform client.
pub struct ApiContext<P: Platform> {
    config: ApiConfig,
    platform: P,
}

impl<P: Platform> ApiContext<P> {
    /// Handlers over an explicit config, as tests and embedders build them.
    pub fn new(config: ApiConfig, platform: P) -> Self {
        Self { config, platform }
    }

    /// Binds the process-wide environment config and starts logging when
    /// `CONREAL_LOG_DIR` is set.
    ///
    /// A logging failure is reported on stderr and never blocks the handlers.
    pub fn from_env(platform: P) -> Self {
        let config = ApiConfig::global().clone();
        match config.start_logging() {
            Ok(true) => info!(
                "event=api_start module=api status=ok db_path={} subreddit={}",
                config.db_path.display(),
                config.subreddit
            ),
            Ok(false) => {}
            Err(err) => eprintln!("conreal_api: logging disabled: {err}"),
        }
        Self::new(config, platform)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Counter value and current user for the client's first render.
    ///
    /// A missing `post_id` gets a fresh one.
    pub fn init(&self, post_id: Option<&str>) -> ApiReply {
        let post_id = present(post_id)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let loaded = self.with_groups(|groups, _| {
            let count = groups.store().get_count()?;
            let username = self.platform.current_username()?;
            Ok((count, username))
        });
        match loaded {
            Ok((count, username)) => ApiReply::json(&CounterBody {
                kind: "init",
                post_id,
                count,
                username: Some(username.unwrap_or_else(|| "anonymous".to_string())),
            }),
            Err(err) => failure("init", &err, 400, "Initialization failed"),
        }
    }

    /// Adds one to the shared counter.
    pub fn increment(&self, post_id: Option<&str>) -> ApiReply {
        self.step_counter(post_id, "increment", 1)
    }

    /// Subtracts one from the shared counter.
    pub fn decrement(&self, post_id: Option<&str>) -> ApiReply {
        self.step_counter(post_id, "decrement", -1)
    }

    fn step_counter(&self, post_id: Option<&str>, kind: &'static str, amount: i64) -> ApiReply {
        let Some(post_id) = present(post_id) else {
            return ApiReply::error(400, "postId is required");
        };
        match self.with_groups(|groups, _| Ok(groups.store().incr_count(amount)?)) {
            Ok(count) => ApiReply::json(&CounterBody {
                kind,
                post_id: post_id.to_string(),
                count,
                username: None,
            }),
            Err(err) => failure(kind, &err, 500, "Failed to update count"),
        }
    }

    /// Creates the landing post when the app is installed.
    pub fn install_post(&self) -> ApiReply {
        let subreddit = self.subreddit();
        match create_monitor_post(&self.platform, &subreddit) {
            Ok(post) => ApiReply::ok(json!({
                "status": "success",
                "message": format!("Post created in subreddit {subreddit} with id {}", post.id),
            })),
            Err(err) => failure("install_post", &err, 400, "Failed to create post"),
        }
    }

    /// Creates the landing post from the moderator menu and returns its link.
    pub fn menu_post_create(&self) -> ApiReply {
        let subreddit = self.subreddit();
        match create_monitor_post(&self.platform, &subreddit) {
            Ok(post) => ApiReply::ok(json!({
                "navigateTo": format!("https://reddit.com/r/{subreddit}/comments/{}", post.id),
            })),
            Err(err) => failure("menu_post_create", &err, 400, "Failed to create post"),
        }
    }

    /// `{ "strings": [...] }` -> new group seeded under today's date.
    ///
    /// Non-string items are dropped.
    pub fn create_group(&self, body: &Value) -> ApiReply {
        let Some(items) = body.get("strings").and_then(Value::as_array) else {
            warn!("event=group_create module=api status=rejected reason=strings_missing");
            return ApiReply::error(400, "strings array is required");
        };
        let strings = items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect::<Vec<_>>();

        match self.with_groups(|groups, today| groups.create_group(&strings, today)) {
            Ok(group_id) => ApiReply::ok(json!({
                "status": "success",
                "uuid": group_id,
                "alert": format!("New group created with UUID: {group_id}"),
            })),
            Err(err) => failure("group_create", &err, 500, "Failed to store group"),
        }
    }

    /// `{ "logId"?, "data", "groupId"? }` -> stored log.
    ///
    /// Grouped logs also refresh the caller's flair; a flair failure does
    /// not fail the submission.
    pub fn submit_log(&self, body: &Value) -> ApiReply {
        let data = match body.get("data") {
            None | Some(Value::Null) => return ApiReply::error(400, "data is required"),
            Some(Value::String(data)) => data,
            Some(_) => return ApiReply::error(400, "data must be a string"),
        };
        let Ok(log_id) = optional_uuid(body, "logId") else {
            return ApiReply::error(400, "logId must be a UUID");
        };
        let Ok(group_id) = optional_uuid(body, "groupId") else {
            return ApiReply::error(400, "groupId must be a UUID");
        };
        let submission = LogSubmission {
            log_id,
            data: data.to_string(),
            group_id,
        };

        let stored = self.with_groups(|groups, today| {
            let receipt = groups.submit_log(&submission, today)?;
            if let Some(group_id) = receipt.group_id {
                self.refresh_flair(groups, group_id);
            }
            Ok(receipt)
        });
        match stored {
            Ok(receipt) => ApiReply::ok(json!({
                "status": "success",
                "message": format!("Log {} stored", receipt.log_id),
                "logId": receipt.log_id,
            })),
            Err(HandlerError::Service(ServiceError::MissingData)) => {
                ApiReply::error(400, "data is required")
            }
            Err(err) => failure("log_submit", &err, 500, "Failed to store log"),
        }
    }

    /// Fragmentation summary of a group.
    pub fn group_data(&self, group_id: &str) -> ApiReply {
        let group_id = match parse_group_id(group_id) {
            Ok(group_id) => group_id,
            Err(reply) => return reply,
        };
        match self.with_groups(|groups, _| groups.group_report(group_id)) {
            Ok(result) => ApiReply::json(&GroupDataBody {
                status: "success",
                group_id,
                fragmentation: result.fragmentation,
                consensus_reality_text: result.consensus_text,
                fragmented_realities: result.fragmented_samples,
                string_count: result.sample_count,
            }),
            Err(HandlerError::Service(ServiceError::GroupNotFound(_))) => {
                ApiReply::error(404, "Group not found")
            }
            Err(err) => failure("group_data", &err, 500, "Failed to fetch group data"),
        }
    }

    /// Per-day consensus points and branches for the timeline view.
    pub fn group_timeline(&self, group_id: &str) -> ApiReply {
        let group_id = match parse_group_id(group_id) {
            Ok(group_id) => group_id,
            Err(reply) => return reply,
        };
        match self.with_groups(|groups, _| groups.group_timeline(group_id)) {
            Ok(timeline) => ApiReply::json(&timeline),
            Err(HandlerError::Service(ServiceError::GroupNotFound(_))) => {
                ApiReply::error(404, "Group not found")
            }
            Err(err) => failure("group_timeline", &err, 500, "Failed to fetch group timeline"),
        }
    }

    /// Sets the caller's flair from the group's current index.
    pub fn set_flair(&self, group_id: &str) -> ApiReply {
        let group_id = match parse_group_id(group_id) {
            Ok(group_id) => group_id,
            Err(reply) => return reply,
        };
        let default_subreddit = self.config.subreddit.as_str();
        let synced = self.with_groups(|groups, _| {
            sync_group_flair(groups, &self.platform, group_id, default_subreddit)
        });
        match synced {
            Ok(FlairOutcome::Synced { badge, .. }) => ApiReply::ok(json!({
                "status": "success",
                "message": "Flair updated successfully",
                "flair": badge.text,
            })),
            Ok(FlairOutcome::NoLogs) => ApiReply::ok(json!({
                "status": "success",
                "message": "No logs for group, flair unchanged",
            })),
            Ok(FlairOutcome::NoUser) => ApiReply::ok(json!({
                "status": "success",
                "message": "No user to update, flair unchanged",
            })),
            Err(err) => failure(
                "set_flair",
                &err,
                500,
                "Flair update failed - check mod permissions",
            ),
        }
    }

    /// Posts an invitation for `group_id`.
    pub fn share_group(&self, group_id: &str) -> ApiReply {
        let group_id = match parse_group_id(group_id) {
            Ok(group_id) => group_id,
            Err(reply) => return reply,
        };
        match share_group_inner(&self.platform, group_id, &self.subreddit()) {
            Ok(post) => ApiReply::ok(json!({ "status": "success", "postId": post.id })),
            Err(err) => failure("share_group", &err, 500, "Failed to create share post"),
        }
    }

    /// Aggregates today's entries across every group and posts the report.
    pub fn daily_report(&self) -> ApiReply {
        let subreddit = self.config.subreddit.as_str();
        let published = self.with_groups(|groups, today| {
            publish_daily_report(groups, &self.platform, today, subreddit)
        });
        match published {
            Ok(ReportOutcome::NoData) => ApiReply::ok(json!({
                "status": "success",
                "message": "No data to report",
            })),
            Ok(ReportOutcome::Posted(post)) => {
                ApiReply::ok(json!({ "status": "success", "postId": post.id }))
            }
            Err(err) => failure("daily_report", &err, 500, "Failed to generate report"),
        }
    }

    /// Recent hot posts of the configured subreddit.
    pub fn reports(&self) -> ApiReply {
        match recent_reports(&self.platform, &self.config.subreddit) {
            Ok(posts) => ApiReply::ok(json!({ "status": "success", "reports": posts })),
            Err(err) => failure("reports", &err, 500, "Failed to fetch reports"),
        }
    }

    fn subreddit(&self) -> String {
        self.platform
            .subreddit_name()
            .unwrap_or_else(|| self.config.subreddit.clone())
    }

    fn refresh_flair(&self, groups: &Groups<'_>, group_id: GroupId) {
        match sync_group_flair(groups, &self.platform, group_id, &self.config.subreddit) {
            Ok(_) => {
                info!("event=flair_refresh module=api status=ok group_id={group_id}");
            }
            Err(err) => {
                warn!("event=flair_refresh module=api status=error group_id={group_id} error={err}");
            }
        }
    }

    fn with_groups<T>(
        &self,
        f: impl FnOnce(&Groups<'_>, &LogDate) -> ServiceResult<T>,
    ) -> Result<T, HandlerError> {
        let conn = open_db(&self.config.db_path)?;
        let today = current_utc_date(&conn)?;
        let groups = GroupService::new(SqliteLogStore::new(&conn));
        Ok(f(&groups, &today)?)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

// Absent, null and blank ids all mean "none".
fn optional_uuid(body: &Value, key: &str) -> Result<Option<Uuid>, uuid::Error> {
    present(body.get(key).and_then(Value::as_str))
        .map(Uuid::parse_str)
        .transpose()
}

fn parse_group_id(raw: &str) -> Result<GroupId, ApiReply> {
    let Some(raw) = present(Some(raw)) else {
        return Err(ApiReply::error(400, "groupId is required"));
    };
    Uuid::parse_str(raw).map_err(|_| ApiReply::error(400, "groupId must be a UUID"))
}

fn failure(event: &str, err: &dyn Display, status: u16, message: &str) -> ApiReply {
    error!("event={event} module=api status=error error={err}");
    ApiReply::error(status, message)
}
