use conreal_core::db::open_db_in_memory;
use conreal_core::{
    create_monitor_post, publish_daily_report, recent_reports, share_group, sync_group_flair,
    FlairOutcome, FlairRequest, GroupService, LogDate, Platform, PlatformError, PlatformResult,
    PostRef, PostRequest, RealityBand, ReportOutcome, ServiceError, SqliteLogStore,
};
use std::cell::RefCell;
use uuid::Uuid;

#[derive(Default)]
struct RecordingPlatform {
    username: Option<String>,
    subreddit: Option<String>,
    fail_writes: bool,
    flairs: RefCell<Vec<FlairRequest>>,
    posts: RefCell<Vec<PostRequest>>,
}

impl RecordingPlatform {
    fn signed_in(username: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            ..Self::default()
        }
    }
}

impl Platform for RecordingPlatform {
    fn current_username(&self) -> PlatformResult<Option<String>> {
        Ok(self.username.clone())
    }

    fn subreddit_name(&self) -> Option<String> {
        self.subreddit.clone()
    }

    fn set_user_flair(&self, request: &FlairRequest) -> PlatformResult<()> {
        if self.fail_writes {
            return Err(PlatformError::new("flair rejected"));
        }
        self.flairs.borrow_mut().push(request.clone());
        Ok(())
    }

    fn submit_post(&self, request: &PostRequest) -> PlatformResult<PostRef> {
        if self.fail_writes {
            return Err(PlatformError::new("post rejected"));
        }
        let mut posts = self.posts.borrow_mut();
        posts.push(request.clone());
        Ok(PostRef {
            id: format!("t3_{}", posts.len()),
            title: request.title.clone(),
        })
    }

    fn hot_posts(&self, subreddit_name: &str, limit: u32) -> PlatformResult<Vec<PostRef>> {
        Ok(self
            .posts
            .borrow()
            .iter()
            .filter(|post| post.subreddit_name == subreddit_name)
            .take(limit as usize)
            .enumerate()
            .map(|(index, post)| PostRef {
                id: format!("t3_{}", index + 1),
                title: post.title.clone(),
            })
            .collect())
    }
}

fn day(value: &str) -> LogDate {
    LogDate::parse(value).unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn flair_carries_badge_of_group_index() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteLogStore::new(&conn));
    let group_id = service
        .create_group(&strings(&["apple", "banana", "carrot"]), &day("2025-09-14"))
        .unwrap();
    let platform = RecordingPlatform::signed_in("observer");

    let outcome = sync_group_flair(&service, &platform, group_id, "conrealmonitor_dev").unwrap();

    let (username, subreddit, badge) = match outcome {
        FlairOutcome::Synced {
            username,
            subreddit,
            badge,
        } => (username, subreddit, badge),
        other => panic!("expected synced flair, got {other:?}"),
    };
    assert_eq!(username, "observer");
    assert_eq!(subreddit, "conrealmonitor_dev");
    assert_eq!(badge.band, RealityBand::Chaotic);

    let flairs = platform.flairs.borrow();
    assert_eq!(flairs.len(), 1);
    assert_eq!(flairs[0].text, "Reality Index: 1.00");
    assert_eq!(flairs[0].background_color, "#EF4444");
}

#[test]
fn flair_prefers_platform_subreddit() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteLogStore::new(&conn));
    let group_id = service
        .create_group(&strings(&["same", "same"]), &day("2025-09-14"))
        .unwrap();
    let platform = RecordingPlatform {
        subreddit: Some("realitylab".to_string()),
        ..RecordingPlatform::signed_in("observer")
    };

    sync_group_flair(&service, &platform, group_id, "conrealmonitor_dev").unwrap();

    let flairs = platform.flairs.borrow();
    assert_eq!(flairs[0].subreddit_name, "realitylab");
    assert_eq!(flairs[0].text, "Reality Index: 0.00");
    assert_eq!(flairs[0].background_color, "#22C55E");
}

#[test]
fn flair_is_skipped_without_logs_or_user() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteLogStore::new(&conn));
    let platform = RecordingPlatform::signed_in("observer");

    let outcome =
        sync_group_flair(&service, &platform, Uuid::new_v4(), "conrealmonitor_dev").unwrap();
    assert_eq!(outcome, FlairOutcome::NoLogs);

    let group_id = service
        .create_group(&strings(&["a reality"]), &day("2025-09-14"))
        .unwrap();
    let anonymous = RecordingPlatform::default();
    let outcome = sync_group_flair(&service, &anonymous, group_id, "conrealmonitor_dev").unwrap();
    assert_eq!(outcome, FlairOutcome::NoUser);

    assert!(platform.flairs.borrow().is_empty());
    assert!(anonymous.flairs.borrow().is_empty());
}

#[test]
fn flair_failure_surfaces_platform_error() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteLogStore::new(&conn));
    let group_id = service
        .create_group(&strings(&["one", "two"]), &day("2025-09-14"))
        .unwrap();
    let platform = RecordingPlatform {
        fail_writes: true,
        ..RecordingPlatform::signed_in("observer")
    };

    let err = sync_group_flair(&service, &platform, group_id, "conrealmonitor_dev").unwrap_err();
    assert!(matches!(err, ServiceError::Platform(_)));
}

#[test]
fn daily_report_aggregates_all_groups_for_the_day() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteLogStore::new(&conn));
    let today = day("2025-09-14");
    service
        .create_group(&strings(&["sky is blue", "sky is blue"]), &today)
        .unwrap();
    service
        .create_group(&strings(&["sky is blue"]), &today)
        .unwrap();
    service
        .create_group(&strings(&["yesterday only"]), &day("2025-09-13"))
        .unwrap();
    let platform = RecordingPlatform::default();

    let outcome = publish_daily_report(&service, &platform, &today, "conrealmonitor_dev").unwrap();

    let post = match outcome {
        ReportOutcome::Posted(post) => post,
        other => panic!("expected a posted report, got {other:?}"),
    };
    assert_eq!(post.title, "Daily Reality Report: 2025-09-14");

    let posts = platform.posts.borrow();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].subreddit_name, "conrealmonitor_dev");
    assert!(posts[0].text.contains("index 0.00 (stable)"));
    assert!(posts[0].text.contains("across 3 reality logs"));
    assert!(posts[0].text.contains("Consensus: sky is blue."));
}

#[test]
fn daily_report_without_entries_posts_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = GroupService::new(SqliteLogStore::new(&conn));
    let platform = RecordingPlatform::default();

    let outcome =
        publish_daily_report(&service, &platform, &day("2025-09-14"), "conrealmonitor_dev")
            .unwrap();

    assert_eq!(outcome, ReportOutcome::NoData);
    assert!(platform.posts.borrow().is_empty());
}

#[test]
fn share_and_monitor_posts_land_in_subreddit() {
    let platform = RecordingPlatform::default();
    let group_id = Uuid::new_v4();

    let shared = share_group(&platform, group_id, "realitylab").unwrap();
    assert_eq!(shared.title, "Join our Reality Monitoring Group!");
    let monitor = create_monitor_post(&platform, "realitylab").unwrap();
    assert_eq!(monitor.title, "conrealmonitor");

    let posts = platform.posts.borrow();
    assert!(posts[0].text.contains(&group_id.to_string()));
    drop(posts);

    let reports = recent_reports(&platform, "realitylab").unwrap();
    assert_eq!(reports.len(), 2);
    assert!(recent_reports(&platform, "elsewhere").unwrap().is_empty());
}

#[test]
fn share_failure_is_reported() {
    let platform = RecordingPlatform {
        fail_writes: true,
        ..RecordingPlatform::default()
    };
    assert!(matches!(
        share_group(&platform, Uuid::new_v4(), "realitylab"),
        Err(ServiceError::Platform(_))
    ));
}
