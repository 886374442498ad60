//! Contract for the hosting platform (user flair, posts, current user).
//!
//! Core never talks to the platform directly; services receive an
//! implementation of [`Platform`] from the gateway.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Any failure reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    pub message: String,
}

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for PlatformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "platform call failed: {}", self.message)
    }
}

impl Error for PlatformError {}

/// User flair assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlairRequest {
    pub subreddit_name: String,
    pub username: String,
    pub text: String,
    pub background_color: String,
}

/// Text post submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub subreddit_name: String,
    pub title: String,
    pub text: String,
}

/// A post as reported back by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRef {
    pub id: String,
    pub title: String,
}

/// Third-party platform operations used by the services.
pub trait Platform {
    /// Name of the requesting user, `None` for anonymous requests.
    fn current_username(&self) -> PlatformResult<Option<String>>;
    /// Community the request came from, if the platform knows it.
    fn subreddit_name(&self) -> Option<String>;
    fn set_user_flair(&self, request: &FlairRequest) -> PlatformResult<()>;
    fn submit_post(&self, request: &PostRequest) -> PlatformResult<PostRef>;
    fn hot_posts(&self, subreddit_name: &str, limit: u32) -> PlatformResult<Vec<PostRef>>;
}
