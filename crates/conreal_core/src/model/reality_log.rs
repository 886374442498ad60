//! Reality log record and the UTC day bucket it is filed under.
//!
//! # Invariants
//! - `LogDate` always holds a real `YYYY-MM-DD` calendar day.
//! - A `RealityLog` never carries blank text once validated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static LOG_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid log date regex"));

/// Stable identifier of a group of reality logs.
pub type GroupId = Uuid;

/// Stable identifier of a single submitted log.
pub type LogId = Uuid;

/// Rejected `YYYY-MM-DD` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDateError {
    pub value: String,
}

impl Display for LogDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid log date `{}`; expected YYYY-MM-DD", self.value)
    }
}

impl Error for LogDateError {}

/// UTC calendar day a log list is bucketed under.
///
/// Ordering is chronological because the textual form is zero padded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogDate(String);

impl LogDate {
    /// Parses a `YYYY-MM-DD` string, rejecting impossible days like `2024-02-30`.
    pub fn parse(value: &str) -> Result<Self, LogDateError> {
        let trimmed = value.trim();
        let invalid = || LogDateError {
            value: value.to_string(),
        };
        let caps = LOG_DATE_RE.captures(trimmed).ok_or_else(invalid)?;
        let year: u32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        let day: u32 = caps[3].parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(invalid());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LogDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LogDate {
    type Error = LogDateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LogDate> for String {
    fn from(value: LogDate) -> Self {
        value.0
    }
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Validation failure for a reality log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealityLogValidationError {
    /// Text is empty or whitespace only.
    BlankText,
}

impl Display for RealityLogValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText => write!(f, "reality log text cannot be blank"),
        }
    }
}

impl Error for RealityLogValidationError {}

/// One free-text submission.
///
/// Author and timestamp metadata stay with the platform; the store only
/// needs the text and the day bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealityLog {
    pub log_id: LogId,
    /// `None` for logs submitted outside any group.
    pub group_id: Option<GroupId>,
    pub text: String,
    pub log_date: LogDate,
}

impl RealityLog {
    /// Creates a log with a generated id.
    pub fn new(group_id: Option<GroupId>, text: impl Into<String>, log_date: LogDate) -> Self {
        Self::with_id(Uuid::new_v4(), group_id, text, log_date)
    }

    /// Creates a log with a caller-provided id.
    pub fn with_id(
        log_id: LogId,
        group_id: Option<GroupId>,
        text: impl Into<String>,
        log_date: LogDate,
    ) -> Self {
        Self {
            log_id,
            group_id,
            text: text.into(),
            log_date,
        }
    }

    pub fn validate(&self) -> Result<(), RealityLogValidationError> {
        if self.text.trim().is_empty() {
            return Err(RealityLogValidationError::BlankText);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LogDate, RealityLog, RealityLogValidationError};

    #[test]
    fn log_date_accepts_real_days_only() {
        assert_eq!(LogDate::parse("2025-09-14").unwrap().as_str(), "2025-09-14");
        assert!(LogDate::parse("2024-02-29").is_ok());
        assert!(LogDate::parse("2023-02-29").is_err());
        assert!(LogDate::parse("2025-13-01").is_err());
        assert!(LogDate::parse("2025-9-14").is_err());
        assert!(LogDate::parse("2025-09-14T10:00:00Z").is_err());
    }

    #[test]
    fn log_dates_order_chronologically() {
        let earlier = LogDate::parse("2025-01-31").unwrap();
        let later = LogDate::parse("2025-02-01").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn log_date_serializes_as_plain_string() {
        let date = LogDate::parse("2025-09-14").unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2025-09-14\"");
        assert!(serde_json::from_str::<LogDate>("\"2025-02-30\"").is_err());
    }

    #[test]
    fn blank_text_is_rejected() {
        let date = LogDate::parse("2025-09-14").unwrap();
        let log = RealityLog::new(None, "  \n ", date);
        assert_eq!(log.validate(), Err(RealityLogValidationError::BlankText));
    }
}
