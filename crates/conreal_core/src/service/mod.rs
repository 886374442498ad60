//! Use-case services over the log store and the platform.
//!
//! # Responsibility
//! - Orchestrate store reads/writes around the fragmentation engine.
//! - Own all logging around fragmentation; the engine itself stays pure.
//! - Keep gateway code free of storage and platform details.

use crate::fragmentation::FragmentationError;
use crate::model::reality_log::{GroupId, RealityLogValidationError};
use crate::platform::PlatformError;
use crate::repo::log_store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod flair;
pub mod group_service;
pub mod report;
pub mod timeline;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level failure.
#[derive(Debug)]
pub enum ServiceError {
    /// Submitted log carries no usable text.
    MissingData,
    /// Group has no stored entries.
    GroupNotFound(GroupId),
    Store(StoreError),
    Fragmentation(FragmentationError),
    Platform(PlatformError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingData => write!(f, "log data is required"),
            Self::GroupNotFound(group_id) => write!(f, "group not found: {group_id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Fragmentation(err) => write!(f, "{err}"),
            Self::Platform(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Fragmentation(err) => Some(err),
            Self::Platform(err) => Some(err),
            Self::MissingData | Self::GroupNotFound(_) => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<FragmentationError> for ServiceError {
    fn from(value: FragmentationError) -> Self {
        Self::Fragmentation(value)
    }
}

impl From<PlatformError> for ServiceError {
    fn from(value: PlatformError) -> Self {
        Self::Platform(value)
    }
}

impl From<RealityLogValidationError> for ServiceError {
    fn from(value: RealityLogValidationError) -> Self {
        match value {
            RealityLogValidationError::BlankText => Self::MissingData,
        }
    }
}
