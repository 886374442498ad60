//! Domain model for reality logs and their groups.
//!
//! # Invariants
//! - Groups and logs are identified by stable UUIDs.
//! - Stored logs are immutable; a day's list is only ever replaced whole.

pub mod reality_log;
