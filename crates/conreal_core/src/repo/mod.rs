//! Log store contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Keep SQL details out of the use-case services.
//! - Mirror the key-value shape the app was designed around: per-group,
//!   per-day lists, group and date registries, standalone logs, a counter.
//!
//! # Invariants
//! - Writes are last-write-wins; no merge of concurrent list updates.
//! - Reads reject malformed persisted ids/dates instead of masking them.

pub mod log_store;
