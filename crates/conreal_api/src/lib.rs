//! Request-gateway facing handlers for the Consensus Reality Monitor.
//!
//! Each handler decodes its input, calls `conreal_core` services and hands
//! back an [`ApiReply`] the host can write out as an HTTP response.

pub mod api;
pub mod config;

pub use api::{core_version, init_logging, ping, ApiContext, ApiReply};
pub use config::ApiConfig;
