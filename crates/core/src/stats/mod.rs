//! Aggregate usage statistics for the profile and status views.
//!
//! Everything here is computed fresh per request; there is no caching.

mod service;
mod types;

pub use service::{StatsRepository, StatsService};
pub use types::{ProfileStats, RECENT_FILES_LIMIT, StatsError, SystemStatus};
