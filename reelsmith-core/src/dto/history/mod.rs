//! History listing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::VideoJob;
use crate::dto::lenient;

pub const DEFAULT_PAGE_SIZE: i64 = 5;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Query parameters of the history listing
///
/// Each field falls back on its own; an unreadable `limit` keeps a valid `page`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub page: Option<i64>,
}

impl HistoryQuery {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`; missing or zero means the default
    pub fn limit(&self) -> i64 {
        match self.limit {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(limit) => limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// One-based page number, never below 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// One page of ledger rows, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    pub history: Vec<VideoJob>,
    pub total: i64,
}
