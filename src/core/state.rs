//! In-process run state owned by the monitor loop

use crate::signals::engine::CrossingStates;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Everything the bot remembers between cycles. Never written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub crossings: CrossingStates,
    pub seen_news_ids: HashSet<String>,
    pub seen_event_ids: HashSet<String>,
    /// UTC date of the last news/events poll
    pub last_daily_update: Option<NaiveDate>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn daily_update_due(&self, today: NaiveDate) -> bool {
        self.last_daily_update != Some(today)
    }
}
