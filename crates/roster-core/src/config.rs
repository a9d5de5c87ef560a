// ── Pager tuning ──
//
// Knobs for the pagination controller. Built by the config layer or the
// host application and handed in -- the core never reads files or the
// environment.

use std::time::Duration;

/// Tuning for a [`Pager`](crate::Pager) session.
#[derive(Debug, Clone)]
pub struct PagerConfig {
    /// Rows from the end of the list within which a prefetch is armed.
    pub visible_threshold: usize,
    /// Delay before a failed fetch is retried with a full refresh.
    pub retry_delay: Duration,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            visible_threshold: 2,
            retry_delay: Duration::from_millis(2000),
        }
    }
}
