// ── Fetch gateway boundary ──
//
// The pager's only view of the outside world. HTTP lives in roster-api;
// tests script this trait directly.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{Cursor, Page};

/// A paged source of directory entries.
///
/// `None` means "start from the beginning". Implementations must tolerate
/// repeated calls with the same cursor -- after a failed round the pager
/// re-issues the fetch from scratch.
#[async_trait]
pub trait PageGateway: Send + Sync {
    /// Fetch one page of people, resuming at `cursor`.
    async fn fetch_page(&self, cursor: Option<Cursor>) -> Result<Page, CoreError>;
}
