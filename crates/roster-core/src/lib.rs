//! Reactive pagination core between a paged directory source and UI
//! consumers.
//!
//! This crate owns the business logic and domain model for the roster
//! workspace:
//!
//! - **[`Pager`]** — Pagination controller managing one screen session:
//!   [`start()`](Pager::start) issues the first fetch, scroll positions
//!   fed to [`on_scroll()`](Pager::on_scroll) arm incremental loads, and
//!   failures self-heal through a delayed full refresh. State flows out
//!   through `watch` channels as immutable snapshots.
//!
//! - **[`Roster`]** — Insertion-ordered, identity-deduplicated storage
//!   for the visible list. The first delivery of an id wins.
//!
//! - **[`PageGateway`]** — Async boundary to whatever serves the pages
//!   (HTTP in `roster-api`, scripted doubles in tests).
//!
//! - **[`ViewState`]** — The single externally observable screen state
//!   (Idle / Loading / Error / Success).

pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod pager;
pub mod store;
pub mod trigger;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::PagerConfig;
pub use error::CoreError;
pub use gateway::PageGateway;
pub use model::{Cursor, Page, Person, PersonId};
pub use pager::{EMPTY_DIRECTORY_MESSAGE, Pager, ViewState};
pub use store::Roster;
pub use trigger::ScrollPosition;
