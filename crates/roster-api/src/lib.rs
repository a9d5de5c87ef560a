//! Async HTTP client for a cursor-paged people directory.
//!
//! Implements `roster-core`'s [`PageGateway`](roster_core::PageGateway)
//! over a single endpoint:
//!
//! ```text
//! GET {base}/api/people?limit=N[&cursor=T]
//! → {"people": [{"id": 1, "fullName": "Ada"}, …], "next": "p2" | null}
//! ```
//!
//! Wire shapes stay private; consumers see `roster_core` domain types
//! and [`Error`] only.

mod client;
mod error;
mod models;

pub use client::DirectoryClient;
pub use error::Error;
