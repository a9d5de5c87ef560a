// ── Roster storage ──
//
// Insertion-ordered, identity-deduplicated storage for the visible list.

mod roster;

pub use roster::Roster;
