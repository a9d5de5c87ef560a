// ── Scroll-driven load trigger ──
//
// Pure latch deciding when a scroll position warrants the next page.
// Framework-free so the threshold logic is testable on its own.

/// Scroll geometry reported by the render target on every scroll or
/// layout event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    /// Number of rows currently on screen.
    pub visible_items: usize,
    /// Total rows in the rendered list.
    pub total_items: usize,
    /// Index of the first row on screen.
    pub first_visible: usize,
}

/// Two-stage latch over scroll observations.
///
/// Armed means "a requested page is outstanding, don't trigger again".
/// The latch releases when the list grows (a page landed) and fires once
/// when the viewport comes within `threshold` rows of the end.
#[derive(Debug)]
pub(crate) struct LoadTrigger {
    armed: bool,
    last_known: usize,
    threshold: usize,
}

impl LoadTrigger {
    /// Starts armed: nothing may trigger before the first page lands.
    pub(crate) fn new(threshold: usize) -> Self {
        Self {
            armed: true,
            last_known: 0,
            threshold,
        }
    }

    /// Feed one scroll observation. Returns `true` when the caller
    /// should request the next page.
    pub(crate) fn observe(&mut self, pos: &ScrollPosition) -> bool {
        if self.armed && pos.total_items > self.last_known {
            // A page just landed. Record the new size and release the
            // latch without triggering.
            self.last_known = pos.total_items;
            self.armed = false;
        }
        if !self.armed
            && pos.total_items.saturating_sub(pos.visible_items)
                <= pos.first_visible + self.threshold
        {
            self.armed = true;
            return true;
        }
        false
    }

    /// Forget everything and suppress triggering until a page lands.
    pub(crate) fn reset(&mut self) {
        self.armed = true;
        self.last_known = 0;
    }
}
