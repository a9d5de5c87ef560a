//! Application core — event loop, view-state consumption, scroll wiring.
//!
//! The app is the render target for the pager: it reads immutable
//! snapshots, surfaces scroll positions and the refresh trigger, and
//! never mutates pager state directly.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use throbber_widgets_tui::ThrobberState;
use tracing::debug;

use roster_core::{Pager, Person, ScrollPosition, ViewState};

use crate::event::{Event, EventReader};
use crate::tui::Tui;
use crate::ui;

/// Tick interval for throbber animation and scroll observation (4 Hz).
const TICK_RATE: Duration = Duration::from_millis(250);
/// Render interval (~30 FPS).
const RENDER_RATE: Duration = Duration::from_millis(33);

/// Top-level application state and event loop.
pub struct App {
    pager: Pager,
    /// Latest view state, rendered as-is.
    pub(crate) view: ViewState,
    /// Latest roster snapshot. Retained under `Error` so the previous
    /// list stays on screen until a refresh actually fires.
    pub(crate) people: Arc<Vec<Person>>,
    pub(crate) list_state: ListState,
    pub(crate) throbber: ThrobberState,
    /// Rows of the list viewport from the last render.
    pub(crate) list_rows: u16,
    running: bool,
}

impl App {
    pub fn new(pager: Pager) -> Self {
        // Adopt whatever state the pager is already in -- start() may
        // have fired before the event loop subscribes.
        let view = pager.current_view();
        let people = pager.roster_snapshot();
        Self {
            pager,
            view,
            people,
            list_state: ListState::default(),
            throbber: ThrobberState::default(),
            list_rows: 0,
            running: true,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut events = EventReader::new(TICK_RATE, RENDER_RATE);
        let mut view_rx = self.pager.view_state();
        let mut roster_rx = self.pager.subscribe_roster();

        while self.running {
            tokio::select! {
                maybe = events.next() => {
                    let Some(event) = maybe else { break };
                    match event {
                        Event::Key(key) => self.handle_key(key).await,
                        Event::Resize(_, _) => {}
                        Event::Tick => {
                            self.throbber.calc_next();
                            self.observe_scroll().await;
                        }
                        Event::Render => {
                            tui.draw(|frame| ui::render(frame, self))?;
                        }
                    }
                }
                Ok(()) = view_rx.changed() => {
                    self.view = view_rx.borrow_and_update().clone();
                }
                Ok(()) = roster_rx.changed() => {
                    let snapshot = roster_rx.borrow_and_update().clone();
                    self.apply_roster(snapshot);
                }
            }
        }

        events.shutdown();
        Ok(())
    }

    // ── Input handling ───────────────────────────────────────────

    async fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('r') => {
                debug!("manual refresh requested");
                self.pager.refresh().await;
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(self.page_jump()),
            KeyCode::PageUp => self.move_selection(-self.page_jump()),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => {
                self.select(self.people.len().saturating_sub(1));
            }
            _ => {}
        }
    }

    fn select(&mut self, idx: usize) {
        if self.people.is_empty() {
            self.list_state.select(None);
            return;
        }
        self.list_state.select(Some(idx.min(self.people.len() - 1)));
    }

    /// One viewport worth of rows, as a selection delta.
    fn page_jump(&self) -> isize {
        isize::try_from(self.list_rows).unwrap_or(isize::MAX).max(1)
    }

    fn move_selection(&mut self, delta: isize) {
        if self.people.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(self.people.len() - 1);
        self.list_state.select(Some(next));
    }

    // ── Pager wiring ─────────────────────────────────────────────

    /// Adopt a new roster snapshot, clamping the selection into range.
    fn apply_roster(&mut self, snapshot: Arc<Vec<Person>>) {
        self.people = snapshot;
        if self.people.is_empty() {
            self.list_state.select(None);
            *self.list_state.offset_mut() = 0;
        } else {
            let idx = self
                .list_state
                .selected()
                .unwrap_or(0)
                .min(self.people.len() - 1);
            self.list_state.select(Some(idx));
        }
    }

    /// Report the current list viewport to the pager.
    async fn observe_scroll(&mut self) {
        let position = scroll_position(
            self.list_state.offset(),
            usize::from(self.list_rows),
            self.people.len(),
        );
        self.pager.on_scroll(position).await;
    }
}

/// Derive the pager's scroll geometry from the list widget's viewport.
fn scroll_position(offset: usize, viewport_rows: usize, total: usize) -> ScrollPosition {
    ScrollPosition {
        visible_items: viewport_rows.min(total.saturating_sub(offset)),
        total_items: total,
        first_visible: offset,
    }
}
