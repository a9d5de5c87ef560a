// ── Pagination controller ──
//
// Single authority over when to fetch, how results are applied, and what
// view state the render target sees. The render target only feeds scroll
// positions and refresh requests in; everything flows back out through
// watch channels as immutable snapshots.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::PagerConfig;
use crate::error::CoreError;
use crate::gateway::PageGateway;
use crate::model::{Cursor, Page, Person};
use crate::store::Roster;
use crate::trigger::{LoadTrigger, ScrollPosition};

/// Message shown when the very first page comes back empty.
pub const EMPTY_DIRECTORY_MESSAGE: &str = "No one is here!";

// ── ViewState ───────────────────────────────────────────────────────

/// The single externally observable state of the directory screen.
///
/// Exactly one is active at a time; transitions are driven only by the
/// pager. The `Success` payload is an immutable snapshot — the render
/// target never mutates pager state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A session-starting or refreshing fetch is in flight.
    Loading,
    /// The last fetch failed, or the directory is empty. The previously
    /// visible list is retained until a refresh actually fires.
    Error(String),
    /// The merged list after the latest accepted page.
    Success(Arc<Vec<Person>>),
}

// ── Pager ───────────────────────────────────────────────────────────

/// The pagination controller.
///
/// Cheaply cloneable via `Arc`. One instance per screen session: created
/// when the screen comes up, [`shutdown`](Pager::shutdown) when it is
/// torn down. Nothing persists across sessions.
#[derive(Clone)]
pub struct Pager {
    inner: Arc<PagerInner>,
}

struct PagerInner {
    gateway: Arc<dyn PageGateway>,
    config: PagerConfig,
    view_state: watch::Sender<ViewState>,
    /// Roster snapshot mirror, rebuilt after every accepted merge.
    roster_watch: watch::Sender<Arc<Vec<Person>>>,
    state: Mutex<PageState>,
    /// Cancelled on shutdown only; retry timers hang off child tokens.
    cancel: CancellationToken,
}

/// Mutable controller state. Every transition happens under the one
/// lock, and the lock is never held across a gateway await.
struct PageState {
    roster: Roster,
    next_cursor: Option<Cursor>,
    /// Overlap guard: set before a fetch is issued, cleared when its
    /// result is applied.
    fetch_in_flight: bool,
    /// Bumped by `start`/`refresh`. A result is applied only if its
    /// originating generation is still current; anything older was
    /// superseded mid-flight and is discarded on arrival.
    generation: u64,
    trigger: LoadTrigger,
    /// Whether any page has ever been merged this generation. Gates the
    /// empty-directory terminal state.
    first_page_merged: bool,
    /// Token for the pending delayed retry, if one is armed.
    retry: Option<CancellationToken>,
}

impl Pager {
    pub fn new(gateway: Arc<dyn PageGateway>, config: PagerConfig) -> Self {
        let (view_state, _) = watch::channel(ViewState::Idle);
        let (roster_watch, _) = watch::channel(Arc::new(Vec::new()));
        let trigger = LoadTrigger::new(config.visible_threshold);

        Self {
            inner: Arc::new(PagerInner {
                gateway,
                config,
                view_state,
                roster_watch,
                state: Mutex::new(PageState {
                    roster: Roster::new(),
                    next_cursor: None,
                    fetch_in_flight: false,
                    generation: 0,
                    trigger,
                    first_page_merged: false,
                    retry: None,
                }),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &PagerConfig {
        &self.inner.config
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Begin the session: show the loading state and fetch the first page.
    pub async fn start(&self) {
        let generation = {
            let mut st = self.inner.state.lock().await;
            st.generation += 1;
            st.fetch_in_flight = true;
            st.generation
        };
        self.inner.view_state.send_replace(ViewState::Loading);
        debug!("starting directory session");
        self.spawn_fetch(generation, None);
    }

    /// Throw everything away and fetch from the beginning.
    ///
    /// Safe to call while a fetch is in flight: bumping the generation
    /// makes the superseded fetch's eventual result a no-op.
    pub async fn refresh(&self) {
        let generation = {
            let mut st = self.inner.state.lock().await;
            if let Some(retry) = st.retry.take() {
                retry.cancel();
            }
            st.generation += 1;
            st.roster.clear();
            st.next_cursor = None;
            st.trigger.reset();
            st.first_page_merged = false;
            st.fetch_in_flight = true;
            st.generation
        };
        self.inner.roster_watch.send_replace(Arc::new(Vec::new()));
        self.inner.view_state.send_replace(ViewState::Loading);
        debug!(generation, "refreshing directory");
        self.spawn_fetch(generation, None);
    }

    /// Tear the session down. Cancels any pending retry timer; in-flight
    /// fetch results are dropped on arrival.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ── Scroll-driven loading ────────────────────────────────────

    /// Feed one scroll/layout observation from the render target.
    pub async fn on_scroll(&self, position: ScrollPosition) {
        let fire = {
            let mut st = self.inner.state.lock().await;
            st.trigger.observe(&position)
        };
        if fire {
            debug!(
                total = position.total_items,
                first = position.first_visible,
                "scroll threshold reached"
            );
            self.load_more().await;
        }
    }

    /// Fetch the next page at the current cursor.
    ///
    /// No-op while a fetch is in flight. Deliberately does NOT transition
    /// to `Loading` — incremental pages keep the current view on screen
    /// until the result lands.
    pub async fn load_more(&self) {
        let issue = {
            let mut st = self.inner.state.lock().await;
            if st.fetch_in_flight {
                debug!("fetch already in flight, ignoring load_more");
                None
            } else {
                st.fetch_in_flight = true;
                Some((st.generation, st.next_cursor.clone()))
            }
        };
        if let Some((generation, cursor)) = issue {
            self.spawn_fetch(generation, cursor);
        }
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to view-state transitions.
    pub fn view_state(&self) -> watch::Receiver<ViewState> {
        self.inner.view_state.subscribe()
    }

    /// The current view state.
    pub fn current_view(&self) -> ViewState {
        self.inner.view_state.borrow().clone()
    }

    /// Subscribe to roster snapshot changes.
    pub fn subscribe_roster(&self) -> watch::Receiver<Arc<Vec<Person>>> {
        self.inner.roster_watch.subscribe()
    }

    /// The current roster snapshot (cheap `Arc` clone).
    pub fn roster_snapshot(&self) -> Arc<Vec<Person>> {
        self.inner.roster_watch.borrow().clone()
    }

    // ── Fetch plumbing ───────────────────────────────────────────

    /// Issue the fetch on a background task, tagged with its generation.
    fn spawn_fetch(&self, generation: u64, cursor: Option<Cursor>) {
        let pager = self.clone();
        let cancel = self.inner.cancel.clone();
        tokio::spawn(async move {
            let result = pager.inner.gateway.fetch_page(cursor).await;
            if cancel.is_cancelled() {
                return;
            }
            pager.apply_result(generation, result).await;
        });
    }

    /// Single completion entry point for every fetch.
    async fn apply_result(&self, generation: u64, result: Result<Page, CoreError>) {
        let mut st = self.inner.state.lock().await;
        if generation != st.generation {
            // A refresh superseded this fetch while it was in flight.
            // The in-flight flag now describes the refresh's own fetch,
            // so it is left alone too.
            debug!(
                stale = generation,
                current = st.generation,
                "discarding superseded page result"
            );
            return;
        }
        st.fetch_in_flight = false;

        match result {
            Err(err) => {
                warn!(error = %err, "page fetch failed, arming delayed refresh");
                self.inner
                    .view_state
                    .send_replace(ViewState::Error(err.to_string()));
                self.arm_retry(&mut st);
            }
            Ok(page) if page.people.is_empty() && !st.first_page_merged => {
                // Content-empty on the very first page: terminal until
                // the user refreshes manually. No retry timer.
                debug!("first page empty, directory has no entries");
                self.inner
                    .view_state
                    .send_replace(ViewState::Error(EMPTY_DIRECTORY_MESSAGE.to_owned()));
            }
            Ok(page) => {
                let accepted = st.roster.merge(page.people);
                st.next_cursor = page.next;
                st.first_page_merged = true;
                let snapshot = st.roster.snapshot();
                debug!(accepted, total = snapshot.len(), "page merged");
                self.inner.roster_watch.send_replace(Arc::clone(&snapshot));
                self.inner.view_state.send_replace(ViewState::Success(snapshot));
            }
        }
    }

    /// Arm the one-shot delayed retry. A manual refresh or shutdown
    /// cancels it before it fires.
    fn arm_retry(&self, st: &mut PageState) {
        let token = self.inner.cancel.child_token();
        if let Some(old) = st.retry.replace(token.clone()) {
            old.cancel();
        }

        let pager = self.clone();
        let delay = self.inner.config.retry_delay;
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    debug!("retry timer elapsed");
                    pager.refresh().await;
                }
            }
        });
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tokio::sync::Semaphore;

    use super::*;

    /// One canned gateway response; `hold` parks the call until the test
    /// releases a permit.
    struct Step {
        response: Result<Page, CoreError>,
        hold: bool,
    }

    impl Step {
        fn ok(page: Page) -> Self {
            Self {
                response: Ok(page),
                hold: false,
            }
        }

        fn err(message: &str) -> Self {
            Self {
                response: Err(CoreError::fetch(message)),
                hold: false,
            }
        }

        fn held(page: Page) -> Self {
            Self {
                response: Ok(page),
                hold: true,
            }
        }
    }

    /// Scripted gateway: pops one step per call, in call order.
    struct ScriptedGateway {
        steps: Mutex<VecDeque<Step>>,
        release: Semaphore,
        calls: std::sync::Mutex<Vec<Option<Cursor>>>,
        completed: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
                release: Semaphore::new(0),
                calls: std::sync::Mutex::new(Vec::new()),
                completed: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> Vec<Option<Cursor>> {
            self.calls.lock().unwrap().clone()
        }

        fn completed(&self) -> usize {
            self.completed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageGateway for ScriptedGateway {
        async fn fetch_page(&self, cursor: Option<Cursor>) -> Result<Page, CoreError> {
            self.calls.lock().unwrap().push(cursor);
            let step = self
                .steps
                .lock()
                .await
                .pop_front()
                .expect("unexpected extra fetch");
            if step.hold {
                let permit = self.release.acquire().await.expect("gateway released");
                permit.forget();
            }
            self.completed.fetch_add(1, Ordering::SeqCst);
            step.response
        }
    }

    fn person(id: u64, name: &str) -> Person {
        Person::new(id, name)
    }

    fn page(ids: &[(u64, &str)], next: Option<&str>) -> Page {
        Page::new(
            ids.iter().map(|(id, name)| person(*id, name)).collect(),
            next.map(Cursor::from),
        )
    }

    fn pager_with(gateway: Arc<ScriptedGateway>) -> Pager {
        Pager::new(gateway, PagerConfig::default())
    }

    async fn wait_for_success(rx: &mut watch::Receiver<ViewState>) -> Arc<Vec<Person>> {
        let state = rx
            .wait_for(|s| matches!(s, ViewState::Success(_)))
            .await
            .unwrap()
            .clone();
        match state {
            ViewState::Success(people) => people,
            _ => unreachable!(),
        }
    }

    async fn wait_for_error(rx: &mut watch::Receiver<ViewState>) -> String {
        let state = rx
            .wait_for(|s| matches!(s, ViewState::Error(_)))
            .await
            .unwrap()
            .clone();
        match state {
            ViewState::Error(message) => message,
            _ => unreachable!(),
        }
    }

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    fn names(people: &[Person]) -> Vec<&str> {
        people.iter().map(|p| p.display_name.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn start_merges_first_page_and_keeps_cursor() {
        let gateway = ScriptedGateway::new(vec![
            Step::ok(page(&[(1, "A"), (2, "B")], Some("p2"))),
            Step::ok(page(&[(3, "C")], None)),
        ]);
        let pager = pager_with(Arc::clone(&gateway));
        let mut rx = pager.view_state();

        pager.start().await;
        assert_eq!(*rx.borrow(), ViewState::Loading);

        let people = wait_for_success(&mut rx).await;
        assert_eq!(names(&people), vec!["A", "B"]);

        // The stored cursor is handed to the next incremental fetch.
        pager.load_more().await;
        settle().await;
        assert_eq!(gateway.calls(), vec![None, Some(Cursor::from("p2"))]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_first_page_is_terminal_without_retry() {
        let gateway = ScriptedGateway::new(vec![Step::ok(page(&[], None))]);
        let pager = pager_with(Arc::clone(&gateway));
        let mut rx = pager.view_state();

        pager.start().await;
        let message = wait_for_error(&mut rx).await;
        assert_eq!(message, EMPTY_DIRECTORY_MESSAGE);

        // Well past the retry delay: no timer was armed, nothing refetches.
        tokio::time::sleep(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(gateway.calls().len(), 1);
        assert_eq!(pager.current_view(), ViewState::Error(EMPTY_DIRECTORY_MESSAGE.into()));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_retries_with_full_refresh_after_delay() {
        let gateway = ScriptedGateway::new(vec![
            Step::ok(page(&[(1, "Ada"), (2, "Brin")], Some("p2"))),
            Step::err("timeout"),
            Step::ok(page(&[(3, "Cleo")], None)),
        ]);
        let pager = pager_with(Arc::clone(&gateway));
        let mut rx = pager.view_state();

        pager.start().await;
        wait_for_success(&mut rx).await;

        // Incremental load fails; the list stays put under the error.
        pager.load_more().await;
        let message = wait_for_error(&mut rx).await;
        assert_eq!(message, "timeout");
        assert_eq!(pager.roster_snapshot().len(), 2);

        // The delayed refresh clears the list and refetches from scratch.
        let people = wait_for_success(&mut rx).await;
        assert_eq!(names(&people), vec!["Cleo"]);
        assert_eq!(
            gateway.calls(),
            vec![None, Some(Cursor::from("p2")), None]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn manual_refresh_cancels_pending_retry() {
        let gateway = ScriptedGateway::new(vec![
            Step::err("connection reset"),
            Step::ok(page(&[(1, "Ada")], None)),
        ]);
        let pager = pager_with(Arc::clone(&gateway));
        let mut rx = pager.view_state();

        pager.start().await;
        wait_for_error(&mut rx).await;

        pager.refresh().await;
        wait_for_success(&mut rx).await;

        // The cancelled timer never fires a third fetch.
        tokio::time::sleep(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn near_end_scroll_loads_exactly_one_page() {
        let gateway = ScriptedGateway::new(vec![
            Step::ok(page(&[(1, "A"), (2, "B"), (3, "C")], Some("p2"))),
            Step::held(page(&[(4, "D")], None)),
        ]);
        let pager = pager_with(Arc::clone(&gateway));
        let mut rx = pager.view_state();

        pager.start().await;
        wait_for_success(&mut rx).await;

        let near_end = ScrollPosition {
            visible_items: 2,
            total_items: 3,
            first_visible: 1,
        };
        pager.on_scroll(near_end).await;
        settle().await;
        assert_eq!(gateway.calls().len(), 2);

        // Identical observations while the fetch is in flight: the latch
        // is armed and the in-flight guard holds. Nothing new is issued.
        pager.on_scroll(near_end).await;
        pager.on_scroll(near_end).await;
        settle().await;
        assert_eq!(gateway.calls().len(), 2);

        gateway.release.add_permits(1);
        let people = wait_for_success(&mut rx).await;
        assert_eq!(names(&people), vec!["A", "B", "C", "D"]);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_discards_stale_in_flight_page() {
        let gateway = ScriptedGateway::new(vec![
            Step::ok(page(&[(1, "A"), (2, "B")], Some("p2"))),
            Step::held(page(&[(3, "C"), (4, "D")], Some("p3"))),
            Step::ok(page(&[(9, "Zed")], None)),
        ]);
        let pager = pager_with(Arc::clone(&gateway));
        let mut rx = pager.view_state();

        pager.start().await;
        wait_for_success(&mut rx).await;

        // Kick off an incremental fetch and park it in the gateway.
        pager.load_more().await;
        settle().await;
        assert_eq!(gateway.calls().len(), 2);

        // Refresh supersedes it; the fresh first page lands immediately.
        pager.refresh().await;
        let people = wait_for_success(&mut rx).await;
        assert_eq!(names(&people), vec!["Zed"]);

        // Release the parked fetch: its result belongs to a dead
        // generation and must not corrupt the refreshed roster.
        gateway.release.add_permits(1);
        settle().await;
        assert_eq!(gateway.completed(), 3);
        assert_eq!(names(&pager.roster_snapshot()), vec!["Zed"]);
        assert_eq!(pager.current_view(), ViewState::Success(pager.roster_snapshot()));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_subsequent_page_still_updates_cursor() {
        let gateway = ScriptedGateway::new(vec![
            Step::ok(page(&[(1, "A")], Some("p2"))),
            Step::ok(page(&[], Some("p3"))),
            Step::ok(page(&[(2, "B")], None)),
        ]);
        let pager = pager_with(Arc::clone(&gateway));
        let mut rx = pager.view_state();

        pager.start().await;
        wait_for_success(&mut rx).await;

        // Nothing new this round -- not an error, and the cursor advances.
        pager.load_more().await;
        settle().await;
        assert!(matches!(pager.current_view(), ViewState::Success(_)));
        assert_eq!(pager.roster_snapshot().len(), 1);

        pager.load_more().await;
        settle().await;
        assert_eq!(
            gateway.calls(),
            vec![None, Some(Cursor::from("p2")), Some(Cursor::from("p3"))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_ids_across_pages_are_dropped() {
        let gateway = ScriptedGateway::new(vec![
            Step::ok(page(&[(1, "A")], Some("p2"))),
            Step::ok(page(&[(1, "A"), (3, "C")], None)),
        ]);
        let pager = pager_with(Arc::clone(&gateway));
        let mut rx = pager.view_state();

        pager.start().await;
        wait_for_success(&mut rx).await;

        pager.load_more().await;
        settle().await;

        let snapshot = pager.roster_snapshot();
        assert_eq!(names(&snapshot), vec!["A", "C"]);
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_before_first_page_never_fetches() {
        let gateway = ScriptedGateway::new(vec![Step::ok(page(&[(1, "A")], None))]);
        let pager = pager_with(Arc::clone(&gateway));

        pager
            .on_scroll(ScrollPosition {
                visible_items: 0,
                total_items: 0,
                first_visible: 0,
            })
            .await;
        settle().await;

        assert!(gateway.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_retry() {
        let gateway = ScriptedGateway::new(vec![Step::err("boom")]);
        let pager = pager_with(Arc::clone(&gateway));
        let mut rx = pager.view_state();

        pager.start().await;
        wait_for_error(&mut rx).await;

        pager.shutdown();
        tokio::time::sleep(Duration::from_secs(10)).await;
        settle().await;

        // The armed retry died with the session.
        assert_eq!(gateway.calls().len(), 1);
    }
}
