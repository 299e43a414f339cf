use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use tabview_engine::{build_bucketed_view, build_view, BucketConfig, BucketedView};
use tabview_types::{
    CriteriaPatch, FilterCriteria, ListRequest, ListResponse, PaginationState, TableRecord,
};

use crate::config::{FetchMode, ViewConfig};
use crate::debounce::SearchDebouncer;
use crate::error::{Error, Result};
use crate::events::{ViewEvent, ViewEvents, ViewSnapshot};
use crate::source::DataSource;

/// View lifecycle. `Errored` keeps the last good snapshot on screen and
/// moves back to `Loading` on retry; only a full `clear` returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Idle,
    Loading,
    Ready,
    Errored,
}

struct ViewState<R> {
    phase: ViewPhase,
    criteria: FilterCriteria,
    pagination: PaginationState,
    /// Monotonic request tag. A resolution older than the latest issued
    /// request is discarded without touching state (last request wins).
    generation: u64,
    last_good: Option<ViewSnapshot<R>>,
    last_error: Option<String>,
    /// Client-mode record cache, fetched once on first load.
    base: Option<Vec<R>>,
    subscribers: Vec<mpsc::UnboundedSender<ViewEvent<R>>>,
}

struct ViewCore<R> {
    view_id: Uuid,
    mode: FetchMode,
    source: Arc<dyn DataSource<R>>,
    state: Mutex<ViewState<R>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<R> ViewCore<R>
where
    R: TableRecord + Clone + Send + Sync + 'static,
{
    fn emit(state: &mut ViewState<R>, event: ViewEvent<R>) {
        state.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);
    }

    /// Issue a request for the current criteria/pagination. Client mode
    /// with a warm cache resolves synchronously; everything else spawns a
    /// fetch tagged with the new generation.
    fn start_fetch(core: &Arc<Self>) {
        let (generation, request) = {
            let mut state = core.state.lock().unwrap();
            state.generation += 1;
            state.phase = ViewPhase::Loading;
            Self::emit(&mut state, ViewEvent::Loading);

            if core.mode == FetchMode::Client && state.base.is_some() {
                Self::commit_client(&mut state);
                return;
            }

            let request = match core.mode {
                FetchMode::Server => {
                    ListRequest::from_criteria(&state.criteria, &state.pagination)
                }
                // The base set is fetched whole, unfiltered; criteria apply
                // in memory from then on.
                FetchMode::Client => ListRequest::default(),
            };
            (state.generation, request)
        };

        let task_core = Arc::clone(core);
        let handle = tokio::spawn(async move {
            let result = task_core.source.fetch(request).await;

            let mut state = task_core.state.lock().unwrap();
            if state.generation != generation {
                debug!(
                    view = %task_core.view_id,
                    stale = generation,
                    current = state.generation,
                    "discarding stale response"
                );
                return;
            }

            match result {
                Ok(response) => match task_core.mode {
                    FetchMode::Server => Self::commit_server(&mut state, response),
                    FetchMode::Client => {
                        state.base = Some(response.data);
                        Self::commit_client(&mut state);
                    }
                },
                Err(err) => {
                    warn!(view = %task_core.view_id, error = %err, "fetch failed");
                    state.phase = ViewPhase::Errored;
                    state.last_error = Some(err.to_string());
                    Self::emit(
                        &mut state,
                        ViewEvent::Failed {
                            message: err.to_string(),
                        },
                    );
                }
            }
        });
        core.track(handle);
    }

    fn commit_server(state: &mut ViewState<R>, response: ListResponse<R>) {
        match response.pagination {
            Some(server) => state.pagination.set_from_server(server),
            // A source that does not paginate returns everything at once.
            None => state.pagination.recompute_local(response.data.len() as u64),
        }

        let snapshot = ViewSnapshot {
            rows: response.data,
            pagination: state.pagination,
            criteria: state.criteria.clone(),
            is_filtered: state.criteria.is_active(),
            aggregates: response.aggregates,
        };
        Self::commit_ready(state, snapshot);
    }

    fn commit_client(state: &mut ViewState<R>) {
        let base = state.base.as_deref().unwrap_or(&[]);
        let view = build_view(base, &state.criteria, state.pagination);
        state.pagination = view.pagination;

        let snapshot = ViewSnapshot {
            rows: view.rows,
            pagination: view.pagination,
            criteria: state.criteria.clone(),
            is_filtered: view.is_filtered,
            aggregates: BTreeMap::new(),
        };
        Self::commit_ready(state, snapshot);
    }

    fn commit_ready(state: &mut ViewState<R>, snapshot: ViewSnapshot<R>) {
        state.phase = ViewPhase::Ready;
        state.last_error = None;
        state.last_good = Some(snapshot.clone());
        Self::emit(state, ViewEvent::Ready(snapshot));
    }

    /// Committed search value arrived from the debouncer.
    fn apply_search(core: &Arc<Self>, committed: String) {
        {
            let mut state = core.state.lock().unwrap();
            if state.criteria.search_text == committed {
                return;
            }
            match state.criteria.apply(CriteriaPatch::search(committed)) {
                Ok(next) => state.criteria = next,
                Err(_) => return,
            }
            state.pagination.reset_page();
        }
        Self::start_fetch(core);
    }
}

/// One per screen. Owns the criteria, pagination, debounce, and request
/// ordering for that screen; nothing is shared across view instances.
///
/// Must be constructed inside a Tokio runtime: fetches and the search
/// quiet-period run as spawned tasks. Dropping the orchestrator aborts
/// in-flight work; no state mutates after teardown.
pub struct TableOrchestrator<R> {
    core: Arc<ViewCore<R>>,
    debouncer: Mutex<SearchDebouncer>,
    bucket_config: BucketConfig,
}

impl<R> TableOrchestrator<R>
where
    R: TableRecord + Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<dyn DataSource<R>>, config: ViewConfig) -> Result<Self> {
        config.validate()?;
        let pagination = PaginationState::with_limit(config.page_limit)?;
        let bucket_config = config.bucket_config()?;

        let core = Arc::new(ViewCore {
            view_id: Uuid::new_v4(),
            mode: config.mode,
            source,
            state: Mutex::new(ViewState {
                phase: ViewPhase::Idle,
                criteria: FilterCriteria::default(),
                pagination,
                generation: 0,
                last_good: None,
                last_error: None,
                base: None,
                subscribers: Vec::new(),
            }),
            tasks: Mutex::new(Vec::new()),
        });

        let (debouncer, mut committed_rx) = SearchDebouncer::new(config.debounce());
        let listener_core = Arc::clone(&core);
        let listener = tokio::spawn(async move {
            while let Some(committed) = committed_rx.recv().await {
                ViewCore::apply_search(&listener_core, committed);
            }
        });
        core.tasks.lock().unwrap().push(listener);

        Ok(Self {
            core,
            debouncer: Mutex::new(debouncer),
            bucket_config,
        })
    }

    /// Initial load with the current (default) criteria.
    pub fn load(&self) {
        ViewCore::start_fetch(&self.core);
    }

    /// Merge a criteria patch, reset to page 1, and re-request. Validation
    /// failures are returned synchronously and issue no request.
    pub fn apply_filters(&self, patch: CriteriaPatch) -> Result<()> {
        {
            let mut state = self.core.state.lock().unwrap();
            let next = state.criteria.apply(patch)?;
            state.criteria = next;
            state.pagination.reset_page();
        }
        ViewCore::start_fetch(&self.core);
        Ok(())
    }

    /// Restore default criteria and page 1, then re-request.
    pub fn reset_filters(&self) {
        {
            let mut state = self.core.state.lock().unwrap();
            let limit = state.pagination.limit;
            state.criteria = FilterCriteria::default();
            state.pagination = PaginationState {
                limit,
                ..PaginationState::default()
            };
        }
        ViewCore::start_fetch(&self.core);
    }

    /// Full reset back to `Idle`: cancels in-flight work and forgets all
    /// data. Used on view teardown paths that keep the instance around.
    pub fn clear(&self) {
        let mut state = self.core.state.lock().unwrap();
        state.generation += 1;
        let limit = state.pagination.limit;
        state.criteria = FilterCriteria::default();
        state.pagination = PaginationState {
            limit,
            ..PaginationState::default()
        };
        state.last_good = None;
        state.last_error = None;
        state.base = None;
        state.phase = ViewPhase::Idle;
    }

    /// Re-issue the last request. Only valid from `Errored`.
    pub fn retry(&self) -> Result<()> {
        {
            let state = self.core.state.lock().unwrap();
            if state.phase != ViewPhase::Errored {
                return Err(Error::InvalidOperation(format!(
                    "retry is only valid from Errored, not {:?}",
                    state.phase
                )));
            }
        }
        ViewCore::start_fetch(&self.core);
        Ok(())
    }

    /// Navigate to page `n` with unchanged criteria. Out-of-range values
    /// and the current page are silent no-ops.
    pub fn go_to_page(&self, n: u32) {
        {
            let mut state = self.core.state.lock().unwrap();
            if !state.pagination.can_go_to(n) || state.pagination.page == n {
                return;
            }
            state.pagination.page = n;
        }
        ViewCore::start_fetch(&self.core);
    }

    /// Change the page size. Like any filter change this lands back on
    /// page 1 and re-requests.
    pub fn set_limit(&self, limit: u32) -> Result<()> {
        {
            let mut state = self.core.state.lock().unwrap();
            let validated = PaginationState::with_limit(limit)?;
            state.pagination.limit = validated.limit;
            state.pagination.reset_page();
        }
        ViewCore::start_fetch(&self.core);
        Ok(())
    }

    /// Record a search keystroke. The filter only updates after the quiet
    /// period, via the debouncer.
    pub fn search_input(&self, text: &str) {
        self.debouncer.lock().unwrap().input(text);
    }

    /// The uncommitted search input as typed so far.
    pub fn raw_search(&self) -> String {
        self.debouncer.lock().unwrap().raw().to_string()
    }

    pub fn subscribe(&self) -> ViewEvents<R> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.core.state.lock().unwrap().subscribers.push(tx);
        ViewEvents { receiver: rx }
    }

    pub fn phase(&self) -> ViewPhase {
        self.core.state.lock().unwrap().phase
    }

    /// Last good render state, retained across failed refreshes.
    pub fn snapshot(&self) -> Option<ViewSnapshot<R>> {
        self.core.state.lock().unwrap().last_good.clone()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.core.state.lock().unwrap().criteria.clone()
    }

    pub fn pagination(&self) -> PaginationState {
        self.core.state.lock().unwrap().pagination
    }

    /// The fetch failure that put the view into `Errored`, if any.
    /// Cleared by the next successful commit.
    pub fn last_error(&self) -> Option<Error> {
        self.core
            .state
            .lock()
            .unwrap()
            .last_error
            .clone()
            .map(Error::Fetch)
    }

    /// Date-bucketed view of the current data, measured against a single
    /// "now". Client mode buckets the whole filtered cache; server mode
    /// buckets the rows of the last response.
    pub fn bucketed(&self) -> Option<BucketedView<R>> {
        let state = self.core.state.lock().unwrap();
        let now = Utc::now().naive_utc();

        match self.core.mode {
            FetchMode::Client => state
                .base
                .as_deref()
                .map(|base| build_bucketed_view(base, &state.criteria, &self.bucket_config, now)),
            FetchMode::Server => state.last_good.as_ref().map(|snapshot| {
                build_bucketed_view(&snapshot.rows, &state.criteria, &self.bucket_config, now)
            }),
        }
    }
}

impl<R> Drop for TableOrchestrator<R> {
    fn drop(&mut self) {
        // Invalidate any in-flight generation first, then stop the tasks:
        // even a commit racing the abort will fail the generation check.
        if let Ok(mut state) = self.core.state.lock() {
            state.generation += 1;
            state.subscribers.clear();
        }
        if let Ok(mut tasks) = self.core.tasks.lock() {
            for handle in tasks.drain(..) {
                handle.abort();
            }
        }
    }
}
