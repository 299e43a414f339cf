//! In-memory `DataSource` implementations.
//!
//! `StaticSource` answers every request from a fixed record set;
//! `ScriptedSource` replays a queue of canned responses, optionally gated
//! on a oneshot so tests control which in-flight request resolves first.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::anyhow;
use futures::future::BoxFuture;
use tokio::sync::oneshot;

use tabview_runtime::DataSource;
use tabview_types::{ListRequest, ListResponse, PaginationState};

/// Serves a fixed record set, slicing by the requested page/limit the way
/// a paginating backend would.
pub struct StaticSource<R> {
    records: Vec<R>,
    paginate: bool,
    requests: Mutex<Vec<ListRequest>>,
}

impl<R: Clone> StaticSource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            paginate: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Return everything on every request, with no pagination block —
    /// the shape a client-mode base fetch expects.
    pub fn unpaginated(records: Vec<R>) -> Self {
        Self {
            records,
            paginate: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl<R> DataSource<R> for StaticSource<R>
where
    R: Clone + Send + Sync,
{
    fn fetch(&self, request: ListRequest) -> BoxFuture<'_, anyhow::Result<ListResponse<R>>> {
        self.requests.lock().unwrap().push(request.clone());

        let response = if self.paginate {
            let mut pagination = PaginationState {
                page: request.page.unwrap_or(1),
                limit: request.limit.unwrap_or(25),
                ..PaginationState::default()
            };
            pagination.total = self.records.len() as u64;
            pagination.total_pages =
                (self.records.len() as u64).div_ceil(u64::from(pagination.limit)) as u32;

            let (start, end) = pagination.slice_bounds(self.records.len());
            let mut response = ListResponse::new(self.records[start..end].to_vec());
            response.pagination = Some(pagination);
            response
        } else {
            ListResponse::new(self.records.clone())
        };

        Box::pin(async move { Ok(response) })
    }
}

struct ScriptedResponse<R> {
    result: anyhow::Result<ListResponse<R>>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Replays queued responses in order. A gated response does not resolve
/// until the test fires its oneshot, which is how stale-request scenarios
/// are made deterministic.
pub struct ScriptedSource<R> {
    queue: Mutex<VecDeque<ScriptedResponse<R>>>,
    requests: Mutex<Vec<ListRequest>>,
}

impl<R> Default for ScriptedSource<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ScriptedSource<R> {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_ok(&self, response: ListResponse<R>) {
        self.queue.lock().unwrap().push_back(ScriptedResponse {
            result: Ok(response),
            gate: None,
        });
    }

    pub fn push_err(&self, message: &str) {
        self.queue.lock().unwrap().push_back(ScriptedResponse {
            result: Err(anyhow!("{}", message)),
            gate: None,
        });
    }

    /// Queue a response held behind a gate; the returned sender releases it.
    pub fn push_gated(&self, response: ListResponse<R>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.queue.lock().unwrap().push_back(ScriptedResponse {
            result: Ok(response),
            gate: Some(rx),
        });
        tx
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl<R> DataSource<R> for ScriptedSource<R>
where
    R: Send + Sync,
{
    fn fetch(&self, request: ListRequest) -> BoxFuture<'_, anyhow::Result<ListResponse<R>>> {
        self.requests.lock().unwrap().push(request);

        let next = self.queue.lock().unwrap().pop_front();
        Box::pin(async move {
            match next {
                Some(scripted) => {
                    if let Some(gate) = scripted.gate {
                        let _ = gate.await;
                    }
                    scripted.result
                }
                None => Err(anyhow!("scripted source exhausted")),
            }
        })
    }
}
