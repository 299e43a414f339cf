use futures::future::BoxFuture;

use tabview_types::{ListRequest, ListResponse};

/// Black-box boundary to the backing HTTP API (or any record provider).
///
/// The orchestrator never interprets failures beyond "retryable": any
/// error transitions the view to `Errored` while the last good snapshot
/// stays on screen.
pub trait DataSource<R>: Send + Sync {
    fn fetch(&self, request: ListRequest) -> BoxFuture<'_, anyhow::Result<ListResponse<R>>>;
}
