use std::collections::BTreeMap;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::Stream;
use serde_json::Value;
use tokio::sync::mpsc;

use tabview_types::{FilterCriteria, PaginationState};

/// The last good render state of a view: current-page rows, pagination,
/// the criteria that produced them, and any aggregate fields the response
/// carried alongside the data.
#[derive(Debug, Clone)]
pub struct ViewSnapshot<R> {
    pub rows: Vec<R>,
    pub pagination: PaginationState,
    pub criteria: FilterCriteria,
    pub is_filtered: bool,
    pub aggregates: BTreeMap<String, Value>,
}

/// State-change notifications delivered to subscribers.
#[derive(Debug, Clone)]
pub enum ViewEvent<R> {
    /// A request was issued; previous data stays on screen meanwhile.
    Loading,
    Ready(ViewSnapshot<R>),
    /// The request failed. Retryable; the last snapshot is retained.
    Failed { message: String },
}

/// Subscription handle. Dropping it unsubscribes; the orchestrator prunes
/// closed channels on the next emit.
pub struct ViewEvents<R> {
    pub(crate) receiver: mpsc::UnboundedReceiver<ViewEvent<R>>,
}

impl<R> ViewEvents<R> {
    /// Poll for the next event without waiting.
    pub fn try_next(&mut self) -> Option<ViewEvent<R>> {
        self.receiver.try_recv().ok()
    }
}

impl<R> Stream for ViewEvents<R> {
    type Item = ViewEvent<R>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
