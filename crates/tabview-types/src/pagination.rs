use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pagination state for one view instance.
///
/// Invariants: `page >= 1`, `limit > 0`, `page <= max(total_pages, 1)`.
/// In server-paginated mode the state is replaced wholesale from the
/// response; `total_pages` is only computed locally in client-side mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 25,
            total: 0,
            total_pages: 0,
        }
    }
}

impl PaginationState {
    pub fn with_limit(limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(Error::Validation("page limit must be positive".into()));
        }
        Ok(Self {
            limit,
            ..Self::default()
        })
    }

    /// True iff `n` is a reachable page. Out-of-range navigation is a
    /// silent no-op at the orchestrator level.
    pub fn can_go_to(&self, n: u32) -> bool {
        n >= 1 && n <= self.total_pages
    }

    /// Criteria or limit changes always land back on the first page.
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Replace state wholesale from a server response. A malformed
    /// response cannot break the invariants: `page: 0` clamps to 1 and
    /// `limit: 0` keeps the current limit.
    pub fn set_from_server(&mut self, server: PaginationState) {
        let mut next = server;
        if next.limit == 0 {
            next.limit = self.limit;
        }
        if next.page == 0 {
            next.page = 1;
        }
        *self = next;
    }

    /// Recompute totals for client-side pagination: `ceil(total / limit)`,
    /// clamping the current page back into range.
    pub fn recompute_local(&mut self, total: u64) {
        self.total = total;
        self.total_pages = total.div_ceil(u64::from(self.limit)) as u32;
        self.page = self.page.min(self.total_pages.max(1));
    }

    /// Zero-based slice bounds for the current page.
    pub fn slice_bounds(&self, len: usize) -> (usize, usize) {
        let start = (self.page as usize - 1) * self.limit as usize;
        let end = (start + self.limit as usize).min(len);
        (start.min(len), end)
    }
}
