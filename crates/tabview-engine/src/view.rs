use chrono::NaiveDateTime;

use tabview_types::{FilterCriteria, PaginationState, TableRecord};

use crate::buckets::{bucket_records, BucketConfig, Bucketed};
use crate::filter::filter_records;
use crate::paging::paginate;

/// What a renderer consumes for a flat table screen: the rows of the
/// current page plus the pagination to draw. Column layout is the
/// renderer's business.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<R> {
    pub rows: Vec<R>,
    pub pagination: PaginationState,
    pub is_filtered: bool,
}

/// View-model for date-grouped screens (task boards, schedules).
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedView<R> {
    pub bucketed: Bucketed<R>,
    pub is_filtered: bool,
}

/// Client-side assembly: filter, then page, over an in-memory record set.
/// Server mode builds the same view from response data instead.
pub fn build_view<R: TableRecord + Clone>(
    records: &[R],
    criteria: &FilterCriteria,
    mut pagination: PaginationState,
) -> TableView<R> {
    let kept = filter_records(records, criteria);
    let rows = paginate(&kept, &mut pagination);
    TableView {
        rows,
        pagination,
        is_filtered: criteria.is_active(),
    }
}

/// Filter then classify into date buckets against a single `now`.
pub fn build_bucketed_view<R: TableRecord + Clone>(
    records: &[R],
    criteria: &FilterCriteria,
    config: &BucketConfig,
    now: NaiveDateTime,
) -> BucketedView<R> {
    let kept = filter_records(records, criteria);
    BucketedView {
        bucketed: bucket_records(&kept, config, now),
        is_filtered: criteria.is_active(),
    }
}
