use tabview_types::{EventKind, FilterCriteria, TableRecord};

use crate::buckets::parse_timestamp;

/// The single criteria-matching predicate, shared by the client-side path
/// and by tests asserting parity with server-filtered responses.
///
/// A record that lacks an attribute fails the corresponding filter whenever
/// that filter is active: an ownerless record does not match an id filter,
/// an undated record does not match a date range.
pub fn matches<R: TableRecord>(record: &R, criteria: &FilterCriteria) -> bool {
    if !criteria.date_range.is_unbounded() {
        let date = record
            .occurred_at()
            .and_then(parse_timestamp)
            .map(|dt| dt.date());
        match date {
            Some(date) if criteria.date_range.contains(date) => {}
            _ => return false,
        }
    }

    if !criteria.selected_ids.is_empty() {
        match record.owner() {
            Some(owner) if criteria.selected_ids.contains(owner) => {}
            _ => return false,
        }
    }

    let needle = criteria.search_text.trim();
    if !needle.is_empty() {
        let haystack = record.search_haystack().to_lowercase();
        if !haystack.contains(&needle.to_lowercase()) {
            return false;
        }
    }

    if let Some(status) = criteria.status {
        if record.status() != Some(status) {
            return false;
        }
    }

    // The full kind set is the no-filter default and must not exclude
    // records that carry no kind at all.
    if criteria.event_types != EventKind::all() {
        match record.kind() {
            Some(kind) if criteria.event_types.contains(&kind) => {}
            _ => return false,
        }
    }

    true
}

/// Apply the predicate over a record set (client-side mode).
pub fn filter_records<R: TableRecord + Clone>(
    records: &[R],
    criteria: &FilterCriteria,
) -> Vec<R> {
    records
        .iter()
        .filter(|r| matches(*r, criteria))
        .cloned()
        .collect()
}
