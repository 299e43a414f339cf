use tabview_types::PaginationState;

/// Client-side pagination: recompute totals from the filtered record count
/// and slice out the current page.
pub fn paginate<R: Clone>(records: &[R], state: &mut PaginationState) -> Vec<R> {
    state.recompute_local(records.len() as u64);
    let (start, end) = state.slice_bounds(records.len());
    records[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_slices_current_page() {
        let records: Vec<u32> = (0..25).collect();
        let mut state = PaginationState::with_limit(10).unwrap();
        state.page = 2;

        let page = paginate(&records, &mut state);
        assert_eq!(page, (10..20).collect::<Vec<_>>());
        assert_eq!(state.total, 25);
        assert_eq!(state.total_pages, 3);
    }

    #[test]
    fn test_paginate_empty_set() {
        let records: Vec<u32> = vec![];
        let mut state = PaginationState::default();
        let page = paginate(&records, &mut state);
        assert!(page.is_empty());
        assert_eq!(state.total_pages, 0);
        assert_eq!(state.page, 1);
    }
}
