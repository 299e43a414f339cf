use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::selection::{GroupId, UserId};

/// Call outcome as reported by the telephony backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    Answered,
    NoAnswer,
    Busy,
    Failed,
}

/// Kind of a scheduled event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Call,
    Meeting,
    Task,
    Reminder,
}

impl EventKind {
    /// The full closed set. Also the default filter value: an event-type
    /// filter is never allowed to become empty.
    pub fn all() -> BTreeSet<EventKind> {
        BTreeSet::from([
            EventKind::Call,
            EventKind::Meeting,
            EventKind::Task,
            EventKind::Reminder,
        ])
    }
}

/// Inclusive date bounds; `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// An inverted range is rejected, never silently swapped.
    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && to < from
        {
            return Err(Error::Validation(format!(
                "date range end {} precedes start {}",
                to, from
            )));
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(from) = self.from
            && date < from
        {
            return false;
        }
        if let Some(to) = self.to
            && date > to
        {
            return false;
        }
        true
    }
}

/// Three-state field update: distinguishes "not provided" from "cleared".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Clear,
    Set(T),
}

// Manual impl: the derive would demand `T: Default` even though the
// default variant carries no `T`.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

/// Partial criteria update consumed by `FilterCriteria::apply`.
/// Every field defaults to `Keep`.
#[derive(Debug, Clone, Default)]
pub struct CriteriaPatch {
    pub date_from: Patch<NaiveDate>,
    pub date_to: Patch<NaiveDate>,
    pub selected_ids: Patch<BTreeSet<UserId>>,
    pub selected_groups: Patch<BTreeSet<GroupId>>,
    pub search_text: Patch<String>,
    pub status: Patch<CallStatus>,
    pub event_types: Patch<BTreeSet<EventKind>>,
}

impl CriteriaPatch {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: Patch::Set(text.into()),
            ..Self::default()
        }
    }
}

/// The full filter set owned by one view instance.
///
/// `selected_ids` holds leaf ids only: group selection is expanded into
/// member ids eagerly at selection time, and the `UserId`/`GroupId` split
/// keeps group ids out of the leaf set by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub selected_ids: BTreeSet<UserId>,
    pub selected_groups: BTreeSet<GroupId>,
    pub search_text: String,
    pub status: Option<CallStatus>,
    pub event_types: BTreeSet<EventKind>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            date_range: DateRange::default(),
            selected_ids: BTreeSet::new(),
            selected_groups: BTreeSet::new(),
            search_text: String::new(),
            status: None,
            event_types: EventKind::all(),
        }
    }
}

impl FilterCriteria {
    /// Merge a partial update into a copy of these criteria.
    ///
    /// Omitted fields keep their prior value; `Clear` restores the field
    /// default. Search text is trimmed, and an event-type set that would
    /// end up empty resets to the full set instead.
    pub fn apply(&self, patch: CriteriaPatch) -> Result<FilterCriteria> {
        let mut next = self.clone();

        match patch.date_from {
            Patch::Keep => {}
            Patch::Clear => next.date_range.from = None,
            Patch::Set(d) => next.date_range.from = Some(d),
        }
        match patch.date_to {
            Patch::Keep => {}
            Patch::Clear => next.date_range.to = None,
            Patch::Set(d) => next.date_range.to = Some(d),
        }
        match patch.selected_ids {
            Patch::Keep => {}
            Patch::Clear => next.selected_ids.clear(),
            Patch::Set(ids) => next.selected_ids = ids,
        }
        match patch.selected_groups {
            Patch::Keep => {}
            Patch::Clear => next.selected_groups.clear(),
            Patch::Set(groups) => next.selected_groups = groups,
        }
        match patch.search_text {
            Patch::Keep => {}
            Patch::Clear => next.search_text.clear(),
            Patch::Set(text) => next.search_text = text.trim().to_string(),
        }
        match patch.status {
            Patch::Keep => {}
            Patch::Clear => next.status = None,
            Patch::Set(s) => next.status = Some(s),
        }
        match patch.event_types {
            Patch::Keep => {}
            Patch::Clear => next.event_types = EventKind::all(),
            Patch::Set(kinds) => {
                next.event_types = if kinds.is_empty() {
                    EventKind::all()
                } else {
                    kinds
                };
            }
        }

        next.date_range.validate()?;
        Ok(next)
    }

    /// True iff any field deviates from the default criteria. Drives the
    /// "filters active" affordance only; no side effects.
    pub fn is_active(&self) -> bool {
        *self != FilterCriteria::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_criteria_is_not_active() {
        assert!(!FilterCriteria::default().is_active());
    }

    #[test]
    fn test_apply_keeps_omitted_fields() {
        let base = FilterCriteria::default()
            .apply(CriteriaPatch::search("hello"))
            .unwrap();

        let next = base
            .apply(CriteriaPatch {
                status: Patch::Set(CallStatus::Answered),
                ..CriteriaPatch::default()
            })
            .unwrap();

        assert_eq!(next.search_text, "hello");
        assert_eq!(next.status, Some(CallStatus::Answered));
        assert!(next.is_active());
    }

    #[test]
    fn test_apply_distinguishes_clear_from_keep() {
        let base = FilterCriteria::default()
            .apply(CriteriaPatch {
                status: Patch::Set(CallStatus::Busy),
                search_text: Patch::Set("  spaced  ".into()),
                ..CriteriaPatch::default()
            })
            .unwrap();
        assert_eq!(base.search_text, "spaced");

        let cleared = base
            .apply(CriteriaPatch {
                status: Patch::Clear,
                ..CriteriaPatch::default()
            })
            .unwrap();
        assert_eq!(cleared.status, None);
        assert_eq!(cleared.search_text, "spaced");
    }

    #[test]
    fn test_event_types_never_empty() {
        let base = FilterCriteria::default();

        let cleared = base
            .apply(CriteriaPatch {
                event_types: Patch::Clear,
                ..CriteriaPatch::default()
            })
            .unwrap();
        assert_eq!(cleared.event_types, EventKind::all());

        let emptied = base
            .apply(CriteriaPatch {
                event_types: Patch::Set(BTreeSet::new()),
                ..CriteriaPatch::default()
            })
            .unwrap();
        assert_eq!(emptied.event_types, EventKind::all());

        let narrowed = base
            .apply(CriteriaPatch {
                event_types: Patch::Set(BTreeSet::from([EventKind::Task])),
                ..CriteriaPatch::default()
            })
            .unwrap();
        assert_eq!(narrowed.event_types.len(), 1);
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let result = FilterCriteria::default().apply(CriteriaPatch {
            date_from: Patch::Set(date(2024, 6, 20)),
            date_to: Patch::Set(date(2024, 6, 10)),
            ..CriteriaPatch::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_date_range_contains_is_inclusive() {
        let range = DateRange {
            from: Some(date(2024, 6, 10)),
            to: Some(date(2024, 6, 20)),
        };
        assert!(range.contains(date(2024, 6, 10)));
        assert!(range.contains(date(2024, 6, 20)));
        assert!(!range.contains(date(2024, 6, 21)));
        assert!(!range.contains(date(2024, 6, 9)));
    }
}
