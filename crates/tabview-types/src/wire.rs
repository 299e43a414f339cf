use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::criteria::{CallStatus, EventKind, FilterCriteria};
use crate::pagination::PaginationState;
use crate::selection::UserId;

/// Date bounds serialize as day-first strings on the wire.
pub const WIRE_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// `timestamp.from` / `timestamp.until` block of a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireTimestamp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

/// Criteria as the backend expects them.
///
/// Only leaf ids travel on the wire: group selection has already been
/// expanded into members at selection time. Defaulted fields are omitted
/// entirely rather than sent empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<WireTimestamp>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub user_ids: Vec<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CallStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub event_types: Vec<EventKind>,
}

impl From<&FilterCriteria> for WireAttributes {
    fn from(criteria: &FilterCriteria) -> Self {
        let timestamp = if criteria.date_range.is_unbounded() {
            None
        } else {
            Some(WireTimestamp {
                from: criteria
                    .date_range
                    .from
                    .map(|d| d.format(WIRE_DATE_FORMAT).to_string()),
                until: criteria
                    .date_range
                    .to
                    .map(|d| d.format(WIRE_DATE_FORMAT).to_string()),
            })
        };

        let search = match criteria.search_text.trim() {
            "" => None,
            text => Some(text.to_string()),
        };

        // The full event-type set is the default; sending it would only
        // widen the payload without narrowing the result.
        let event_types = if criteria.event_types == EventKind::all() {
            Vec::new()
        } else {
            criteria.event_types.iter().copied().collect()
        };

        Self {
            timestamp,
            user_ids: criteria.selected_ids.iter().cloned().collect(),
            search,
            status: criteria.status,
            event_types,
        }
    }
}

/// Request envelope sent to the data source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    pub attributes: WireAttributes,
}

impl ListRequest {
    pub fn from_criteria(criteria: &FilterCriteria, pagination: &PaginationState) -> Self {
        Self {
            page: Some(pagination.page),
            limit: Some(pagination.limit),
            sort_by: None,
            order: None,
            attributes: WireAttributes::from(criteria),
        }
    }
}

/// Response envelope. Aggregate fields the engine does not model
/// (`total_all_users`, `total_calls_from`, ...) are preserved, not dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<R> {
    pub data: Vec<R>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationState>,
    #[serde(flatten)]
    pub aggregates: BTreeMap<String, Value>,
}

impl<R> ListResponse<R> {
    pub fn new(data: Vec<R>) -> Self {
        Self {
            data,
            pagination: None,
            aggregates: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{CriteriaPatch, Patch};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::BTreeSet;

    #[test]
    fn test_date_bounds_serialize_day_first() {
        let criteria = FilterCriteria::default()
            .apply(CriteriaPatch {
                date_from: Patch::Set(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
                date_to: Patch::Set(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
                ..CriteriaPatch::default()
            })
            .unwrap();

        let attrs = WireAttributes::from(&criteria);
        let value = serde_json::to_value(&attrs).unwrap();
        assert_eq!(value["timestamp"]["from"], json!("01-06-2024"));
        assert_eq!(value["timestamp"]["until"], json!("15-06-2024"));
    }

    #[test]
    fn test_default_criteria_serialize_to_empty_attributes() {
        let attrs = WireAttributes::from(&FilterCriteria::default());
        let value = serde_json::to_value(&attrs).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_ids_and_search_on_the_wire() {
        let criteria = FilterCriteria::default()
            .apply(CriteriaPatch {
                selected_ids: Patch::Set(BTreeSet::from([
                    UserId::new("u-1"),
                    UserId::new("u-2"),
                ])),
                search_text: Patch::Set("  alice  ".into()),
                status: Patch::Set(CallStatus::NoAnswer),
                ..CriteriaPatch::default()
            })
            .unwrap();

        let value = serde_json::to_value(WireAttributes::from(&criteria)).unwrap();
        assert_eq!(value["user_ids"], json!(["u-1", "u-2"]));
        assert_eq!(value["search"], json!("alice"));
        assert_eq!(value["status"], json!("NO_ANSWER"));
    }

    #[test]
    fn test_response_preserves_aggregates() {
        let raw = json!({
            "data": [],
            "pagination": {"page": 2, "limit": 25, "total": 60, "totalPages": 3},
            "total_all_users": 14,
            "total_calls_from": 141
        });

        let response: ListResponse<Value> = serde_json::from_value(raw).unwrap();
        assert_eq!(response.pagination.unwrap().page, 2);
        assert_eq!(response.aggregates["total_all_users"], json!(14));
        assert_eq!(response.aggregates["total_calls_from"], json!(141));
    }
}
