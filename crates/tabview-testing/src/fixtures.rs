//! Sample CRM-style records for driving the engine and orchestrator in
//! tests. Builders are chainable; every field starts in the most common
//! shape and is overridden per test.

use serde::{Deserialize, Serialize};

use tabview_types::{CallStatus, EventKind, TableRecord, UserId};

/// A row from a call-log screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub caller_name: String,
    pub caller_number: String,
    pub owner: Option<UserId>,
    pub started_at: Option<String>,
    pub status: Option<CallStatus>,
}

impl CallRecord {
    pub fn owned_by(mut self, id: &str) -> Self {
        self.owner = Some(UserId::new(id));
        self
    }

    pub fn at(mut self, timestamp: &str) -> Self {
        self.started_at = Some(timestamp.to_string());
        self
    }

    pub fn with_status(mut self, status: CallStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_number(mut self, number: &str) -> Self {
        self.caller_number = number.to_string();
        self
    }
}

impl TableRecord for CallRecord {
    fn search_haystack(&self) -> String {
        format!("{} {}", self.caller_name, self.caller_number)
    }

    fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    fn occurred_at(&self) -> Option<&str> {
        self.started_at.as_deref()
    }

    fn status(&self) -> Option<CallStatus> {
        self.status
    }
}

/// Start a call record; the id is derived from the caller name.
pub fn call(caller_name: &str) -> CallRecord {
    CallRecord {
        id: format!("call-{}", caller_name.to_lowercase().replace(' ', "-")),
        caller_name: caller_name.to_string(),
        caller_number: "+100000000".to_string(),
        owner: None,
        started_at: Some("2024-06-15 10:00:00".to_string()),
        status: Some(CallStatus::Answered),
    }
}

/// A row from a scheduled-events screen (task boards, reminders).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub kind: EventKind,
    pub owner: Option<UserId>,
    pub scheduled_at: Option<String>,
}

impl EventRecord {
    pub fn owned_by(mut self, id: &str) -> Self {
        self.owner = Some(UserId::new(id));
        self
    }

    pub fn at(mut self, timestamp: &str) -> Self {
        self.scheduled_at = Some(timestamp.to_string());
        self
    }

    pub fn unscheduled(mut self) -> Self {
        self.scheduled_at = None;
        self
    }
}

impl TableRecord for EventRecord {
    fn search_haystack(&self) -> String {
        self.title.clone()
    }

    fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    fn occurred_at(&self) -> Option<&str> {
        self.scheduled_at.as_deref()
    }

    fn kind(&self) -> Option<EventKind> {
        Some(self.kind)
    }
}

/// Start an event record of the given kind.
pub fn event(title: &str, kind: EventKind) -> EventRecord {
    EventRecord {
        id: format!("event-{}", title.to_lowercase().replace(' ', "-")),
        title: title.to_string(),
        kind,
        owner: None,
        scheduled_at: Some("2024-06-15 09:00:00".to_string()),
    }
}
