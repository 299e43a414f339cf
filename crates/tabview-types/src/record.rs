use crate::criteria::{CallStatus, EventKind};
use crate::selection::UserId;

/// Seam between the engine and view-specific record schemas.
///
/// Each screen brings its own record type; the filtering predicate and the
/// date bucketing engine only see this trait. A record that does not carry
/// an attribute (e.g. a call has no event kind) returns `None` and fails
/// the corresponding filter whenever that filter is active.
pub trait TableRecord {
    /// Text matched (case-insensitively) against the committed search value.
    fn search_haystack(&self) -> String;

    /// Owning user/technician, if the record has one.
    fn owner(&self) -> Option<&UserId> {
        None
    }

    /// Raw timestamp string as delivered by the data source. Parsing is the
    /// engine's job; an unparseable value excludes the record rather than
    /// erroring.
    fn occurred_at(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> Option<CallStatus> {
        None
    }

    fn kind(&self) -> Option<EventKind> {
        None
    }
}
