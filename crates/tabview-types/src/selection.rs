use serde::{Deserialize, Serialize};

/// Reserved prefix used by the wire format to mark synthetic group ids.
///
/// `SelectionItem::parse` is the only place this prefix is interpreted;
/// everywhere else groups and leaves are distinguished by type, not by
/// string sniffing.
pub const GROUP_PREFIX: &str = "group:";

/// Identifier of a selectable leaf (a user/technician).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a synthetic group. Stored without the wire prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A selectable entry: either a concrete leaf or a whole group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
#[serde(rename_all = "snake_case")]
pub enum SelectionItem {
    Leaf(UserId),
    Group(GroupId),
}

impl SelectionItem {
    /// Classify a raw wire id. Group ids carry the reserved prefix;
    /// everything else is a leaf.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(GROUP_PREFIX) {
            Some(bare) => SelectionItem::Group(GroupId::new(bare)),
            None => SelectionItem::Leaf(UserId::new(raw)),
        }
    }

    /// Render back to the wire representation.
    pub fn wire_id(&self) -> String {
        match self {
            SelectionItem::Leaf(id) => id.0.clone(),
            SelectionItem::Group(id) => format!("{}{}", GROUP_PREFIX, id.0),
        }
    }
}

/// A selectable leaf as presented to the picker UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOption {
    pub id: UserId,
    pub label: String,
    /// Name of the group this user belongs to, if any. A user belongs to
    /// at most one group.
    pub group_name: Option<String>,
}

/// A synthetic group option; selecting it is sugar for selecting all
/// of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOption {
    pub id: GroupId,
    pub label: String,
    pub member_ids: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leaf_id() {
        let item = SelectionItem::parse("u-42");
        assert_eq!(item, SelectionItem::Leaf(UserId::new("u-42")));
        assert_eq!(item.wire_id(), "u-42");
    }

    #[test]
    fn test_parse_group_id_strips_prefix() {
        let item = SelectionItem::parse("group:support");
        assert_eq!(item, SelectionItem::Group(GroupId::new("support")));
        assert_eq!(item.wire_id(), "group:support");
    }
}
