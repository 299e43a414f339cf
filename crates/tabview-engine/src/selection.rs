use std::collections::{BTreeMap, BTreeSet};

use tabview_types::{GroupId, GroupOption, SelectionItem, UserId, UserOption};

/// Whether the picker retains one leaf or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Single,
    Multiple,
}

/// Current picker state: leaf ids plus the groups rendered as checked.
///
/// `groups` is derived: a group is checked iff every member is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub ids: BTreeSet<UserId>,
    pub groups: BTreeSet<GroupId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// All options a picker offers, with users folded into groups by
/// `group_name`. A user belongs to at most one group.
#[derive(Debug, Clone, Default)]
pub struct SelectionCatalog {
    pub users: Vec<UserOption>,
    pub groups: Vec<GroupOption>,
}

impl SelectionCatalog {
    pub fn build(users: Vec<UserOption>) -> Self {
        let mut members: BTreeMap<String, Vec<UserId>> = BTreeMap::new();
        for user in &users {
            if let Some(group_name) = &user.group_name {
                members
                    .entry(group_name.clone())
                    .or_default()
                    .push(user.id.clone());
            }
        }

        let groups = members
            .into_iter()
            .map(|(name, member_ids)| GroupOption {
                id: GroupId::new(name.clone()),
                label: name,
                member_ids,
            })
            .collect();

        Self { users, groups }
    }

    pub fn group(&self, id: &GroupId) -> Option<&GroupOption> {
        self.groups.iter().find(|g| &g.id == id)
    }
}

/// Maintains a leaf-id selection while letting the caller toggle whole
/// groups. Group expansion happens here, eagerly, so downstream criteria
/// only ever see leaf ids.
#[derive(Debug, Clone)]
pub struct SelectionResolver {
    catalog: SelectionCatalog,
    mode: SelectionMode,
}

impl SelectionResolver {
    pub fn new(catalog: SelectionCatalog, mode: SelectionMode) -> Self {
        Self { catalog, mode }
    }

    pub fn catalog(&self) -> &SelectionCatalog {
        &self.catalog
    }

    /// Toggle either kind of entry. In single mode group toggles are
    /// rejected outright (selecting a group is not representable).
    pub fn toggle(&self, item: &SelectionItem, current: &Selection) -> Selection {
        match item {
            SelectionItem::Leaf(id) => self.toggle_leaf(id, current),
            SelectionItem::Group(id) => self.toggle_group(id, current),
        }
    }

    /// Plain set add/remove. In single mode the new leaf replaces any
    /// previous one.
    pub fn toggle_leaf(&self, id: &UserId, current: &Selection) -> Selection {
        let mut ids = match self.mode {
            SelectionMode::Single => {
                if current.ids.contains(id) {
                    BTreeSet::new()
                } else {
                    BTreeSet::from([id.clone()])
                }
            }
            SelectionMode::Multiple => {
                let mut ids = current.ids.clone();
                if !ids.remove(id) {
                    ids.insert(id.clone());
                }
                ids
            }
        };
        self.finish(&mut ids)
    }

    /// If every member is already selected the group toggles off (all
    /// members removed); otherwise the remainder is selected. A partially
    /// selected group therefore always completes, never partially clears.
    pub fn toggle_group(&self, id: &GroupId, current: &Selection) -> Selection {
        if self.mode == SelectionMode::Single {
            return current.clone();
        }
        let Some(group) = self.catalog.group(id) else {
            return current.clone();
        };

        let mut ids = current.ids.clone();
        let fully_selected =
            !group.member_ids.is_empty() && group.member_ids.iter().all(|m| ids.contains(m));

        if fully_selected {
            for member in &group.member_ids {
                ids.remove(member);
            }
        } else {
            ids.extend(group.member_ids.iter().cloned());
        }
        self.finish(&mut ids)
    }

    fn finish(&self, ids: &mut BTreeSet<UserId>) -> Selection {
        let groups = self
            .catalog
            .groups
            .iter()
            .filter(|g| {
                !g.member_ids.is_empty() && g.member_ids.iter().all(|m| ids.contains(m))
            })
            .map(|g| g.id.clone())
            .collect();

        Selection {
            ids: std::mem::take(ids),
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, group: Option<&str>) -> UserOption {
        UserOption {
            id: UserId::new(id),
            label: id.to_uppercase(),
            group_name: group.map(str::to_string),
        }
    }

    fn resolver(mode: SelectionMode) -> SelectionResolver {
        let catalog = SelectionCatalog::build(vec![
            user("u-1", Some("support")),
            user("u-2", Some("support")),
            user("u-3", Some("sales")),
            user("u-4", None),
        ]);
        SelectionResolver::new(catalog, mode)
    }

    #[test]
    fn test_catalog_folds_users_into_groups() {
        let r = resolver(SelectionMode::Multiple);
        let support = r.catalog().group(&GroupId::new("support")).unwrap();
        assert_eq!(
            support.member_ids,
            vec![UserId::new("u-1"), UserId::new("u-2")]
        );
        assert!(r.catalog().group(&GroupId::new("nope")).is_none());
    }

    #[test]
    fn test_toggle_group_selects_remainder_when_partial() {
        let r = resolver(SelectionMode::Multiple);
        let partial = r.toggle_leaf(&UserId::new("u-1"), &Selection::default());
        assert!(!partial.groups.contains(&GroupId::new("support")));

        let full = r.toggle_group(&GroupId::new("support"), &partial);
        assert!(full.ids.contains(&UserId::new("u-1")));
        assert!(full.ids.contains(&UserId::new("u-2")));
        assert!(full.groups.contains(&GroupId::new("support")));
    }

    #[test]
    fn test_toggle_group_twice_round_trips() {
        let r = resolver(SelectionMode::Multiple);
        let support = GroupId::new("support");

        let on = r.toggle_group(&support, &Selection::default());
        assert_eq!(on.ids.len(), 2);

        let off = r.toggle_group(&support, &on);
        assert!(off.ids.is_empty());
        assert!(off.groups.is_empty());
    }

    #[test]
    fn test_group_toggle_off_keeps_outside_ids() {
        let r = resolver(SelectionMode::Multiple);
        let support = GroupId::new("support");

        let mut state = r.toggle_leaf(&UserId::new("u-3"), &Selection::default());
        state = r.toggle_group(&support, &state);
        state = r.toggle_group(&support, &state);

        assert_eq!(state.ids, BTreeSet::from([UserId::new("u-3")]));
    }

    #[test]
    fn test_unknown_group_is_a_noop() {
        let r = resolver(SelectionMode::Multiple);
        let state = r.toggle_leaf(&UserId::new("u-4"), &Selection::default());
        let after = r.toggle_group(&GroupId::new("ghost"), &state);
        assert_eq!(after, state);
    }

    #[test]
    fn test_single_mode_replaces_and_rejects_groups() {
        let r = resolver(SelectionMode::Single);

        let first = r.toggle_leaf(&UserId::new("u-1"), &Selection::default());
        let second = r.toggle_leaf(&UserId::new("u-2"), &first);
        assert_eq!(second.ids, BTreeSet::from([UserId::new("u-2")]));

        let after_group = r.toggle_group(&GroupId::new("support"), &second);
        assert_eq!(after_group, second);

        let cleared = r.toggle_leaf(&UserId::new("u-2"), &second);
        assert!(cleared.is_empty());
    }
}
