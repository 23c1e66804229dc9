//! Repeated subcategory groups.
//!
//! The number of groups N (1..=4) is itself a field (`NumSubcategories`).
//! Every group owns the keys `subcategory[i].*` plus two dynamic lists.
//!
//! Shrinking N leaves the data of hidden groups dormant in the store; growing
//! N again brings it back. Dormant groups are never read by validation or the
//! assembler.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::IntakeError;
use crate::field::{
    FieldKey, FieldValue, GroupField, GroupIndex, ListKey, ListKind, MAX_SUBCATEGORIES,
};
use crate::list::{DynamicList, ListItem};
use crate::store::FieldStore;

/// Validated group count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct SubcategoryCount(u8);

impl SubcategoryCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = MAX_SUBCATEGORIES;

    pub fn new(n: u8) -> Result<Self, IntakeError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(IntakeError::OutOfRange {
                key: FieldKey::NumSubcategories.to_string(),
                value: n as i64,
                min: Self::MIN as i64,
                max: Self::MAX as i64,
            })
        }
    }

    /// Count currently stored for the session (out-of-range values clamp).
    pub fn current(store: &FieldStore) -> Self {
        let n = store
            .integer(&FieldKey::NumSubcategories)
            .clamp(Self::MIN as i64, Self::MAX as i64);
        Self(n as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn indices(self) -> impl Iterator<Item = GroupIndex> {
        GroupIndex::range(self.0)
    }
}

impl TryFrom<i64> for SubcategoryCount {
    type Error = IntakeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| IntakeError::OutOfRange {
                key: FieldKey::NumSubcategories.to_string(),
                value,
                min: Self::MIN as i64,
                max: Self::MAX as i64,
            })
            .and_then(Self::new)
    }
}

impl From<SubcategoryCount> for u8 {
    fn from(value: SubcategoryCount) -> Self {
        value.0
    }
}

impl fmt::Display for SubcategoryCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle on one group's slice of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupContext {
    index: GroupIndex,
}

impl GroupContext {
    pub fn new(index: GroupIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> GroupIndex {
        self.index
    }

    pub fn key(&self, field: GroupField) -> FieldKey {
        FieldKey::group(self.index, field)
    }

    pub fn name<'s>(&self, store: &'s FieldStore) -> &'s str {
        store.text(&self.key(GroupField::Name))
    }

    pub fn sample_size<'s>(&self, store: &'s FieldStore) -> &'s str {
        store.text(&self.key(GroupField::SampleSize))
    }

    pub fn list(&self, kind: ListKind) -> DynamicList {
        DynamicList::new(ListKey::new(self.index, kind))
    }

    pub fn qualifiers(&self) -> DynamicList {
        self.list(ListKind::Qualifiers)
    }

    pub fn attributes(&self) -> DynamicList {
        self.list(ListKind::Attributes)
    }

    /// Display-only collapse state; never part of the submission.
    pub fn is_expanded(&self, store: &FieldStore) -> bool {
        store.flag(&self.key(GroupField::Expanded))
    }

    pub fn set_expanded(&self, store: &mut FieldStore, expanded: bool) {
        store.set(self.key(GroupField::Expanded), FieldValue::Flag(expanded));
    }

    /// Make sure both lists have their first slot.
    fn initialize(&self, store: &mut FieldStore) {
        self.qualifiers().initialize(store);
        self.attributes().initialize(store);
    }

    pub fn view(&self, store: &FieldStore) -> GroupView {
        GroupView {
            index: self.index,
            expanded: self.is_expanded(store),
            name: self.name(store).to_string(),
            sample_size: self.sample_size(store).to_string(),
            qualifiers: self.qualifiers().items(store),
            attributes: self.attributes().items(store),
        }
    }
}

/// Re-hydration data for one group's controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub index: GroupIndex,
    pub expanded: bool,
    pub name: String,
    pub sample_size: String,
    pub qualifiers: Vec<ListItem>,
    pub attributes: Vec<ListItem>,
}

/// Set the group count to `n` and return the active group contexts.
///
/// Groups below `min(old, n)` keep their data, new groups start empty with
/// one blank item per list, groups at or beyond `n` stay dormant.
pub fn expand(store: &mut FieldStore, n: SubcategoryCount) -> Vec<GroupContext> {
    let old = SubcategoryCount::current(store);
    store.set(FieldKey::NumSubcategories, FieldValue::Integer(n.get() as i64));

    let groups: Vec<GroupContext> = n.indices().map(GroupContext::new).collect();
    for group in &groups {
        group.initialize(store);
    }

    if n != old {
        info!(from = old.get(), to = n.get(), "subcategory count changed");
    }
    let dormant = dormant_groups(store);
    if !dormant.is_empty() {
        debug!(?dormant, "groups retained dormant");
    }
    groups
}

/// Contexts for `[0, N)` without touching the store.
pub fn active_groups(store: &FieldStore) -> Vec<GroupContext> {
    SubcategoryCount::current(store)
        .indices()
        .map(GroupContext::new)
        .collect()
}

/// Hidden groups that still hold data.
pub fn dormant_groups(store: &FieldStore) -> Vec<GroupIndex> {
    let n = SubcategoryCount::current(store).get();
    GroupIndex::range(MAX_SUBCATEGORIES)
        .filter(|g| g.get() >= n && store.has_group_data(*g))
        .collect()
}
