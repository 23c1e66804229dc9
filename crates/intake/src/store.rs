//! Session-scoped field store.
//!
//! Holds the current value of every form input for one session. The store is
//! dumb: it never fails, never validates and knows nothing about
//! steps or groups. Unset keys read as the key's default (`FieldKey::default_value`).
//!
//! Typical usage:
//! ```
//! use intake::field::{FieldKey, FieldValue};
//! use intake::store::FieldStore;
//!
//! let mut store = FieldStore::default();
//! store.set(FieldKey::ClientName, FieldValue::text("Acme"));
//! assert_eq!(store.text(&FieldKey::ClientName), "Acme");
//! assert_eq!(store.text(&FieldKey::Email), "");
//! ```
//
// NOTE: Keep this module free of step / catalog concerns; the reducer is the
// only place that decides whether a write is allowed.

use std::collections::BTreeMap;

use tracing::trace;

use crate::field::{FieldKey, FieldValue, GroupIndex, ItemId};

#[derive(Debug, Default, Clone)]
pub struct FieldStore {
    values: BTreeMap<FieldKey, FieldValue>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the value of a key.
    pub fn set(&mut self, key: FieldKey, value: FieldValue) {
        trace!(%key, ?value, "field set");
        self.values.insert(key, value);
    }

    /// Current value, or the key's own default when unset.
    pub fn get(&self, key: &FieldKey) -> FieldValue {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.default_value())
    }

    /// Current value, or `default` when unset.
    pub fn get_or(&self, key: &FieldKey, default: FieldValue) -> FieldValue {
        self.values.get(key).cloned().unwrap_or(default)
    }

    pub fn has(&self, key: &FieldKey) -> bool {
        self.values.contains_key(key)
    }

    /// Remove a key; subsequent reads see its default again.
    pub fn clear(&mut self, key: &FieldKey) -> Option<FieldValue> {
        trace!(%key, "field cleared");
        self.values.remove(key)
    }

    // --- Typed readers -------------------------------------------------------------------------
    //
    // A value of the wrong variant reads as the kind's empty value, the same as
    // an unset key.

    pub fn text(&self, key: &FieldKey) -> &str {
        match self.values.get(key) {
            Some(FieldValue::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    pub fn choice(&self, key: &FieldKey) -> Option<&str> {
        match self.values.get(key) {
            Some(FieldValue::Choice(c)) => c.as_deref(),
            _ => None,
        }
    }

    pub fn choices(&self, key: &FieldKey) -> &[String] {
        match self.values.get(key) {
            Some(FieldValue::Choices(v)) => v.as_slice(),
            _ => &[],
        }
    }

    pub fn integer(&self, key: &FieldKey) -> i64 {
        match self.get(key) {
            FieldValue::Integer(n) => n,
            _ => 0,
        }
    }

    pub fn flag(&self, key: &FieldKey) -> bool {
        match self.get(key) {
            FieldValue::Flag(b) => b,
            _ => false,
        }
    }

    pub fn items(&self, key: &FieldKey) -> &[ItemId] {
        match self.values.get(key) {
            Some(FieldValue::List(v)) => v.as_slice(),
            _ => &[],
        }
    }

    /// True if anything is stored under the given group.
    pub fn has_group_data(&self, index: GroupIndex) -> bool {
        self.values.keys().any(|k| k.group_index() == Some(index))
    }

    /// Every stored entry in key order (for re-hydrating controls).
    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &FieldValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
