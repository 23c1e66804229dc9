//! Dynamic list controller.
//!
//! A dynamic list is an ordered, variable-length collection of free-text items
//! under one `ListKey`. The order lives in the store as `FieldValue::List` (item
//! identities) and every item's text under its own `FieldKey::ListItem`.
//!
//! Items are addressed by `ItemId`, never by position: removing an item drops
//! its identity and its text key, and every other item keeps both. Once
//! initialized a list never goes below one item; removing the last one is
//! rejected with `IntakeError::LastItem`.

use serde::Serialize;
use tracing::debug;

use crate::error::IntakeError;
use crate::field::{FieldValue, ItemId, ListKey};
use crate::store::FieldStore;

/// One item as shown to the editing widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub id: ItemId,
    pub text: String,
}

/// Controller for a single list. Holds no state besides its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicList {
    key: ListKey,
}

impl DynamicList {
    pub fn new(key: ListKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> ListKey {
        self.key
    }

    /// Seed an empty item if the list does not exist yet. Returns true if seeded.
    pub fn initialize(&self, store: &mut FieldStore) -> bool {
        if store.has(&self.key.field_key()) && !self.ids(store).is_empty() {
            return false;
        }
        let id = ItemId::generate();
        store.set(self.key.item_key(id), FieldValue::Text(String::new()));
        store.set(self.key.field_key(), FieldValue::List(vec![id]));
        debug!(list = %self.key, "list initialized");
        true
    }

    /// Append one empty item at the end and return its identity.
    pub fn append(&self, store: &mut FieldStore) -> ItemId {
        let mut ids = self.ids(store).to_vec();
        let id = ItemId::generate();
        ids.push(id);
        store.set(self.key.item_key(id), FieldValue::Text(String::new()));
        store.set(self.key.field_key(), FieldValue::List(ids));
        debug!(list = %self.key, %id, "item appended");
        id
    }

    /// Delete one item by identity.
    pub fn remove(&self, store: &mut FieldStore, id: ItemId) -> Result<(), IntakeError> {
        let ids = self.ids(store);
        let Some(pos) = ids.iter().position(|i| *i == id) else {
            return Err(self.unknown(id));
        };
        if ids.len() == 1 {
            return Err(IntakeError::LastItem { list: self.key });
        }

        let mut ids = ids.to_vec();
        ids.remove(pos);
        store.set(self.key.field_key(), FieldValue::List(ids));
        store.clear(&self.key.item_key(id));
        debug!(list = %self.key, %id, "item removed");
        Ok(())
    }

    /// Replace the text of one item. Other items are untouched.
    pub fn edit(
        &self,
        store: &mut FieldStore,
        id: ItemId,
        text: impl Into<String>,
    ) -> Result<(), IntakeError> {
        if !self.contains(store, id) {
            return Err(self.unknown(id));
        }
        store.set(self.key.item_key(id), FieldValue::Text(text.into()));
        Ok(())
    }

    /// Drop every item and refill with `texts`, one fresh identity each.
    ///
    /// An empty input leaves one empty item behind.
    pub fn replace<I, S>(&self, store: &mut FieldStore, texts: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for old in self.ids(store).to_vec() {
            store.clear(&self.key.item_key(old));
        }

        let mut ids = Vec::new();
        for text in texts {
            let id = ItemId::generate();
            store.set(self.key.item_key(id), FieldValue::Text(text.into()));
            ids.push(id);
        }
        if ids.is_empty() {
            let id = ItemId::generate();
            store.set(self.key.item_key(id), FieldValue::Text(String::new()));
            ids.push(id);
        }
        store.set(self.key.field_key(), FieldValue::List(ids.clone()));
        debug!(list = %self.key, len = ids.len(), "list replaced");
        ids
    }

    pub fn ids<'s>(&self, store: &'s FieldStore) -> &'s [ItemId] {
        store.items(&self.key.field_key())
    }

    pub fn len(&self, store: &FieldStore) -> usize {
        self.ids(store).len()
    }

    pub fn is_empty(&self, store: &FieldStore) -> bool {
        self.ids(store).is_empty()
    }

    pub fn contains(&self, store: &FieldStore, id: ItemId) -> bool {
        self.ids(store).contains(&id)
    }

    pub fn text<'s>(&self, store: &'s FieldStore, id: ItemId) -> &'s str {
        store.text(&self.key.item_key(id))
    }

    /// Every item including blank ones, in order.
    pub fn items(&self, store: &FieldStore) -> Vec<ListItem> {
        self.ids(store)
            .iter()
            .map(|id| ListItem {
                id: *id,
                text: self.text(store, *id).to_string(),
            })
            .collect()
    }

    /// Ordered non-blank texts; this is what leaves the form.
    pub fn values(&self, store: &FieldStore) -> Vec<String> {
        self.ids(store)
            .iter()
            .map(|id| self.text(store, *id))
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    fn unknown(&self, item: ItemId) -> IntakeError {
        IntakeError::UnknownItem {
            list: self.key,
            item,
        }
    }
}
