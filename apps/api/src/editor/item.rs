//! Per-item editing state: viewing → editing → (save | cancel) → viewing.
//!
//! An `ItemEditor` only holds the local copies of items currently being edited.
//! The list itself lives in the session draft; `commit` hands back the whole
//! list with the edited item swapped in, ready to be written as one slice.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::cv::{Certification, Education, Job, Skill};

/// An element of an editable CV list, matched by its identifier.
pub trait ListItem: Clone {
    fn item_id(&self) -> Uuid;

    /// The item inserted by the section's "add" action.
    fn blank() -> Self;
}

impl ListItem for Skill {
    fn item_id(&self) -> Uuid {
        self.id
    }

    fn blank() -> Self {
        Skill::default()
    }
}

impl ListItem for Job {
    fn item_id(&self) -> Uuid {
        self.id
    }

    /// New jobs start out as the current position.
    fn blank() -> Self {
        Job {
            current: true,
            ..Job::default()
        }
    }
}

impl ListItem for Education {
    fn item_id(&self) -> Uuid {
        self.id
    }

    fn blank() -> Self {
        Education::default()
    }
}

impl ListItem for Certification {
    fn item_id(&self) -> Uuid {
        self.id
    }

    fn blank() -> Self {
        Certification::default()
    }
}

#[derive(Debug, PartialEq)]
pub enum ItemState<'a, T> {
    Viewing,
    Editing(&'a T),
}

#[derive(Debug, Clone)]
pub struct ItemEditor<T> {
    editing: HashMap<Uuid, T>,
}

impl<T> Default for ItemEditor<T> {
    fn default() -> Self {
        Self {
            editing: HashMap::new(),
        }
    }
}

impl<T: ListItem> ItemEditor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: Uuid) -> ItemState<'_, T> {
        match self.editing.get(&id) {
            Some(local) => ItemState::Editing(local),
            None => ItemState::Viewing,
        }
    }

    pub fn is_editing(&self, id: Uuid) -> bool {
        self.editing.contains_key(&id)
    }

    /// Starts editing from a fresh copy of `item`, discarding any earlier local copy.
    pub fn begin_edit(&mut self, item: &T) {
        self.editing.insert(item.item_id(), item.clone());
    }

    pub fn local_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.editing.get_mut(&id)
    }

    /// Drops the local copy. Returns `false` if the item was not being edited.
    pub fn cancel(&mut self, id: Uuid) -> bool {
        self.editing.remove(&id).is_some()
    }

    /// Ends editing and returns `items` with the local copy in place of the
    /// item sharing its id. `None` if the item was not being edited.
    pub fn commit(&mut self, id: Uuid, items: &[T]) -> Option<Vec<T>> {
        let local = self.editing.remove(&id)?;
        Some(
            items
                .iter()
                .map(|item| {
                    if item.item_id() == id {
                        local.clone()
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        )
    }

    /// Prepends a blank item and puts it straight into editing.
    pub fn add_blank(&mut self, items: &[T]) -> (Uuid, Vec<T>) {
        let blank = T::blank();
        let id = blank.item_id();
        self.begin_edit(&blank);

        let mut updated = Vec::with_capacity(items.len() + 1);
        updated.push(blank);
        updated.extend_from_slice(items);
        (id, updated)
    }

    /// Returns `items` without the item `id`, dropping any local copy of it.
    pub fn remove(&mut self, id: Uuid, items: &[T]) -> Vec<T> {
        self.editing.remove(&id);
        items
            .iter()
            .filter(|item| item.item_id() != id)
            .cloned()
            .collect()
    }
}
