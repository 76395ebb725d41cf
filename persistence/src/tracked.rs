//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Editable relationship list that remembers what was taken out of it

use std::ops::Deref;
use tether_common::{Entity, EntityKey};

/// In-memory list of relationship members.
///
/// Every element taken out through one of the removal methods is recorded in
/// removal order, so a save pass can tell the store about it. Putting an
/// element with the same key back into the list forgets the removal.
#[derive(Debug, Clone)]
pub struct TrackedList<T> {
    elements: Vec<T>,
    removed: Vec<T>,
}

impl<T: Entity> TrackedList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Append an element.
    pub fn push(&mut self, element: T) {
        self.forget_removal(&element.key());
        self.elements.push(element);
    }

    /// Insert an element at `index`, clamped to the list length.
    pub fn insert(&mut self, index: usize, element: T) {
        self.forget_removal(&element.key());
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
    }

    /// Remove the element at `index`. Out of range removes nothing.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.elements.len() {
            return None;
        }
        let element = self.elements.remove(index);
        self.record_removal(element.clone());
        Some(element)
    }

    /// Remove the first element stored under `key`.
    pub fn remove_key(&mut self, key: &EntityKey) -> Option<T> {
        let index = self.elements.iter().position(|e| &e.key() == key)?;
        self.remove(index)
    }

    /// Keep only the elements matching `keep`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut dropped = Vec::new();
        self.elements.retain(|e| {
            let kept = keep(e);
            if !kept {
                dropped.push(e.clone());
            }
            kept
        });
        for element in dropped {
            self.record_removal(element);
        }
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        for element in std::mem::take(&mut self.elements) {
            self.record_removal(element);
        }
    }

    /// Mutable access to an element. Changing its key is not tracked.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.elements.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    pub fn contains_key(&self, key: &EntityKey) -> bool {
        self.elements.iter().any(|e| &e.key() == key)
    }

    /// Elements removed since the list was built or last drained.
    pub fn removed(&self) -> &[T] {
        &self.removed
    }

    /// Drain the removal record.
    pub fn take_removed(&mut self) -> Vec<T> {
        std::mem::take(&mut self.removed)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }

    fn record_removal(&mut self, element: T) {
        let key = element.key();
        // Removing a duplicate entry while another copy stays listed is not a removal.
        if self.contains_key(&key) || self.removed.iter().any(|e| e.key() == key) {
            return;
        }
        self.removed.push(element);
    }

    fn forget_removal(&mut self, key: &EntityKey) {
        self.removed.retain(|e| &e.key() != key);
    }
}

impl<T: Entity> Default for TrackedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> From<Vec<T>> for TrackedList<T> {
    fn from(elements: Vec<T>) -> Self {
        Self {
            elements,
            removed: Vec::new(),
        }
    }
}

impl<T> Deref for TrackedList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.elements
    }
}

impl<'a, T> IntoIterator for &'a TrackedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
